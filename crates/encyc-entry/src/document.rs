//! Line-oriented view of an entry file.
//!
//! Parsing never copies or normalises the source: every line and block is a
//! byte span into the original text, so a rewrite touches exactly the span it
//! replaces and nothing else.

use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical block attribute line.
pub const CANONICAL_MARKER: &str = "[role=canonical]";
/// Prefix of a marginalia attribute list.
pub const MARGINALIA_PREFIX: &str = "[role=marginalia";
/// Block delimiter line.
pub const DELIMITER: &str = "====";
/// Body of a canonical block that still awaits generation.
pub const CANONICAL_PLACEHOLDER: &str = "[CANONICAL TEXT TO BE GENERATED]";

static FIELD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([A-Za-z0-9_-]+):\s*(.*?)\s*$").unwrap());

/// One line of the source, without its line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Byte offset of the first character.
    pub start: usize,
    pub text: &'a str,
    /// `"\n"`, `"\r\n"` or `""` for a final unterminated line.
    pub eol: &'a str,
}

impl Line<'_> {
    /// Byte offset just past the text, before the terminator.
    #[must_use]
    pub fn text_end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Byte offset just past the terminator.
    #[must_use]
    pub fn end(&self) -> usize {
        self.text_end() + self.eol.len()
    }
}

/// A delimited block: from the start of its attribute line to the end of the
/// closing `====` (terminator excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start: usize,
    pub end: usize,
    /// Body is still the generation placeholder. Only meaningful for canonical blocks.
    pub placeholder: bool,
}

/// `:name: value` attribute line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLine<'a> {
    pub line_index: usize,
    pub value: &'a str,
}

/// Parsed entry file.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    source: &'a str,
    lines: Vec<Line<'a>>,
    canonical: Vec<BlockSpan>,
    marginalia: Vec<BlockSpan>,
}

impl<'a> Document<'a> {
    #[must_use]
    pub fn parse(source: &'a str) -> Self {
        let lines = split_lines(source);
        let mut canonical = Vec::new();
        let mut marginalia = Vec::new();

        let mut i = 0;
        while i < lines.len() {
            let text = lines[i].text;
            if text.trim_end() == CANONICAL_MARKER {
                if let Some((span, next)) = delimited_block(&lines, i, i + 1) {
                    canonical.push(span);
                    i = next;
                    continue;
                }
            } else if text.starts_with(MARGINALIA_PREFIX) {
                // Attribute lists may wrap; they end at the first line closing with `]`.
                let mut attr_end = i;
                while attr_end < lines.len() && !lines[attr_end].text.trim_end().ends_with(']') {
                    attr_end += 1;
                }
                if attr_end < lines.len()
                    && let Some((span, next)) = delimited_block(&lines, i, attr_end + 1)
                {
                    marginalia.push(span);
                    i = next;
                    continue;
                }
            }
            i += 1;
        }

        Self {
            source,
            lines,
            canonical,
            marginalia,
        }
    }

    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[must_use]
    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    #[must_use]
    pub fn canonical_blocks(&self) -> &[BlockSpan] {
        &self.canonical
    }

    #[must_use]
    pub fn marginalia_blocks(&self) -> &[BlockSpan] {
        &self.marginalia
    }

    /// First canonical block still holding the placeholder.
    #[must_use]
    pub fn placeholder_block(&self) -> Option<BlockSpan> {
        self.canonical.iter().copied().find(|b| b.placeholder)
    }

    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.placeholder_block().is_some()
    }

    /// First `:name:` line. An empty value still counts as present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldLine<'a>> {
        self.lines.iter().enumerate().find_map(|(idx, line)| {
            let caps = FIELD_LINE.captures(line.text)?;
            if caps.get(1)?.as_str() != name {
                return None;
            }
            let value = caps.get(2).map_or("", |m| m.as_str());
            Some(FieldLine {
                line_index: idx,
                value,
            })
        })
    }

    /// Non-empty trimmed value of a field.
    #[must_use]
    pub fn field_value(&self, name: &str) -> Option<&'a str> {
        self.field(name)
            .map(|f| f.value.trim())
            .filter(|v| !v.is_empty())
    }

    /// Index of the first `=== ` heading line.
    #[must_use]
    pub fn title_line(&self) -> Option<usize> {
        self.lines.iter().position(|l| l.text.starts_with("=== "))
    }

    /// Heading text of the title line.
    #[must_use]
    pub fn title(&self) -> Option<&'a str> {
        self.title_line()
            .map(|idx| self.lines[idx].text["=== ".len()..].trim())
            .filter(|t| !t.is_empty())
    }

    /// Bulleted items following a `Topics to cover:` line, up to the next block.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        let Some(start) = self
            .lines
            .iter()
            .position(|l| l.text.trim() == "Topics to cover:")
        else {
            return Vec::new();
        };

        self.lines[start + 1..]
            .iter()
            .map(|l| l.text.trim())
            .take_while(|t| *t != DELIMITER && !t.starts_with("[role="))
            .filter_map(|t| t.strip_prefix('-'))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Source with `[start, end)` replaced.
    #[must_use]
    pub fn replace_span(&self, start: usize, end: usize, replacement: &str) -> String {
        let mut out = String::with_capacity(self.source.len() + replacement.len());
        out.push_str(&self.source[..start]);
        out.push_str(replacement);
        out.push_str(&self.source[end..]);
        out
    }

    /// Source with line `idx` replaced, keeping its terminator.
    #[must_use]
    pub fn replace_line(&self, idx: usize, text: &str) -> String {
        let line = self.lines[idx];
        self.replace_span(line.start, line.text_end(), text)
    }

    /// Source with a new line inserted directly after line `idx`.
    ///
    /// The new line reuses the anchor's terminator; an unterminated final
    /// anchor gets a `\n` first.
    #[must_use]
    pub fn insert_line_after(&self, idx: usize, text: &str) -> String {
        let line = self.lines[idx];
        let (lead, eol) = if line.eol.is_empty() {
            ("\n", "")
        } else {
            ("", line.eol)
        };
        self.replace_span(line.end(), line.end(), &format!("{lead}{text}{eol}"))
    }
}

fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for raw in source.split_inclusive('\n') {
        let (text, eol) = if let Some(t) = raw.strip_suffix("\r\n") {
            (t, "\r\n")
        } else if let Some(t) = raw.strip_suffix('\n') {
            (t, "\n")
        } else {
            (raw, "")
        };
        lines.push(Line { start, text, eol });
        start += raw.len();
    }
    lines
}

/// Block whose attribute list starts at `attr_line` and whose opening
/// delimiter is expected at `open`. Returns the span and the line after it.
fn delimited_block(lines: &[Line<'_>], attr_line: usize, open: usize) -> Option<(BlockSpan, usize)> {
    if lines.get(open)?.text.trim_end() != DELIMITER {
        return None;
    }
    let close = (open + 1..lines.len()).find(|&i| lines[i].text.trim_end() == DELIMITER)?;
    let placeholder = lines
        .get(open + 1)
        .is_some_and(|l| open + 1 < close && l.text.trim_start().starts_with(CANONICAL_PLACEHOLDER));
    Some((
        BlockSpan {
            start: lines[attr_line].start,
            end: lines[close].text_end(),
            placeholder,
        },
        close + 1,
    ))
}
