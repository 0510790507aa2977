//! Review, revision, marginalia and fidelity prompts.
//!
//! Quoted text is cut to a fixed number of characters; a trailing `...` marks
//! a cut.

use encyc_utils::types::MarginaliaKind;

/// Characters of the draft quoted to reviewers.
pub const REVIEW_EXCERPT_CHARS: usize = 3000;
/// Characters of the draft quoted back to the author for revision.
pub const REVISION_EXCERPT_CHARS: usize = 3000;
/// Characters of the revised text quoted for marginalia.
pub const MARGINALIA_EXCERPT_CHARS: usize = 1000;
/// Characters of any text quoted to the fidelity evaluator.
pub const FIDELITY_EXCERPT_CHARS: usize = 2000;

/// First `limit` characters of `text`, with `...` appended when anything was cut.
#[must_use]
pub fn excerpt(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Peer-review request sent as the reviewer.
#[must_use]
pub fn build_review_prompt(
    reviewer_id: &str,
    draft: &str,
    entry_title: &str,
    author_name: &str,
) -> String {
    format!(
        "As {reviewer_id}, provide scholarly peer review feedback on the following encyclopaedia entry on \"{entry_title}\" by {author_name}.

The entry text:
{}

Provide constructive feedback focusing on:
1. Accuracy and scholarly rigor
2. Clarity and organization
3. Completeness of coverage
4. Areas that might need expansion or clarification

Keep feedback professional and constructive.",
        excerpt(draft, REVIEW_EXCERPT_CHARS)
    )
}

/// Revision request sent as the primary author, quoting every review in order.
#[must_use]
pub fn build_revision_prompt(
    author_id: &str,
    draft: &str,
    feedback: &[String],
    entry_title: &str,
) -> String {
    let feedback_text = feedback
        .iter()
        .enumerate()
        .map(|(i, f)| format!("Reviewer {}: {f}", i + 1))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "As {author_id}, revise your encyclopaedia entry on \"{entry_title}\" based on the following peer review feedback.

Original text:
{}

Peer Review Feedback:
{feedback_text}

Revise the entry to address the feedback while maintaining your authentic voice and perspective.",
        excerpt(draft, REVISION_EXCERPT_CHARS)
    )
}

/// Marginal-note request sent as the reviewer.
#[must_use]
pub fn build_marginalia_prompt(
    reviewer_id: &str,
    revised: &str,
    entry_title: &str,
    kind: MarginaliaKind,
) -> String {
    let description = kind.description();
    format!(
        "As {reviewer_id}, provide {description} (30-60 words) as marginalia for the encyclopaedia entry on \"{entry_title}\".

Entry excerpt:
{}

Write a concise marginal note that {description}. Keep it scholarly and in your authentic voice.",
        excerpt(revised, MARGINALIA_EXCERPT_CHARS)
    )
}

/// Inputs for [`build_fidelity_prompt`].
#[derive(Debug, Clone, Copy)]
pub struct FidelityPromptSpec<'a> {
    pub text: &'a str,
    pub faculty_id: &'a str,
    pub faculty_name: &'a str,
    /// Short label for what is being judged ("initial article generation", ...).
    pub context: &'a str,
}

/// Voice-fidelity evaluation request. Asks for a JSON object only.
#[must_use]
pub fn build_fidelity_prompt(spec: &FidelityPromptSpec<'_>) -> String {
    let name = spec.faculty_name;
    format!(
        "You are evaluating whether the following text maintains authentic voice fidelity for {name} ({}).

Context: {}

Text to evaluate:
{}

Evaluate:
1. Does the voice match {name}'s known writing style and tone?
2. Are the ideas consistent with their corpus and historical period?
3. Are there anachronisms or modern idioms that break character?
4. Does the reasoning style match their known approach?

Respond in JSON format:
{{
  \"passed\": true/false,
  \"score\": 0-100,
  \"issues\": [\"issue1\", \"issue2\"],
  \"suggestions\": [\"suggestion1\", \"suggestion2\"]
}}",
        spec.faculty_id,
        spec.context,
        excerpt(spec.text, FIDELITY_EXCERPT_CHARS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_excerpt_short_text_untouched() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_excerpt_cuts_and_marks() {
        assert_eq!(excerpt("abcdefghijk", 10), "abcdefghij...");
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let text = "é".repeat(5);
        assert_eq!(excerpt(&text, 3), "ééé...");
    }

    #[test]
    fn test_review_prompt_quotes_excerpt() {
        let draft = "x".repeat(3500);
        let prompt = build_review_prompt("a.simon", &draft, "Attention", "William James");

        assert!(prompt.starts_with("As a.simon, provide scholarly peer review feedback"));
        assert!(prompt.contains("on \"Attention\" by William James."));
        assert!(prompt.contains(&format!("{}...", "x".repeat(3000))));
        assert!(!prompt.contains(&"x".repeat(3001)));
    }

    #[test]
    fn test_revision_prompt_numbers_feedback() {
        let feedback = vec!["Too long.".to_string(), "Cite Wundt.".to_string()];
        let prompt = build_revision_prompt("a.james", "Draft text", &feedback, "Attention");

        assert!(prompt.contains("Original text:\nDraft text\n"));
        assert!(prompt.contains("Reviewer 1: Too long.\n\nReviewer 2: Cite Wundt."));
        assert!(prompt.starts_with("As a.james, revise your encyclopaedia entry"));
    }

    #[test]
    fn test_marginalia_prompt_uses_kind_description() {
        let prompt =
            build_marginalia_prompt("a.weil", "Revised", "Attention", MarginaliaKind::Heretic);

        assert!(prompt.contains("provide a heretical or alternative perspective (30-60 words)"));
        assert!(prompt.contains("marginal note that a heretical or alternative perspective."));
    }

    #[test]
    fn test_fidelity_prompt_requests_json() {
        let prompt = build_fidelity_prompt(&FidelityPromptSpec {
            text: "Some text",
            faculty_id: "a.james",
            faculty_name: "William James",
            context: "revised article",
        });

        assert!(prompt.contains("voice fidelity for William James (a.james)."));
        assert!(prompt.contains("Context: revised article"));
        assert!(prompt.contains("\"score\": 0-100"));
    }

    proptest! {
        #[test]
        fn prop_excerpt_never_exceeds_limit(text in ".{0,200}", limit in 0usize..150) {
            let cut = excerpt(&text, limit);
            let chars = text.chars().count();
            if chars > limit {
                prop_assert_eq!(cut.chars().count(), limit + 3);
                prop_assert!(cut.ends_with("..."));
            } else {
                prop_assert_eq!(cut, text);
            }
        }
    }
}
