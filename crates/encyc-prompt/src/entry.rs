//! Drafting prompt for a canonical entry.

use encyc_utils::types::{Edition, EntryType};

use crate::targets::word_target;

const CHILDREN_GUIDELINES: &str = "This is for the CHILDREN'S EDITION. Guidelines:
- Use shorter sentences (8-15 words typically)
- Provide concrete examples before abstract concepts
- Make transitions explicit (\"First... then... but...\")
- Address the reader directly (\"You can notice...\")
- End with an open question, not a definitive answer
- Do NOT simplify the ideas—preserve their depth and sophistication
- Do NOT use \"fun facts\" or condescending language

";

const ADULT_TEMPLATE: &str = "This is for the ADULT EDITION. Follow the Inquiry-First Encyclopædia Article Template:

I. THE QUESTION THAT OPENS THIS ARTICLE
Begin with one carefully chosen, generative question—the question that makes the article necessary. This question should not be fully answerable. It should orient the reader toward wonder, not mastery. Ideally, it should feel slightly uncomfortable.

II. WHAT IS COMMONLY SAID
Briefly summarize the prevailing or conventional account of the topic. What do textbooks, popular explanations, or authorities usually claim? What definitions or frameworks are most widely accepted? What assumptions are typically left unstated? Be neutral, concise, and non-dogmatic.

III. QUESTIONS BENEATH THE ANSWER
Expose the assumptions hiding inside the common account. What must be true for this explanation to hold? What does this view emphasize—and what does it ignore? Who benefits from framing the topic this way? When did this understanding emerge, and why then? This section should multiply questions, not resolve them.

IV. COMPETING WAYS OF SEEING
Present 2–4 alternative interpretations, traditions, or frameworks, each introduced as a question. How does this topic appear from different perspectives? How is it understood differently across cultures or disciplines? What happens if we reverse a core assumption? Do not declare a winner. Let tension remain visible. Contradiction is a feature, not a flaw.

V. WHAT REMAINS UNANSWERED
Name what is not known, unresolved, or actively debated. This may include open scientific problems, philosophical disagreements, ethical ambiguities, missing voices or perspectives, or questions we lack the tools to ask properly (yet). This section signals that knowledge is alive, not complete.

VI. QUESTIONS FOR THE READER
Invite the reader into the inquiry directly. Which explanation feels most convincing to you, and why? What assumptions do you bring to this topic? What experience in your own life complicates what you've read? What question would you add to this article?

VII. PATHS FOR FURTHER INQUIRY
Instead of a bibliography, offer directions of exploration. \"To pursue this question historically, see...\" \"To approach this scientifically, investigate...\" \"To challenge this framing, compare it with...\" \"To deepen this inquiry, ask...\" You may optionally include references, but framed as tools, not authorities.

GUIDING PRINCIPLE: An encyclopædia should not be the place where questions go to die. It should be the place where better questions are learned.

Write in your authentic scholarly voice. Use precise, technical language appropriate to the subject. Present arguments with rigor and clarity. Include citations in [Author, Year] format where relevant. Balance depth with accessibility.

";

const CLOSING_INSTRUCTION: &str = "Write the complete canonical text for this entry following the Inquiry-First template above.
Output ONLY the body content (no metadata, no AsciiDoc formatting, no marginalia).
The text should be ready to be placed inside the [role=canonical] block.
Use markdown formatting for structure (## for section headers, **bold** for emphasis, etc.).";

/// Inputs for [`build_entry_prompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPromptSpec {
    pub title: String,
    pub edition: Edition,
    pub entry_type: EntryType,
    /// Overrides the table target when set (taken from the entry's `:word-target:`).
    pub word_target: Option<String>,
    pub topics: Vec<String>,
}

impl EntryPromptSpec {
    #[must_use]
    pub fn new(title: impl Into<String>, edition: Edition, entry_type: EntryType) -> Self {
        Self {
            title: title.into(),
            edition,
            entry_type,
            word_target: None,
            topics: Vec::new(),
        }
    }

    /// Word target used in the prompt: the override, else the table value.
    #[must_use]
    pub fn effective_word_target(&self) -> String {
        self.word_target
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map_or_else(
                || word_target(self.entry_type, self.edition).to_string(),
                str::to_string,
            )
    }
}

/// Compose the drafting prompt for one entry.
#[must_use]
pub fn build_entry_prompt(spec: &EntryPromptSpec) -> String {
    let mut prompt = format!(
        "You are writing an encyclopaedia entry on \"{}\" for The Encyclopædia published by the Inquiry Institute.\n\n",
        spec.title
    );

    prompt.push_str(match spec.edition {
        Edition::Children => CHILDREN_GUIDELINES,
        Edition::Adult => ADULT_TEMPLATE,
    });

    prompt.push_str(&format!(
        "Entry type: {}\nWord target: {}\n\n",
        spec.entry_type.upper_label(),
        spec.effective_word_target()
    ));

    if !spec.topics.is_empty() {
        prompt.push_str("Topics to cover:\n");
        let bullets: Vec<String> = spec.topics.iter().map(|t| format!("- {t}")).collect();
        prompt.push_str(&bullets.join("\n"));
        prompt.push_str("\n\n");
    }

    prompt.push_str(CLOSING_INSTRUCTION);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(edition: Edition) -> EntryPromptSpec {
        EntryPromptSpec::new("Attention", edition, EntryType::Major)
    }

    #[test]
    fn test_adult_prompt_structure() {
        let prompt = build_entry_prompt(&spec(Edition::Adult));

        assert!(prompt.starts_with(
            "You are writing an encyclopaedia entry on \"Attention\" for The Encyclopædia"
        ));
        for heading in [
            "I. THE QUESTION THAT OPENS THIS ARTICLE",
            "II. WHAT IS COMMONLY SAID",
            "III. QUESTIONS BENEATH THE ANSWER",
            "IV. COMPETING WAYS OF SEEING",
            "V. WHAT REMAINS UNANSWERED",
            "VI. QUESTIONS FOR THE READER",
            "VII. PATHS FOR FURTHER INQUIRY",
        ] {
            assert!(prompt.contains(heading), "missing {heading}");
        }
        assert!(prompt.contains("Entry type: MAJOR\nWord target: 4000-6000\n"));
        assert!(!prompt.contains("CHILDREN'S EDITION"));
        assert!(!prompt.contains("Topics to cover:"));
        assert!(prompt.ends_with("**bold** for emphasis, etc.)."));
    }

    #[test]
    fn test_children_prompt_guidelines() {
        let prompt = build_entry_prompt(&spec(Edition::Children));

        assert!(prompt.contains("CHILDREN'S EDITION"));
        assert!(prompt.contains("8-15 words"));
        assert!(prompt.contains("condescending"));
        assert!(prompt.contains("Word target: 750-1500"));
        assert!(!prompt.contains("Inquiry-First Encyclopædia Article Template"));
    }

    #[test]
    fn test_word_target_override_and_topics() {
        let mut spec = spec(Edition::Adult);
        spec.word_target = Some("4000–6000".to_string());
        spec.topics = vec!["selective attention".to_string(), "the will".to_string()];

        let prompt = build_entry_prompt(&spec);

        assert!(prompt.contains("Word target: 4000–6000\n"));
        assert!(prompt.contains("Topics to cover:\n- selective attention\n- the will\n\n"));
    }

    #[test]
    fn test_blank_override_falls_back_to_table() {
        let mut spec = EntryPromptSpec::new("Closing", Edition::Adult, EntryType::Closing);
        spec.word_target = Some("  ".to_string());
        assert_eq!(spec.effective_word_target(), "1000-2000");
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let spec = spec(Edition::Adult);
        assert_eq!(build_entry_prompt(&spec), build_entry_prompt(&spec));
    }
}
