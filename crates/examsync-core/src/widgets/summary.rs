//! Multi-blank summary completion.
//!
//! Blanks come from the notes that follow the "answer sheet" instruction.
//! The wire value is a JSON list with one entry per blank, in blank order,
//! with empty strings for unanswered blanks.

use crate::codec::{decode_list, encode_list};
use crate::model::Token;
use crate::tokenizer::{count_blanks, split_instruction_from_notes, tokenize_blanks};

use super::sync::{AnswerState, ChangeCallback, SyncPhase, Synchronizer};

/// One entry per blank; always exactly as long as the blank count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankAnswers(pub Vec<String>);

impl BlankAnswers {
    fn fitted(value: &str, blank_count: usize) -> Self {
        let mut entries: Vec<String> = decode_list(value);
        entries.resize(blank_count, String::new());
        BlankAnswers(entries)
    }
}

/// Number of blanks in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankCount(pub usize);

impl AnswerState for BlankAnswers {
    type Context = BlankCount;
    type Canonical = Vec<String>;

    fn decode(value: &str, ctx: &BlankCount) -> Self {
        BlankAnswers::fitted(value, ctx.0)
    }

    fn encode(&self, _: &BlankCount) -> String {
        encode_list(&self.0)
    }

    fn canonical(&self, _: &BlankCount) -> Vec<String> {
        self.0.clone()
    }
}

#[derive(Debug)]
pub struct SummaryCompletion {
    id: String,
    instruction: String,
    tokens: Vec<Token>,
    sync: Synchronizer<BlankAnswers>,
}

impl SummaryCompletion {
    pub fn new(id: impl Into<String>, prompt: &str, value: &str, on_change: ChangeCallback) -> Self {
        let sections = split_instruction_from_notes(prompt).into_inner();
        let tokens = tokenize_blanks(&sections.notes).into_inner();
        let blanks = BlankCount(count_blanks(&tokens));
        Self {
            id: id.into(),
            instruction: sections.instruction,
            tokens,
            sync: Synchronizer::mounted(blanks, value, on_change),
        }
    }

    /// Set the text of one blank. Out-of-range indices are ignored.
    pub fn fill(&mut self, index: usize, text: &str) -> bool {
        if index >= self.blank_count() {
            return false;
        }
        self.sync.edit(|answers, _| answers.0[index] = text.to_string())
    }

    pub fn receive(&mut self, value: &str) -> bool {
        self.sync.receive(value)
    }

    pub fn blank_count(&self) -> usize {
        self.sync.context().0
    }

    pub fn answers(&self) -> &[String] {
        &self.sync.state().0
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> String {
        self.sync.value()
    }

    pub fn phase(&self) -> SyncPhase {
        self.sync.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::sync::tests::recorder;

    const PROMPT: &str =
        r"Write NO MORE THAN TWO WORDS on your answer sheet.\nNotes: founded in ____ by ____ ; moved to ____.";

    #[test]
    fn value_is_length_stable() {
        let (cb, seen) = recorder();
        let mut w = SummaryCompletion::new("g1", PROMPT, "", cb);
        assert_eq!(w.blank_count(), 3);
        assert_eq!(w.value(), r#"["","",""]"#);

        assert!(w.fill(1, "monks"));
        assert_eq!(*seen.lock().unwrap(), vec![r#"["","monks",""]"#.to_string()]);
        assert!(!w.fill(5, "nope"));
    }

    #[test]
    fn saved_value_is_padded_and_truncated() {
        let (cb, _) = recorder();
        let short = SummaryCompletion::new("g1", PROMPT, r#"["1066"]"#, cb);
        assert_eq!(short.answers(), ["1066", "", ""]);

        let (cb, _) = recorder();
        let long = SummaryCompletion::new("g1", PROMPT, r#"["a","b","c","d"]"#, cb);
        assert_eq!(long.answers(), ["a", "b", "c"]);
    }

    #[test]
    fn malformed_saved_value_means_unanswered() {
        let (cb, _) = recorder();
        let w = SummaryCompletion::new("g1", PROMPT, "1066", cb);
        assert_eq!(w.answers(), ["", "", ""]);
    }

    #[test]
    fn unsaved_input_survives_equivalent_external_value() {
        let (cb, _) = recorder();
        let mut w = SummaryCompletion::new("g1", PROMPT, "", cb);
        w.fill(0, "1066");
        assert!(!w.receive(r#"["1066"]"#));
        assert_eq!(w.phase(), SyncPhase::Editing);
        assert!(w.receive(r#"["1067","",""]"#));
        assert_eq!(w.answers()[0], "1067");
    }
}
