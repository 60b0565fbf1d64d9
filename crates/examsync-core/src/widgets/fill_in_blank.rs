//! Single free-text answer.

use crate::model::Token;
use crate::tokenizer::{split_instruction_from_notes, tokenize_blanks};

use super::sync::{AnswerState, ChangeCallback, SyncPhase, Synchronizer};

/// Free text; the wire value is the text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAnswer(pub String);

impl AnswerState for TextAnswer {
    type Context = ();
    type Canonical = String;

    fn decode(value: &str, _: &()) -> Self {
        TextAnswer(value.to_string())
    }

    fn encode(&self, _: &()) -> String {
        self.0.clone()
    }

    fn canonical(&self, _: &()) -> String {
        self.0.clone()
    }
}

#[derive(Debug)]
pub struct FillInBlank {
    id: String,
    instruction: String,
    tokens: Vec<Token>,
    sync: Synchronizer<TextAnswer>,
}

impl FillInBlank {
    pub fn new(id: impl Into<String>, prompt: &str, value: &str, on_change: ChangeCallback) -> Self {
        let sections = split_instruction_from_notes(prompt).into_inner();
        let tokens = tokenize_blanks(&sections.notes).into_inner();
        Self {
            id: id.into(),
            instruction: sections.instruction,
            tokens,
            sync: Synchronizer::mounted((), value, on_change),
        }
    }

    /// User typed into the input.
    pub fn input(&mut self, text: &str) -> bool {
        self.sync.edit(|state, _| state.0 = text.to_string())
    }

    pub fn receive(&mut self, value: &str) -> bool {
        self.sync.receive(value)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn text(&self) -> &str {
        &self.sync.state().0
    }

    pub fn value(&self) -> String {
        self.sync.value()
    }

    pub fn phase(&self) -> SyncPhase {
        self.sync.phase()
    }
}
