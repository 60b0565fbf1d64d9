//! Word-list completion: pick a lettered option for each blank.

use crate::model::{LetteredOption, Token};
use crate::tokenizer::{extract_body_after_marker, split_word_list_block, tokenize_blank_slots};

use super::summary::{BlankAnswers, BlankCount};
use super::sync::{ChangeCallback, SyncPhase, Synchronizer};

#[derive(Debug)]
pub struct WordListCompletion {
    id: String,
    stem: String,
    tokens: Vec<Token>,
    options: Vec<LetteredOption>,
    sync: Synchronizer<BlankAnswers>,
}

impl WordListCompletion {
    pub fn new(id: impl Into<String>, prompt: &str, value: &str, on_change: ChangeCallback) -> Self {
        let block = split_word_list_block(prompt).into_inner();
        let body = extract_body_after_marker(&block.stem).into_inner();
        let slots = tokenize_blank_slots(&body).into_inner();
        Self {
            id: id.into(),
            stem: block.stem,
            tokens: slots.tokens,
            options: block.options,
            sync: Synchronizer::mounted(BlankCount(slots.blank_count), value, on_change),
        }
    }

    /// Put a letter into a blank, or clear it with `None`.
    ///
    /// Letters that are not in the word list and out-of-range blanks are ignored.
    pub fn choose(&mut self, index: usize, letter: Option<char>) -> bool {
        if index >= self.blank_count() {
            return false;
        }
        let entry = match letter {
            Some(l) if self.options.iter().any(|o| o.letter == l) => l.to_string(),
            Some(_) => return false,
            None => String::new(),
        };
        self.sync.edit(|answers, _| answers.0[index] = entry)
    }

    pub fn receive(&mut self, value: &str) -> bool {
        self.sync.receive(value)
    }

    pub fn blank_count(&self) -> usize {
        self.sync.context().0
    }

    /// Chosen letters per blank; empty strings are unanswered blanks.
    pub fn choices(&self) -> &[String] {
        &self.sync.state().0
    }

    pub fn options(&self) -> &[LetteredOption] {
        &self.options
    }

    pub fn stem(&self) -> &str {
        &self.stem
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
