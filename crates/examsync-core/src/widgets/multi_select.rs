//! Pick-several options.
//!
//! The wire value is a JSON list of option ids in the order they were
//! picked. Only membership matters: two values with the same ids in a
//! different order are the same answer.

use std::collections::BTreeSet;

use crate::codec::{decode_list, encode_list};
use crate::model::UiOption;

use super::sync::{AnswerState, ChangeCallback, SyncPhase, Synchronizer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection(pub Vec<String>);

impl AnswerState for Selection {
    type Context = Vec<UiOption>;
    type Canonical = BTreeSet<String>;

    fn decode(value: &str, _: &Vec<UiOption>) -> Self {
        let mut seen = BTreeSet::new();
        let ids = decode_list::<String>(value)
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Selection(ids)
    }

    fn encode(&self, _: &Vec<UiOption>) -> String {
        encode_list(&self.0)
    }

    fn canonical(&self, _: &Vec<UiOption>) -> BTreeSet<String> {
        self.0.iter().cloned().collect()
    }
}

#[derive(Debug)]
pub struct MultiSelect {
    id: String,
    prompt: String,
    sync: Synchronizer<Selection>,
}

impl MultiSelect {
    pub fn new(
        id: impl Into<String>,
        prompt: &str,
        options: Vec<UiOption>,
        value: &str,
        on_change: ChangeCallback,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.to_string(),
            sync: Synchronizer::mounted(options, value, on_change),
        }
    }

    /// Select the option if unselected, otherwise deselect it.
    ///
    /// Ids that are not options can only be deselected, so a stale saved
    /// selection can still be cleared.
    pub fn toggle(&mut self, option_id: &str) -> bool {
        let known = self.sync.context().iter().any(|o| o.id == option_id);
        if !known && !self.is_selected(option_id) {
            return false;
        }
        self.sync.edit(|selection, _| {
            if let Some(pos) = selection.0.iter().position(|id| id == option_id) {
                selection.0.remove(pos);
            } else {
                selection.0.push(option_id.to_string());
            }
        })
    }

    pub fn receive(&mut self, value: &str) -> bool {
        self.sync.receive(value)
    }

    pub fn is_selected(&self, option_id: &str) -> bool {
        self.sync.state().0.iter().any(|id| id == option_id)
    }

    pub fn selected(&self) -> &[String] {
        &self.sync.state().0
    }

    pub fn options(&self) -> &[UiOption] {
        self.sync.context()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn value(&self) -> String {
        self.sync.value()
    }

    pub fn phase(&self) -> SyncPhase {
        self.sync.phase()
    }
}
