//! Pick-one selection, used for heading matching and the other single-answer kinds.

use crate::model::UiOption;

use super::fill_in_blank::TextAnswer;
use super::sync::{ChangeCallback, SyncPhase, Synchronizer};

/// The wire value is the chosen option id, or empty when nothing is chosen.
#[derive(Debug)]
pub struct HeadingSelect {
    id: String,
    prompt: String,
    options: Vec<UiOption>,
    sync: Synchronizer<TextAnswer>,
}

impl HeadingSelect {
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
            options,
            sync: Synchronizer::mounted((), value, on_change),
        }
    }

    /// Choose an option by id. Unknown ids are ignored.
    pub fn select(&mut self, option_id: &str) -> bool {
        if !self.options.iter().any(|o| o.id == option_id) {
            return false;
        }
        self.sync.edit(|choice, _| choice.0 = option_id.to_string())
    }

    pub fn clear(&mut self) -> bool {
        self.sync.edit(|choice, _| choice.0.clear())
    }

    pub fn receive(&mut self, value: &str) -> bool {
        self.sync.receive(value)
    }

    pub fn selected(&self) -> Option<&UiOption> {
        let chosen = &self.sync.state().0;
        self.options.iter().find(|o| &o.id == chosen)
    }

    pub fn options(&self) -> &[UiOption] {
        &self.options
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
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

    fn headings() -> Vec<UiOption> {
        ["i", "ii", "iii"]
            .iter()
            .enumerate()
            .map(|(n, id)| UiOption {
                id: id.to_string(),
                label: format!("Heading {id}"),
                idx: Some(n as u32),
                order: None,
            })
            .collect()
    }

    #[test]
    fn select_and_clear() {
        let (cb, seen) = recorder();
        let mut w = HeadingSelect::new("q20", "Paragraph B", headings(), "", cb);
        assert!(w.selected().is_none());
        assert!(w.select("ii"));
        assert!(!w.select("ii"));
        assert!(!w.select("vii"));
        assert_eq!(w.selected().map(|o| o.label.as_str()), Some("Heading ii"));
        assert!(w.clear());
        assert_eq!(*seen.lock().unwrap(), vec!["ii".to_string(), String::new()]);
    }

    #[test]
    fn saved_choice_is_restored_without_notifying() {
        let (cb, seen) = recorder();
        let w = HeadingSelect::new("q20", "", headings(), "iii", cb);
        assert_eq!(w.value(), "iii");
        assert_eq!(w.phase(), SyncPhase::Synced);
        assert!(seen.lock().unwrap().is_empty());
    }
}
