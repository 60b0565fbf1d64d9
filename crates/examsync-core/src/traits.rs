//! Seams shared between the core and the autosave/session crates.

use std::collections::HashMap;

use crate::model::AttemptRecord;

/// Resolves the section that owns a question.
///
/// The autosave scheduler uses this to attach a `sectionId` to every answer
/// it sends; an attempt record is the usual implementation.
pub trait SectionResolver: Send + Sync {
    fn section_for(&self, question_id: &str) -> Option<String>;
}

impl SectionResolver for AttemptRecord {
    fn section_for(&self, question_id: &str) -> Option<String> {
        self.section_of(question_id).map(str::to_string)
    }
}

/// A plain question id → section id table.
impl SectionResolver for HashMap<String, String> {
    fn section_for(&self, question_id: &str) -> Option<String> {
        self.get(question_id).cloned()
    }
}
