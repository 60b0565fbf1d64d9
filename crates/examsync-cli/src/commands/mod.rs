pub mod autosave;
pub mod init;
pub mod inspect;
pub mod map;
pub mod session;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use examsync_core::error::AttemptError;
use examsync_core::model::{AttemptRecord, AttemptStartPayload, BackendQuestion};
use examsync_core::widgets::ChangeCallback;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionSource {
    List(Vec<BackendQuestion>),
    Attempt(Box<AttemptStartPayload>),
}

/// Questions from either a bare list or every section of an attempt-start payload.
pub fn load_questions(path: &Path) -> Result<Vec<BackendQuestion>> {
    let questions = match read_json::<QuestionSource>(path)? {
        QuestionSource::List(list) => list,
        QuestionSource::Attempt(payload) => payload
            .paper
            .sections
            .into_iter()
            .flat_map(|s| s.question_groups)
            .flat_map(|g| g.questions)
            .collect(),
    };
    Ok(questions)
}

pub fn load_attempt(path: &Path) -> Result<AttemptRecord> {
    let payload: AttemptStartPayload = read_json(path)?;
    AttemptRecord::from_start(payload).map_err(attempt_failure)
}

pub fn attempt_failure(e: AttemptError) -> anyhow::Error {
    anyhow::anyhow!("{} ({e})", e.user_message())
}

/// Widgets built by the CLI are never edited.
pub fn ignore_changes() -> ChangeCallback {
    Box::new(|_| {})
}
