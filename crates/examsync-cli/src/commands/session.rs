//! The `examsync session` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use examsync_autosave::config::load_config_from;
use examsync_core::model::AttemptStartPayload;
use examsync_session::{AttemptSessionStore, FileBackend};

use super::{attempt_failure, read_json};
use crate::SessionAction;

pub fn execute(
    action: SessionAction,
    storage_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let root = storage_dir.unwrap_or(config.session.storage_dir);
    let namespace = config.session.namespace;

    match action {
        SessionAction::Register { attempt, session } => {
            let payload: AttemptStartPayload = read_json(&attempt)?;
            let backend = match session {
                Some(id) => FileBackend::open(&root, &id)?,
                None => FileBackend::new_session(&root)?,
            };
            let session_id = backend.session_id().to_string();
            let mut store = AttemptSessionStore::with_namespace(Arc::new(backend), &namespace);
            let record = store.start(payload).map_err(|e| match e {
                examsync_session::SessionError::Attempt(e) => attempt_failure(e),
                other => other.into(),
            })?;
            println!(
                "Registered attempt {} in session {session_id}",
                record.attempt_id
            );
        }
        SessionAction::List { session } => {
            let mut store = open_existing(&root, &session, &namespace)?;
            if store.is_empty() {
                println!("Session {session} holds no attempts.");
                return Ok(());
            }
            print_attempts(&mut store);
        }
        SessionAction::Clear {
            session,
            attempt,
            end,
        } => {
            let mut store = open_existing(&root, &session, &namespace)?;
            store.clear(attempt.as_deref())?;
            match &attempt {
                Some(id) => println!("Cleared attempt {id} from session {session}"),
                None => println!("Cleared all attempts from session {session}"),
            }
            if end {
                drop(store);
                FileBackend::open(&root, &session)?.end_session()?;
                println!("Ended session {session}");
            }
        }
    }

    Ok(())
}

fn open_existing(root: &Path, session: &str, namespace: &str) -> Result<AttemptSessionStore> {
    if !root.join(session).is_dir() {
        anyhow::bail!("no such session: {session} (in {})", root.display());
    }
    let backend = FileBackend::open(root, session)?;
    Ok(AttemptSessionStore::with_namespace(
        Arc::new(backend),
        namespace,
    ))
}

fn print_attempts(store: &mut AttemptSessionStore) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Attempt",
        "Paper",
        "Sections",
        "Questions",
        "Started",
        "Time left",
    ]);

    let ids: Vec<String> = store.ids().into_iter().map(str::to_string).collect();
    for id in ids {
        let Some(record) = store.get(&id) else {
            continue;
        };
        let time_left = record
            .time_left
            .map(|secs| format!("{}m {:02}s", secs / 60, secs % 60))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&record.attempt_id),
            Cell::new(&record.paper.title),
            Cell::new(record.sections.len()),
            Cell::new(record.questions().count()),
            Cell::new(record.started_at.format("%Y-%m-%d %H:%M")),
            Cell::new(time_left),
        ]);
    }

    println!("{table}");
}
