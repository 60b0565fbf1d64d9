//! The `examsync autosave` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use examsync_autosave::config::load_config_from;
use examsync_autosave::{build_payload, create_transport, wall_clock_revision};

use super::{load_attempt, read_json};

pub async fn execute(
    attempt_path: PathBuf,
    answers_path: PathBuf,
    dry_run: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let record = load_attempt(&attempt_path)?;
    let answers: BTreeMap<String, String> = read_json(&answers_path)?;
    let payload = build_payload(&answers, &record, wall_clock_revision());

    let skipped = answers.len() - payload.answers.len();
    if skipped > 0 {
        eprintln!("{skipped} answer(s) belong to no section of this attempt and were left out.");
    }

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let config = load_config_from(config_path.as_deref())?;
    let transport = create_transport(&config.autosave)?;
    info!(attempt = %record.attempt_id, answers = payload.answers.len(), "sending autosave");
    transport
        .save(&record.attempt_id, &payload)
        .await
        .with_context(|| format!("autosave for attempt {} failed", record.attempt_id))?;

    println!(
        "Saved {} answer(s) for attempt {} (revision {}).",
        payload.answers.len(),
        record.attempt_id,
        payload.client_revision
    );
    Ok(())
}
