//! The `examsync init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("examsync.toml").exists() {
        println!("examsync.toml already exists, skipping.");
    } else {
        std::fs::write("examsync.toml", SAMPLE_CONFIG)?;
        println!("Created examsync.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set autosave.base_url in examsync.toml and export EXAMSYNC_API_TOKEN");
    println!("  2. Run: examsync map --questions questions.json");
    println!("  3. Run: examsync autosave --attempt attempt.json --answers answers.json --dry-run");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examsync configuration

[autosave]
base_url = "http://localhost:8080/api"
api_token = "${EXAMSYNC_API_TOKEN}"
# Quiet period before a batch of edits is saved.
quiet_period_ms = 2000
timeout_secs = 30

[session]
namespace = "examsync.attempt"
# storage_dir = "/tmp/examsync-sessions"
"#;
