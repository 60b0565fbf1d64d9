//! examsync CLI — inspect prompts, map questions, and drive sessions and autosave.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "examsync",
    version,
    about = "Exam prompt parsing and answer synchronization"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a prompt is split, tokenized and parsed
    Inspect {
        /// Path to a prompt text/markdown file
        #[arg(long)]
        prompt: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Classify backend question records into UI kinds
    Map {
        /// JSON file holding a question list or an attempt-start payload
        #[arg(long)]
        questions: PathBuf,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Report question records whose prompts do not parse for their kind
    Validate {
        /// JSON file holding a question list or an attempt-start payload
        #[arg(long)]
        questions: PathBuf,
    },

    /// Build the autosave payload for an attempt and send it once
    Autosave {
        /// Attempt-start payload JSON
        #[arg(long)]
        attempt: PathBuf,

        /// JSON object of question id → stored answer string
        #[arg(long)]
        answers: PathBuf,

        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Manage attempts held in a file-backed session
    Session {
        #[command(subcommand)]
        action: SessionAction,

        /// Root directory for session storage (overrides config)
        #[arg(long, global = true)]
        storage_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long, global = true)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Register an attempt-start payload
    Register {
        #[arg(long)]
        attempt: PathBuf,

        /// Session to resume; a new session is created when omitted
        #[arg(long)]
        session: Option<String>,
    },

    /// List attempts held by a session
    List {
        #[arg(long)]
        session: String,
    },

    /// Remove one attempt, or all of them
    Clear {
        #[arg(long)]
        session: String,

        /// Attempt to remove; every attempt is removed when omitted
        #[arg(long)]
        attempt: Option<String>,

        /// Also delete the session directory
        #[arg(long)]
        end: bool,
    },
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("examsync=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { prompt, format } => commands::inspect::execute(prompt, format),
        Commands::Map { questions, format } => commands::map::execute(questions, format),
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Autosave {
            attempt,
            answers,
            dry_run,
            config,
        } => commands::autosave::execute(attempt, answers, dry_run, config).await,
        Commands::Session {
            action,
            storage_dir,
            config,
        } => commands::session::execute(action, storage_dir, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
