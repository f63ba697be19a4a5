mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "onboard",
    about = "Comment-triggered mannequin onboarding — parse a command comment, resolve the data file, run the batch step",
    version,
    propagate_version = true
)]
struct Cli {
    /// Repository root (default: auto-detect from .onboard/ or .git/)
    #[arg(long, global = true, env = "ONBOARD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline for one comment: filter, parse, resolve, dispatch
    Run {
        /// Comment body as a literal string
        #[arg(long, conflicts_with_all = ["body_file", "event_file"])]
        body: Option<String>,

        /// Read the comment body from a file
        #[arg(long, conflicts_with = "event_file")]
        body_file: Option<PathBuf>,

        /// Read a GitHub issue_comment event payload (JSON)
        #[arg(long)]
        event_file: Option<PathBuf>,

        /// Comment author login (informational; taken from the event payload
        /// when --event-file is used)
        #[arg(long)]
        actor: Option<String>,
    },

    /// Run the batch operation directly: onboard every mannequin in a CSV
    Process {
        /// CSV file to process
        #[arg(long, env = "CSV_FILE")]
        file: PathBuf,

        /// GitHub API base URL
        #[arg(long, default_value = onboard_core::github::GITHUB_API_URL)]
        api_url: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // INFO by default: the extracted argument, resolved path, and dispatch
    // outcome are part of the run's audit trail.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Run {
            body,
            body_file,
            event_file,
            actor,
        } => cmd::run::run(&root, body, body_file, event_file, actor, cli.json),
        Commands::Process { file, api_url } => cmd::process::run(&file, &api_url, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
