use std::path::{Path, PathBuf};

use anyhow::Context;
use onboard_core::config::Config;
use onboard_core::dispatch::TOKEN_ENV;
use onboard_core::event::CommentEvent;
use onboard_core::pipeline::{self, RunOutcome};
use onboard_core::Credential;

use crate::output;

pub fn run(
    root: &Path,
    body: Option<String>,
    body_file: Option<PathBuf>,
    event_file: Option<PathBuf>,
    actor: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let event = load_event(body, body_file, event_file, actor)?;
    let config = Config::load(root).context("failed to load config")?;
    let credential = Credential::from_env(TOKEN_ENV);

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(pipeline::run(&event, &config, credential.as_ref(), root))?;

    if json {
        output::print_json(&outcome)?;
    } else {
        match &outcome {
            RunOutcome::Skipped => {
                println!("no trigger in comment; nothing to do");
            }
            RunOutcome::Completed { argument, file } => {
                println!("onboarding complete for '{}' ({})", argument, file.display());
            }
        }
    }
    Ok(())
}

fn load_event(
    body: Option<String>,
    body_file: Option<PathBuf>,
    event_file: Option<PathBuf>,
    actor: Option<String>,
) -> anyhow::Result<CommentEvent> {
    if let Some(body) = body {
        return Ok(CommentEvent::new(body, actor));
    }
    if let Some(path) = body_file {
        let body = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read body file '{}'", path.display()))?;
        return Ok(CommentEvent::new(body, actor));
    }
    if let Some(path) = event_file {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read event file '{}'", path.display()))?;
        return CommentEvent::from_issue_comment_json(&raw)
            .context("failed to parse event payload");
    }
    anyhow::bail!("one of --body, --body-file, or --event-file is required")
}
