//! The comment-to-dispatch pipeline.
//!
//! One strictly linear pass per run: filter → parse → resolve → dispatch →
//! report. No state survives a run and nothing re-enters an earlier stage.
//! A comment without the trigger token is a neutral no-op, not a failure;
//! every later-stage error propagates to a failing terminal status.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::credential::Credential;
use crate::dispatch::{Dispatcher, Outcome};
use crate::error::{OnboardError, Result};
use crate::event::CommentEvent;
use crate::{resolve, trigger};

/// Terminal classification of a run that did not fail.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The comment did not contain the trigger token; nothing was searched
    /// or dispatched.
    Skipped,
    /// The batch operation ran to completion with exit code 0.
    Completed { argument: String, file: PathBuf },
}

/// Run the whole pipeline for one comment event.
///
/// The credential is only required once a dispatch is actually going to
/// happen — an unrelated comment stays a no-op even without one.
pub async fn run(
    event: &CommentEvent,
    config: &Config,
    credential: Option<&Credential>,
    root: &Path,
) -> Result<RunOutcome> {
    let Some(command) = trigger::parse(&event.body, &config.trigger.token) else {
        tracing::info!("comment does not contain the trigger token; nothing to do");
        return Ok(RunOutcome::Skipped);
    };

    let argument = command.argument.as_deref().unwrap_or("");
    tracing::info!(argument, actor = event.actor.as_deref(), "trigger matched");

    let file = match resolve::resolve(root, argument) {
        Ok(file) => file,
        Err(e) => {
            tracing::error!(argument, error = %e, "file resolution failed");
            return Err(e);
        }
    };
    tracing::info!(file = %file.display(), "resolved data file");

    let credential = credential.ok_or(OnboardError::CredentialMissing)?;

    let dispatcher = Dispatcher::new(&config.batch);
    match dispatcher.dispatch(root, &file, credential).await? {
        Outcome::Success => {
            tracing::info!("batch operation succeeded");
            Ok(RunOutcome::Completed {
                argument: argument.to_string(),
                file,
            })
        }
        Outcome::Failure { code } => {
            tracing::error!(code, "one or more onboarding processes failed; check logs for details");
            Err(OnboardError::DispatchFailed { code })
        }
    }
}
