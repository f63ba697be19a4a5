//! Batch operation invocation.
//!
//! The batch operation is an opaque subprocess. It receives the resolved file
//! and the credential through its environment (`CSV_FILE`, `GITHUB_TOKEN`) —
//! never through argv, where the token would show up in process listings.
//! Its stdout/stderr flow through to the hosting environment's log stream
//! unmodified; only the exit code feeds back into the pipeline.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use crate::config::BatchConfig;
use crate::credential::Credential;
use crate::error::{OnboardError, Result};

/// Environment key for the resolved file path.
pub const FILE_ENV: &str = "CSV_FILE";
/// Environment key for the credential.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure { code: i32 },
}

pub struct Dispatcher<'a> {
    config: &'a BatchConfig,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a BatchConfig) -> Self {
        Self { config }
    }

    /// Invoke the batch operation once, synchronously to completion, bounded
    /// by the configured timeout. No retry: the operation's idempotence is
    /// its own contract.
    pub async fn dispatch(
        &self,
        root: &Path,
        file: &Path,
        credential: &Credential,
    ) -> Result<Outcome> {
        let argv = &self.config.command;
        let program = argv.first().ok_or(OnboardError::BatchCommandEmpty)?;
        let program = resolve_program(root, program)?;

        let mut cmd = tokio::process::Command::new(&program);
        cmd.args(&argv[1..]);
        cmd.current_dir(root);
        cmd.env(FILE_ENV, file);
        cmd.env(TOKEN_ENV, credential.expose());
        cmd.stdin(Stdio::null());
        // Batch output goes straight to the hosting environment's log stream.
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        cmd.kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| OnboardError::DispatchSpawn(e.to_string()))?;

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let status = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => return Err(OnboardError::Aborted(e.to_string())),
            Err(_) => {
                let _ = child.kill().await;
                return Err(OnboardError::Aborted(format!(
                    "timed out after {}s",
                    self.config.timeout_seconds
                )));
            }
        };

        if status.success() {
            Ok(Outcome::Success)
        } else if let Some(code) = status.code() {
            Ok(Outcome::Failure { code })
        } else {
            // Killed by a signal — externally terminated.
            Err(OnboardError::Aborted("terminated by signal".to_string()))
        }
    }
}

/// Resolve the batch program: bare names go through PATH lookup, anything
/// with a path component is taken relative to the repository root.
fn resolve_program(root: &Path, program: &str) -> Result<PathBuf> {
    let as_path = Path::new(program);
    if as_path.components().count() > 1 {
        let full = if as_path.is_absolute() {
            as_path.to_path_buf()
        } else {
            root.join(as_path)
        };
        if full.exists() {
            Ok(full)
        } else {
            Err(OnboardError::BatchCommandMissing(program.to_string()))
        }
    } else {
        which::which(program).map_err(|_| OnboardError::BatchCommandMissing(program.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn batch(argv: &[&str], timeout_seconds: u64) -> BatchConfig {
        BatchConfig {
            command: argv.iter().map(|s| s.to_string()).collect(),
            timeout_seconds,
        }
    }

    fn cred() -> Credential {
        Credential::new("test-token")
    }

    #[tokio::test]
    async fn zero_exit_is_success() {
        let dir = TempDir::new().unwrap();
        let config = batch(&["sh", "-c", "exit 0"], 30);
        let outcome = Dispatcher::new(&config)
            .dispatch(dir.path(), Path::new("data.csv"), &cred())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Success);
    }

    #[tokio::test]
    async fn nonzero_exit_is_failure_with_code() {
        let dir = TempDir::new().unwrap();
        let config = batch(&["sh", "-c", "exit 3"], 30);
        let outcome = Dispatcher::new(&config)
            .dispatch(dir.path(), Path::new("data.csv"), &cred())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Failure { code: 3 });
    }

    #[tokio::test]
    async fn file_and_token_arrive_via_environment() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("seen.txt");
        let script = format!("printf '%s %s' \"$CSV_FILE\" \"$GITHUB_TOKEN\" > {}", out.display());
        let config = batch(&["sh", "-c", &script], 30);
        Dispatcher::new(&config)
            .dispatch(dir.path(), Path::new("/tmp/data.csv"), &cred())
            .await
            .unwrap();
        let seen = std::fs::read_to_string(&out).unwrap();
        assert_eq!(seen, "/tmp/data.csv test-token");
    }

    #[tokio::test]
    async fn timeout_aborts_the_operation() {
        let dir = TempDir::new().unwrap();
        let config = batch(&["sh", "-c", "sleep 10"], 1);
        let result = Dispatcher::new(&config)
            .dispatch(dir.path(), Path::new("data.csv"), &cred())
            .await;
        assert!(matches!(result, Err(OnboardError::Aborted(_))));
    }

    #[tokio::test]
    async fn missing_program_is_reported() {
        let dir = TempDir::new().unwrap();
        let config = batch(&["definitely-not-a-real-binary-xyz"], 30);
        let result = Dispatcher::new(&config)
            .dispatch(dir.path(), Path::new("data.csv"), &cred())
            .await;
        assert!(matches!(result, Err(OnboardError::BatchCommandMissing(_))));
    }

    #[tokio::test]
    async fn empty_command_is_rejected() {
        let dir = TempDir::new().unwrap();
        let config = batch(&[], 30);
        let result = Dispatcher::new(&config)
            .dispatch(dir.path(), Path::new("data.csv"), &cred())
            .await;
        assert!(matches!(result, Err(OnboardError::BatchCommandEmpty)));
    }

    #[tokio::test]
    async fn relative_script_resolves_against_root() {
        let dir = TempDir::new().unwrap();
        let script_dir = dir.path().join("scripts");
        std::fs::create_dir_all(&script_dir).unwrap();
        let script = script_dir.join("batch.sh");
        std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        let config = batch(&["scripts/batch.sh"], 30);
        let outcome = Dispatcher::new(&config)
            .dispatch(dir.path(), Path::new("data.csv"), &cred())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Success);
    }
}
