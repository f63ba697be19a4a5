use thiserror::Error;

#[derive(Debug, Error)]
pub enum OnboardError {
    #[error("no file argument given after the trigger token")]
    ArgumentMissing,

    #[error("invalid file argument '{0}': path separators and parent segments are not allowed")]
    InvalidArgument(String),

    #[error("no file named '{0}' found in the repository tree")]
    FileNotFound(String),

    #[error("GITHUB_TOKEN is not set")]
    CredentialMissing,

    #[error("batch command '{0}' not found")]
    BatchCommandMissing(String),

    #[error("batch command is empty: set batch.command in .onboard/config.yaml")]
    BatchCommandEmpty,

    #[error("failed to spawn batch command: {0}")]
    DispatchSpawn(String),

    #[error("one or more onboarding processes failed: batch operation exited with code {code}")]
    DispatchFailed { code: i32 },

    #[error("batch operation aborted: {0}")]
    Aborted(String),

    #[error("invalid event payload: {0}")]
    InvalidEvent(String),

    #[error("CSV header mismatch: expected '{expected}', got '{got}'")]
    CsvHeader { expected: String, got: String },

    #[error("invalid mannequin row: {0}")]
    InvalidRow(String),

    #[error("GitHub API request failed: {0}")]
    Api(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OnboardError>;
