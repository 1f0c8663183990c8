//! Error type shared by every scriptbox utility.

/// Errors that can occur in the scriptbox library.
#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("CPU sampling error: {0}")]
    Sampling(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Timed out after {0}ms")]
    Timeout(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type.
pub type ScriptResult<T> = Result<T, ScriptError>;
