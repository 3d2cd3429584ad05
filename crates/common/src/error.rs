//! Error types for flowcheck

use thiserror::Error;

/// Result type alias using the flowcheck Error
pub type Result<T> = std::result::Result<T, Error>;

/// Flowcheck error types
///
/// A flow aborts at the first error; there are no retries. Errors are
/// scoped to the failing scenario only — sibling scenarios run against a
/// freshly loaded fixture and are unaffected.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Browser runner not found. Install with: npx playwright install")]
    BrowserNotFound,

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Fixture server failed to start: {0}")]
    ServerStartup(String),

    #[error("Fixture health check failed after {0} attempts")]
    ServerHealthCheck(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
