//! Error types for the mindmate core.

/// Top-level error type for the companion core.
#[derive(Debug, thiserror::Error)]
pub enum MindMateError {
    /// Configuration error (missing candidate responses, bad config file).
    #[error("config error: {0}")]
    Config(String),

    /// Input rejected before classification (empty text, unknown mood).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Learned sentiment backend failed or timed out.
    ///
    /// Recovered by the keyword fallback; never returned from a classifier.
    #[error("backend error: {0}")]
    Backend(String),

    /// HTTP action surface error.
    #[error("server error: {0}")]
    Server(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MindMateError>;
