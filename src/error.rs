use thiserror::Error;

/// Unified error type for release-cut operations
#[derive(Error, Debug)]
pub enum ReleaseCutError {
    #[error("Malformed version '{input}': {reason}")]
    MalformedVersion { input: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Hook error: {0}")]
    Hook(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-cut
pub type Result<T> = std::result::Result<T, ReleaseCutError>;

impl ReleaseCutError {
    /// Create a malformed version error for the given input
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseCutError::MalformedVersion {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseCutError::Config(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        ReleaseCutError::Branch(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseCutError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseCutError::Remote(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        ReleaseCutError::Hook(msg.into())
    }

    /// True when the error came from parsing the version of record
    pub fn is_malformed_version(&self) -> bool {
        matches!(self, ReleaseCutError::MalformedVersion { .. })
    }
}
