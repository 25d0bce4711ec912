//! Common error types used throughout subscout.
//!
//! The variants mirror how failures are handled by the subtitle pipeline:
//! `NotFound` is always recovered locally, `MediaServer` and `Provider` are
//! recoverable per video, and `RestoreDefaultTrack` is swallowed by callers.

/// Common error type for subscout.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A video, session, or episode could not be found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A call to the media server failed.
    #[error("Media server error: {0}")]
    MediaServer(String),

    /// A subtitle provider search or save failed.
    #[error("Subtitle provider error: {0}")]
    Provider(String),

    /// Restoring the previously default subtitle track failed.
    #[error("Failed to restore default subtitle track: {0}")]
    RestoreDefaultTrack(String),

    /// Invalid input was provided (malformed event, bad config value).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new MediaServer error.
    pub fn media_server<S: Into<String>>(msg: S) -> Self {
        Self::MediaServer(msg.into())
    }

    /// Create a new Provider error.
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error only means "nothing to do".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
