//! Common error types used throughout photoforge.

/// Common error type for photoforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A format name was not recognised.
    #[error("Unknown image format: {0}")]
    UnknownFormat(String),
}

impl Error {
    /// Create a new UnknownFormat error.
    pub fn unknown_format<S: Into<String>>(name: S) -> Self {
        Self::UnknownFormat(name.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
