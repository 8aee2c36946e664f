//! Error types for photoforge-av.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while transcoding images or running external tools.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool could not be started.
    #[error("failed to spawn {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// An external tool failed to execute.
    #[error("tool execution failed: {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// The specified file was not found.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// HEIF decoding failed.
    #[cfg(feature = "heif")]
    #[error("HEIF error: {0}")]
    Heif(String),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unsupported operation or format.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The encoder reported success but the output is missing or empty.
    #[error("output not written: {}", path.display())]
    EmptyOutput { path: PathBuf },

    /// Another input of the same run already produced this output.
    #[error("output already written by another file in this run: {}", path.display())]
    DuplicateOutput { path: PathBuf },
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool spawn error.
    pub fn tool_spawn(tool: impl Into<String>, source: std::io::Error) -> Self {
        Self::ToolSpawn {
            tool: tool.into(),
            source,
        }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

#[cfg(feature = "heif")]
impl From<libheif_rs::HeifError> for Error {
    fn from(err: libheif_rs::HeifError) -> Self {
        Error::Heif(err.to_string())
    }
}
