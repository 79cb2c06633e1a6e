use thiserror::Error;

/// contribgrid error types
#[derive(Error, Debug)]
pub enum GridError {
    /// Failed to parse an entry file, day key or threshold list
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Invalid glob pattern for entry files
    #[error("pattern error: {0}")]
    Pattern(String),
}

/// Result type alias for contribgrid
pub type Result<T> = std::result::Result<T, GridError>;
