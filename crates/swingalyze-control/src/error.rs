//! Error types for the static asset server
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ControlError {
    /// Binding failed for a reason other than the port being taken
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Every port from the start port up to 65535 was taken
    #[error("No free port at or above {start}")]
    PortsExhausted { start: u16 },

    /// HTTP serving error
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] swingalyze_core::CoreError),
}

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ControlError>;
