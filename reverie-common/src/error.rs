//! Common error types for Reverie

use thiserror::Error;

/// Common result type for Reverie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Reverie crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
