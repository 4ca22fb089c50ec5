//! Error handling shared by the workspace crates.
//!
//! Event listeners must never fail the authentication flow they observe, so
//! these errors are raised by setup code (configuration, registration) and
//! logged rather than propagated on the event path.

use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
