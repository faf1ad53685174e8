//! Common error types for brinelog

use thiserror::Error;

/// Common result type for brinelog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the transport, upload, search, and store layers
///
/// Every failure is non-fatal to the process: callers log, surface a
/// message, and leave local state untouched. No variant triggers an
/// automatic retry.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested recipe/batch/note/image does not exist on the server
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server answered 401. The transport has already emitted
    /// `ClientEvent::AuthorizationRequired`; this value still reaches the
    /// caller so its local error path runs.
    #[error("Authorization required")]
    AuthorizationRequired,

    /// Server rejected the payload (4xx other than 401/404)
    #[error("Request rejected by server: {0}")]
    Validation(String),

    /// Network failure or 5xx response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Client-side guard violation (e.g. file selected mid-upload)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
