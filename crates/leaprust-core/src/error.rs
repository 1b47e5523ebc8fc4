//! Error types for LeapRust

use thiserror::Error;

/// Core LeapRust errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeapRustError {
    // Registration errors
    #[error("Listener already registered on this controller")]
    ListenerAlreadyRegistered,

    #[error("No listener registered on this controller")]
    ListenerNotRegistered,

    // Delivery errors
    #[error("Mailbox closed")]
    MailboxClosed,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Thread spawn failed: {0}")]
    Spawn(String),
}

/// Result type for LeapRust operations
pub type LeapRustResult<T> = Result<T, LeapRustError>;
