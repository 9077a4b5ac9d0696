//! Unified error handling for spinroom.
//!
//! This module provides the error hierarchy surfaced by event construction,
//! attribute loading and entity operations, with static codes for log
//! labelling.

use thiserror::Error;

// ============================================================================
// Remote call errors (dispatcher)
// ============================================================================

/// An outbound command reported failure.
///
/// Produced by a [`Dispatcher`](crate::dispatch::Dispatcher) and propagated
/// unchanged to whoever triggered the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote call {command} failed: {message}")]
pub struct RemoteCallError {
    pub command: String,
    pub message: String,
}

impl RemoteCallError {
    pub fn new(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Client errors (event construction and entity operations)
// ============================================================================

/// Errors raised while turning messages into events or running entity
/// operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The message names a command with no registered typecast. Fatal: the
    /// remote service speaks a protocol this client does not understand.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("message has no command field")]
    MissingCommand,

    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    RemoteCall(#[from] RemoteCallError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A precondition on room state (current song, current room) was false.
    #[error("{0}")]
    State(String),

    /// The session task stopped and no longer accepts work.
    #[error("session closed")]
    SessionClosed,

    #[error("invalid value for attribute {key}: expected {expected}")]
    Attribute {
        key: &'static str,
        expected: &'static str,
    },
}

impl ClientError {
    /// Get a static error code string for log labelling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "unknown_command",
            Self::MissingCommand => "missing_command",
            Self::Malformed(_) => "malformed_message",
            Self::RemoteCall(_) => "remote_call",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::State(_) => "state",
            Self::SessionClosed => "session_closed",
            Self::Attribute { .. } => "invalid_attribute",
        }
    }

    /// Whether the error means the client can no longer follow the stream.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnknownCommand(_))
    }

    pub(crate) fn not_playing() -> Self {
        Self::State("song is not currently playing".to_string())
    }

    pub(crate) fn no_room() -> Self {
        Self::State("client is not in a room".to_string())
    }
}

/// Result type for event construction and entity operations.
pub type ClientResult<T> = Result<T, ClientError>;

// ============================================================================
// Registry errors
// ============================================================================

/// Errors raised while building an event registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command {command} is already registered as {event}")]
    DuplicateCommand {
        command: &'static str,
        event: &'static str,
    },
}
