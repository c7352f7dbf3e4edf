//! Ticket engine error types
//!
//! Every failure aborts the current operation and is returned to the caller.
//! Notification failures never appear here; they are logged and dropped by
//! the alert dispatcher.

use thiserror::Error;

use crate::model::TicketId;
use crate::store::StoreError;

/// Result type alias for engine operations
pub type TicketResult<T> = Result<T, TicketError>;

/// Errors surfaced by [`crate::TicketEngine`]
#[derive(Error, Debug)]
pub enum TicketError {
    /// Title, description or assignee name missing at creation
    #[error("Invalid ticket: {reason}")]
    InvalidTicket { reason: String },

    /// Directory miss for an assignee, account manager or reassignment target
    #[error("User {username} not found")]
    UnknownUser { username: String },

    /// Malformed assignment or lookup request
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// No ticket stored under the requested id
    #[error("No ticket found for id {id}")]
    TicketNotFound { id: TicketId },

    /// The ticket store failed
    #[error("Ticket store error: {0}")]
    Store(#[from] StoreError),
}

impl TicketError {
    /// Create an invalid ticket error
    pub fn invalid_ticket(reason: impl Into<String>) -> Self {
        Self::InvalidTicket {
            reason: reason.into(),
        }
    }

    /// Create an unknown user error
    pub fn unknown_user(username: impl Into<String>) -> Self {
        Self::UnknownUser {
            username: username.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Machine-readable code, used by the CLI for exit reporting
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTicket { .. } => "INVALID_TICKET",
            Self::UnknownUser { .. } => "UNKNOWN_USER",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::TicketNotFound { .. } => "TICKET_NOT_FOUND",
            Self::Store(_) => "STORE_FAILURE",
        }
    }
}
