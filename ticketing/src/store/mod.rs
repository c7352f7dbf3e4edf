//! Ticket persistence
//!
//! The engine depends only on the [`TicketStore`] trait. Two implementations
//! ship with the crate:
//!
//! - [`InMemoryTicketStore`]: lock-guarded map, one instance per process or test
//! - [`JsonFileTicketStore`]: the in-memory store plus a JSON snapshot rewritten
//!   after every create/update, so separate CLI runs share tickets
//!
//! Stores own id assignment (strictly positive, `max + 1`) and serialize
//! create/read/update so concurrent reassignments cannot lose updates.

pub mod json_file;
pub mod memory;

use std::sync::Arc;

use crate::model::{Ticket, TicketId};

pub use json_file::JsonFileTicketStore;
pub use memory::InMemoryTicketStore;

/// Error type for ticket store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lock poisoned")]
    LockPoisoned,
}

/// Result type for ticket store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared reference to a ticket store
pub type SharedTicketStore = Arc<dyn TicketStore>;

/// Keyed create/read/update over tickets.
#[cfg_attr(test, mockall::automock)]
pub trait TicketStore: Send + Sync {
    /// Persist a new ticket and return its freshly assigned id.
    fn create(&self, ticket: Ticket) -> StoreResult<TicketId>;

    /// Fetch a ticket by id.
    fn read(&self, id: TicketId) -> StoreResult<Option<Ticket>>;

    /// Replace the stored ticket with the same id. No-op if absent.
    fn update(&self, ticket: Ticket) -> StoreResult<()>;
}
