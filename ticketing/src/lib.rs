//! Support Desk Ticket Rules
//!
//! This library provides:
//! - Intake validation for incident reports
//! - A deterministic priority escalation policy (age and urgency keywords)
//! - Plain and priced ticket variants for non-paying and paying customers
//! - Assignment and reassignment against a user directory
//! - Fire-and-forget administrator alerts for High priority tickets
//!
//! # Collaborators
//!
//! The engine never owns global state. The user directory, ticket store and
//! notifier are passed in as trait objects:
//!
//! - [`UserDirectory`]: lookup-by-name plus the designated account manager
//! - [`TicketStore`]: keyed create/read/update, assigns ticket ids
//! - [`Notifier`]: best-effort administrator alert, driven by [`AlertDispatcher`]
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use ticketing::{AlertHandle, InMemoryDirectory, InMemoryTicketStore, NewTicket, Priority, TicketEngine};
//!
//! let (alerts, _rx) = AlertHandle::channel(16);
//! let engine = TicketEngine::new(
//!     Arc::new(InMemoryDirectory::default()),
//!     Arc::new(InMemoryTicketStore::new()),
//!     alerts,
//! );
//! let id = engine.create_ticket(NewTicket::new("System Crash", Priority::Medium, "Johan", "desc"))?;
//! engine.assign_ticket(id, "Marc")?;
//! ```

pub mod directory;
pub mod engine;
pub mod error;
pub mod model;
pub mod notify;
pub mod policy;
pub mod store;

pub use directory::{DirectoryError, DirectoryFile, InMemoryDirectory, UserDirectory};
pub use engine::{NewTicket, TicketEngine};
pub use error::{TicketError, TicketResult};
pub use model::{Priority, Ticket, TicketId, TicketKind, User};
pub use notify::{AdminAlert, AlertDispatcher, AlertHandle, LogNotifier, Notifier, NotifyError};
pub use policy::{escalate, EscalationOutcome, EscalationTrigger, URGENCY_KEYWORDS};
pub use store::{
    InMemoryTicketStore, JsonFileTicketStore, SharedTicketStore, StoreError, StoreResult,
    TicketStore,
};
