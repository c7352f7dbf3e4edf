//! Domain model: users, priorities and the two ticket variants.

pub mod priority;
pub mod ticket;
pub mod user;

pub use priority::{ParsePriorityError, Priority};
pub use ticket::{Ticket, TicketId, TicketKind};
pub use user::User;
