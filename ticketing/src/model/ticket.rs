//! Ticket record and its plain / priced variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::priority::Priority;
use super::user::User;

/// Store-assigned ticket identifier. Valid ids are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub u64);

impl TicketId {
    /// Placeholder carried by a ticket until the store assigns its id
    pub const UNASSIGNED: TicketId = TicketId(0);

    pub fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shape of a ticket, selected by the caller's paying-customer flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TicketKind {
    /// Non-paying customer: no pricing fields at all
    Plain,
    /// Paying customer: always carries an account manager and a price
    Priced {
        account_manager: User,
        price_dollars: u32,
    },
}

/// A support desk ticket.
///
/// Priority, description and kind are fixed at creation. Only the assigned
/// user changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub priority: Priority,
    pub description: String,
    pub assigned_user: User,
    /// Incident time supplied by the caller
    pub created: DateTime<Utc>,
    pub kind: TicketKind,
}

impl Ticket {
    /// Build a ticket for a non-paying customer. The id is assigned by the store.
    pub fn plain(
        title: impl Into<String>,
        priority: Priority,
        assigned_user: User,
        description: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TicketId::UNASSIGNED,
            title: title.into(),
            priority,
            description: description.into(),
            assigned_user,
            created,
            kind: TicketKind::Plain,
        }
    }

    /// Build a ticket for a paying customer, priced from `priority`.
    pub fn priced(
        title: impl Into<String>,
        priority: Priority,
        assigned_user: User,
        description: impl Into<String>,
        created: DateTime<Utc>,
        account_manager: User,
    ) -> Self {
        Self {
            kind: TicketKind::Priced {
                account_manager,
                price_dollars: priority.price_dollars(),
            },
            ..Self::plain(title, priority, assigned_user, description, created)
        }
    }

    pub fn is_priced(&self) -> bool {
        matches!(self.kind, TicketKind::Priced { .. })
    }

    pub fn price_dollars(&self) -> Option<u32> {
        match &self.kind {
            TicketKind::Plain => None,
            TicketKind::Priced { price_dollars, .. } => Some(*price_dollars),
        }
    }

    pub fn account_manager(&self) -> Option<&User> {
        match &self.kind {
            TicketKind::Plain => None,
            TicketKind::Priced {
                account_manager, ..
            } => Some(account_manager),
        }
    }
}
