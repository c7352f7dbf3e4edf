//! Ticket Rules Engine: creation and assignment orchestration
//!
//! ```text
//! create_ticket:  validate → resolve assignee → escalate → build variant
//!                 → store.create → (High) submit alert → id
//! assign_ticket:  check args → store.read → same user? no-op
//!                 → resolve user → store.update
//! ```
//!
//! The engine holds no mutable state of its own. Every collaborator is passed
//! in at construction, so one engine can be shared across threads and each
//! test builds its own store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::directory::UserDirectory;
use crate::error::{TicketError, TicketResult};
use crate::model::{Priority, Ticket, TicketId, User};
use crate::notify::{AdminAlert, AlertHandle};
use crate::policy;
use crate::store::{SharedTicketStore, TicketStore};

/// Incident report submitted for ticket creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    /// Priority requested by the reporter, before escalation
    pub priority: Priority,
    /// Username of the person responsible for the ticket
    pub assignee: String,
    pub description: String,
    /// When the incident happened
    pub created: DateTime<Utc>,
    /// Selects the priced variant with an account manager
    pub paying_customer: bool,
}

impl NewTicket {
    /// A non-paying report created now.
    pub fn new(
        title: impl Into<String>,
        priority: Priority,
        assignee: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            priority,
            assignee: assignee.into(),
            description: description.into(),
            created: Utc::now(),
            paying_customer: false,
        }
    }

    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    pub fn paying_customer(mut self, paying: bool) -> Self {
        self.paying_customer = paying;
        self
    }

    fn validate(&self) -> TicketResult<()> {
        if self.title.is_empty() || self.description.is_empty() || self.assignee.is_empty() {
            return Err(TicketError::invalid_ticket(
                "title, description and assignee are required",
            ));
        }
        Ok(())
    }
}

/// Applies intake and assignment rules over the injected collaborators.
#[derive(Clone)]
pub struct TicketEngine {
    directory: Arc<dyn UserDirectory>,
    store: SharedTicketStore,
    alerts: AlertHandle,
}

impl TicketEngine {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        store: SharedTicketStore,
        alerts: AlertHandle,
    ) -> Self {
        Self {
            directory,
            store,
            alerts,
        }
    }

    /// Create a ticket, evaluating the age rule against the current time.
    pub fn create_ticket(&self, request: NewTicket) -> TicketResult<TicketId> {
        self.create_ticket_at(request, Utc::now())
    }

    /// Create a ticket with an explicit evaluation time.
    ///
    /// `now` is read once and used for every time-based rule in the call.
    pub fn create_ticket_at(
        &self,
        request: NewTicket,
        now: DateTime<Utc>,
    ) -> TicketResult<TicketId> {
        request.validate()?;

        let NewTicket {
            title,
            priority: requested,
            assignee,
            description,
            created,
            paying_customer,
        } = request;

        let assigned_user = self.resolve_user(&assignee)?;

        let outcome = policy::escalate(requested, created, &title, now);
        if let Some(trigger) = outcome.trigger {
            debug!(
                requested = %outcome.requested,
                escalated = %outcome.priority,
                %trigger,
                "Priority escalated"
            );
        }
        let priority = outcome.priority;

        // Pricing depends on the escalated priority, so the variant is built last.
        let ticket = if paying_customer {
            let account_manager = self.resolve_account_manager()?;
            Ticket::priced(
                title.clone(),
                priority,
                assigned_user,
                description,
                created,
                account_manager,
            )
        } else {
            Ticket::plain(title.clone(), priority, assigned_user, description, created)
        };
        let price = ticket.price_dollars();

        let id = self.store.create(ticket)?;
        debug_assert!(id.is_assigned(), "store returned an unassigned id");

        if priority == Priority::High {
            self.alerts.submit(AdminAlert::new(title, assignee.clone()));
        }

        info!(
            id = %id,
            priority = %priority,
            assignee = %assignee,
            paying_customer,
            price_dollars = ?price,
            "Ticket created"
        );
        Ok(id)
    }

    /// Reassign a ticket to another user. Priority, pricing and description
    /// are left untouched.
    pub fn assign_ticket(&self, id: TicketId, new_assignee: &str) -> TicketResult<()> {
        if !id.is_assigned() || new_assignee.is_empty() {
            return Err(TicketError::invalid_argument("invalid ticket id or username"));
        }

        let mut ticket = self
            .store
            .read(id)?
            .ok_or(TicketError::TicketNotFound { id })?;

        if ticket.assigned_user.username == new_assignee {
            debug!(id = %id, assignee = %new_assignee, "Ticket already assigned, nothing to do");
            return Ok(());
        }

        let user = self.resolve_user(new_assignee)?;
        let to = user.display_name();
        let previous = std::mem::replace(&mut ticket.assigned_user, user);
        self.store.update(ticket)?;

        info!(
            id = %id,
            from = %previous.display_name(),
            to = %to,
            "Ticket reassigned"
        );
        Ok(())
    }

    /// Fetch a stored ticket.
    pub fn ticket(&self, id: TicketId) -> TicketResult<Ticket> {
        if !id.is_assigned() {
            return Err(TicketError::invalid_argument("invalid ticket id"));
        }
        self.store
            .read(id)?
            .ok_or(TicketError::TicketNotFound { id })
    }

    fn resolve_user(&self, username: &str) -> TicketResult<User> {
        self.directory
            .lookup_user(username)
            .ok_or_else(|| TicketError::unknown_user(username))
    }

    fn resolve_account_manager(&self) -> TicketResult<User> {
        self.directory
            .lookup_account_manager()
            .ok_or_else(|| TicketError::unknown_user("account manager"))
    }
}
