use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{StoreError, StoreResult, TicketStore};
use crate::model::{Ticket, TicketId};

/// In-memory ticket store.
///
/// Ids are `highest existing id + 1`, starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryTicketStore {
    tickets: RwLock<BTreeMap<TicketId, Ticket>>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with already persisted tickets (ids are kept).
    pub fn from_tickets(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let map = tickets.into_iter().map(|t| (t.id, t)).collect();
        Self {
            tickets: RwLock::new(map),
        }
    }

    /// All tickets ordered by id
    pub fn snapshot(&self) -> StoreResult<Vec<Ticket>> {
        let tickets = self.tickets.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tickets.values().cloned().collect())
    }

    pub fn len(&self) -> StoreResult<usize> {
        let tickets = self.tickets.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tickets.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Run `f` under the write lock. Used by the file store to persist
    /// while no other writer can interleave.
    pub(crate) fn with_write<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<TicketId, Ticket>) -> StoreResult<R>,
    ) -> StoreResult<R> {
        let mut tickets = self.tickets.write().map_err(|_| StoreError::LockPoisoned)?;
        f(&mut tickets)
    }
}

pub(crate) fn insert_next(
    tickets: &mut BTreeMap<TicketId, Ticket>,
    mut ticket: Ticket,
) -> TicketId {
    let highest = tickets.keys().next_back().map(|id| id.0).unwrap_or(0);
    let id = TicketId(highest + 1);
    ticket.id = id;
    tickets.insert(id, ticket);
    id
}

/// Returns the replaced ticket, or `None` when the id was absent.
pub(crate) fn replace_existing(
    tickets: &mut BTreeMap<TicketId, Ticket>,
    ticket: Ticket,
) -> Option<Ticket> {
    tickets
        .get_mut(&ticket.id)
        .map(|slot| std::mem::replace(slot, ticket))
}

impl TicketStore for InMemoryTicketStore {
    fn create(&self, ticket: Ticket) -> StoreResult<TicketId> {
        self.with_write(|tickets| Ok(insert_next(tickets, ticket)))
    }

    fn read(&self, id: TicketId) -> StoreResult<Option<Ticket>> {
        let tickets = self.tickets.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tickets.get(&id).cloned())
    }

    fn update(&self, ticket: Ticket) -> StoreResult<()> {
        self.with_write(|tickets| {
            replace_existing(tickets, ticket);
            Ok(())
        })
    }
}
