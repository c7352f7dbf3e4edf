//! JSON-snapshot ticket store
//!
//! ```text
//! create/update:  lock <file>.lock → reload <file> → apply
//!                 → write <file>.tmp → rename over <file> → unlock
//! read:           reload <file> → lookup
//! ```
//!
//! Several handles (and several processes) may share one snapshot file.
//! Writers serialize on an exclusive lock of the sidecar `.lock` file and
//! always start from what is on disk, so ids stay unique and no write is
//! lost. The snapshot is replaced by rename, so readers see either the old
//! or the new file, never a partial one.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::memory::{insert_next, replace_existing, InMemoryTicketStore};
use super::{StoreResult, TicketStore};
use crate::model::{Ticket, TicketId};

/// On-disk snapshot layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreSnapshot {
    tickets: Vec<Ticket>,
}

/// Ticket store persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonFileTicketStore {
    path: PathBuf,
    inner: InMemoryTicketStore,
}

impl JsonFileTicketStore {
    /// Open the snapshot at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let tickets = load_snapshot(&path)?;
        debug!(path = %path.display(), tickets = tickets.len(), "Ticket store opened");

        Ok(Self {
            path,
            inner: InMemoryTicketStore::from_tickets(tickets),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tickets ordered by id, as currently on disk
    pub fn snapshot(&self) -> StoreResult<Vec<Ticket>> {
        self.inner.with_write(|tickets| {
            self.reload(tickets)?;
            Ok(tickets.values().cloned().collect())
        })
    }

    fn reload(&self, tickets: &mut BTreeMap<TicketId, Ticket>) -> StoreResult<()> {
        *tickets = load_snapshot(&self.path)?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        Ok(())
    }

    /// Take the cross-process writer lock. Released when the file is dropped.
    fn lock(&self) -> StoreResult<File> {
        self.ensure_parent_dir()?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(sidecar(&self.path, "lock"))?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn ensure_parent_dir(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Write to `<file>.tmp`, then rename over the snapshot.
    fn persist(&self, tickets: &BTreeMap<TicketId, Ticket>) -> StoreResult<()> {
        let snapshot = StoreSnapshot {
            tickets: tickets.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        let temp_path = sidecar(&self.path, "tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

fn load_snapshot(path: &Path) -> StoreResult<Vec<Ticket>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str::<StoreSnapshot>(&json)?.tickets)
}

/// `tickets.json` → `tickets.json.<suffix>`
fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("tickets"));
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

impl TicketStore for JsonFileTicketStore {
    fn create(&self, ticket: Ticket) -> StoreResult<TicketId> {
        self.inner.with_write(|tickets| {
            let _lock = self.lock()?;
            self.reload(tickets)?;
            let id = insert_next(tickets, ticket);
            if let Err(e) = self.persist(tickets) {
                tickets.remove(&id);
                return Err(e);
            }
            Ok(id)
        })
    }

    fn read(&self, id: TicketId) -> StoreResult<Option<Ticket>> {
        self.inner.with_write(|tickets| {
            self.reload(tickets)?;
            Ok(tickets.get(&id).cloned())
        })
    }

    fn update(&self, ticket: Ticket) -> StoreResult<()> {
        self.inner.with_write(|tickets| {
            let _lock = self.lock()?;
            self.reload(tickets)?;
            let Some(previous) = replace_existing(tickets, ticket) else {
                return Ok(());
            };
            if let Err(e) = self.persist(tickets) {
                tickets.insert(previous.id, previous);
                return Err(e);
            }
            Ok(())
        })
    }
}
