//! Integration tests for the ticket engine
//!
//! Drives the engine through its public API with the in-process directory,
//! store and alert dispatcher, covering the intake and reassignment flows
//! end to end.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use ticketing::{
    AdminAlert, AlertDispatcher, InMemoryDirectory, InMemoryTicketStore, JsonFileTicketStore,
    NewTicket, Notifier, NotifyError, Priority, TicketEngine, TicketError, TicketKind,
    TicketStore, User,
};

const DESCRIPTION: &str = "The system crashed when user performed a search";

#[derive(Default)]
struct RecordingNotifier {
    alerts: Mutex<Vec<AdminAlert>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_administrator(&self, alert: &AdminAlert) -> Result<(), NotifyError> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

fn directory() -> Arc<InMemoryDirectory> {
    Arc::new(InMemoryDirectory::with_users(
        "Sarah",
        vec![
            User::new("Johan", "Johan", "C"),
            User::new("Marc", "Marc", "C"),
            User::new("Sarah", "Sarah", "L"),
        ],
    ))
}

/// Test: crash report from a paying customer escalates, is priced at 100 and alerts once
#[tokio::test]
async fn test_paying_crash_report_escalates_and_alerts() {
    let notifier = Arc::new(RecordingNotifier::default());
    let dispatcher = AlertDispatcher::spawn(notifier.clone(), 8);
    let store = Arc::new(InMemoryTicketStore::new());
    let engine = TicketEngine::new(directory(), store.clone(), dispatcher.handle());

    let id = engine
        .create_ticket(
            NewTicket::new("System Crash", Priority::Medium, "Johan", DESCRIPTION)
                .paying_customer(true),
        )
        .unwrap();

    let ticket = engine.ticket(id).unwrap();
    assert_eq!(ticket.priority, Priority::High);
    match &ticket.kind {
        TicketKind::Priced {
            account_manager,
            price_dollars,
        } => {
            assert_eq!(account_manager.username, "Sarah");
            assert_eq!(*price_dollars, 100);
        }
        TicketKind::Plain => panic!("paying customer ticket must be priced"),
    }

    let stats = dispatcher.shutdown().await;
    assert_eq!(stats.delivered, 1);
    let alerts = notifier.alerts.lock().unwrap();
    assert_eq!(alerts.as_slice(), &[AdminAlert::new("System Crash", "Johan")]);
}

/// Test: an ordinary report keeps its priority, stays plain and never alerts
#[tokio::test]
async fn test_ordinary_report_is_plain_and_silent() {
    let notifier = Arc::new(RecordingNotifier::default());
    let dispatcher = AlertDispatcher::spawn(notifier.clone(), 8);
    let engine = TicketEngine::new(
        directory(),
        Arc::new(InMemoryTicketStore::new()),
        dispatcher.handle(),
    );

    let id = engine
        .create_ticket(NewTicket::new("test", Priority::Medium, "Johan", DESCRIPTION))
        .unwrap();

    let ticket = engine.ticket(id).unwrap();
    assert_eq!(ticket.priority, Priority::Medium);
    assert_eq!(ticket.kind, TicketKind::Plain);
    assert_eq!(ticket.price_dollars(), None);

    let stats = dispatcher.shutdown().await;
    assert_eq!(stats.delivered, 0);
    assert!(notifier.alerts.lock().unwrap().is_empty());
}

/// Test: a 75 minute old incident escalates Low to Medium and is priced at 50
#[test]
fn test_stale_paying_report_escalates_one_step() {
    let (alerts, _receiver) = ticketing::AlertHandle::channel(4);
    let engine = TicketEngine::new(directory(), Arc::new(InMemoryTicketStore::new()), alerts);
    let now = Utc::now();

    let id = engine
        .create_ticket_at(
            NewTicket::new("test", Priority::Low, "Johan", DESCRIPTION)
                .created_at(now - Duration::minutes(75))
                .paying_customer(true),
            now,
        )
        .unwrap();

    let ticket = engine.ticket(id).unwrap();
    assert_eq!(ticket.priority, Priority::Medium);
    assert_eq!(ticket.price_dollars(), Some(50));
}

/// Test: stale crash reports still move only one step
#[test]
fn test_both_triggers_escalate_once() {
    let (alerts, _receiver) = ticketing::AlertHandle::channel(4);
    let engine = TicketEngine::new(directory(), Arc::new(InMemoryTicketStore::new()), alerts);
    let now = Utc::now();

    let expectations = [
        ("test", Priority::Medium, now, Priority::Medium),
        ("Crash", Priority::Low, now, Priority::Medium),
        ("test", Priority::Low, now - Duration::minutes(66), Priority::Medium),
        ("Crash", Priority::Low, now - Duration::minutes(66), Priority::Medium),
    ];
    for (title, requested, created, expected) in expectations {
        let id = engine
            .create_ticket_at(
                NewTicket::new(title, requested, "Johan", DESCRIPTION).created_at(created),
                now,
            )
            .unwrap();
        assert_eq!(
            engine.ticket(id).unwrap().priority,
            expected,
            "title={title} requested={requested}"
        );
    }
}

/// Test: reassignment is visible on re-read and leaves everything else alone
#[test]
fn test_reassignment_is_persisted() {
    let (alerts, _receiver) = ticketing::AlertHandle::channel(4);
    let store = Arc::new(InMemoryTicketStore::new());
    let engine = TicketEngine::new(directory(), store.clone(), alerts);

    let id = engine
        .create_ticket(
            NewTicket::new("test", Priority::Medium, "Johan", DESCRIPTION).paying_customer(true),
        )
        .unwrap();
    let before = store.read(id).unwrap().unwrap();

    engine.assign_ticket(id, "Marc").unwrap();

    let after = store.read(id).unwrap().unwrap();
    assert_eq!(after.assigned_user.username, "Marc");
    assert_eq!(after.priority, before.priority);
    assert_eq!(after.kind, before.kind);
    assert_eq!(after.description, before.description);
}

/// Test: reassignment to an unknown user fails and keeps the old assignee
#[test]
fn test_reassignment_to_unknown_user_fails() {
    let (alerts, _receiver) = ticketing::AlertHandle::channel(4);
    let store = Arc::new(InMemoryTicketStore::new());
    let engine = TicketEngine::new(directory(), store.clone(), alerts);

    let id = engine
        .create_ticket(NewTicket::new("test", Priority::Low, "Johan", DESCRIPTION))
        .unwrap();

    let err = engine.assign_ticket(id, "Michael").unwrap_err();
    assert!(matches!(err, TicketError::UnknownUser { .. }));
    assert_eq!(store.read(id).unwrap().unwrap().assigned_user.username, "Johan");
}

/// Test: engine state lives in the JSON store across engine instances
#[test]
fn test_json_store_shares_tickets_between_engines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tickets.json");

    let id = {
        let (alerts, _receiver) = ticketing::AlertHandle::channel(4);
        let store = Arc::new(JsonFileTicketStore::open(&path).unwrap());
        let engine = TicketEngine::new(directory(), store, alerts);
        engine
            .create_ticket(NewTicket::new("test", Priority::Low, "Johan", DESCRIPTION))
            .unwrap()
    };

    let (alerts, _receiver) = ticketing::AlertHandle::channel(4);
    let store = Arc::new(JsonFileTicketStore::open(&path).unwrap());
    let engine = TicketEngine::new(directory(), store, alerts);
    engine.assign_ticket(id, "Marc").unwrap();

    let reopened = JsonFileTicketStore::open(&path).unwrap();
    assert_eq!(
        reopened.read(id).unwrap().unwrap().assigned_user.username,
        "Marc"
    );
}

/// Test: the engine can be shared across threads
#[test]
fn test_concurrent_creation_yields_unique_ids() {
    let (alerts, _receiver) = ticketing::AlertHandle::channel(64);
    let engine = TicketEngine::new(directory(), Arc::new(InMemoryTicketStore::new()), alerts);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                engine
                    .create_ticket(NewTicket::new(
                        format!("ticket {i}"),
                        Priority::Low,
                        "Johan",
                        DESCRIPTION,
                    ))
                    .unwrap()
            })
        })
        .collect();

    let mut ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
}
