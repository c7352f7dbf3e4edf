//! Administrator alerts: fire-and-forget delivery
//!
//! ```text
//! TicketEngine ──submit()──▶ bounded mpsc queue ──▶ worker task ──▶ Notifier
//!      (never blocks, never fails)                  (one attempt, errors logged)
//! ```
//!
//! The engine only holds an [`AlertHandle`]. Submitting uses `try_send`, so a
//! full or closed queue drops the alert with a warning instead of delaying
//! ticket creation. The [`AlertDispatcher`] worker makes exactly one delivery
//! attempt per alert and discards its outcome: callers are never told whether
//! an alert was delivered, and there is no retry or per-alert cancellation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default alert queue capacity
pub const DEFAULT_ALERT_QUEUE_CAPACITY: usize = 64;

/// Alert raised when a High priority ticket is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAlert {
    pub incident_title: String,
    /// Assignee name as supplied by the caller
    pub assigned_to: String,
}

impl AdminAlert {
    pub fn new(incident_title: impl Into<String>, assigned_to: impl Into<String>) -> Self {
        Self {
            incident_title: incident_title.into(),
            assigned_to: assigned_to.into(),
        }
    }
}

/// Errors a notifier may report. The dispatcher logs and drops them.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Incident title is required")]
    MissingTitle,

    #[error("Alert delivery failed: {0}")]
    Delivery(String),
}

/// Channel that delivers administrator alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Make a single delivery attempt.
    async fn notify_administrator(&self, alert: &AdminAlert) -> Result<(), NotifyError>;
}

/// Notifier that records the alert as a structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_administrator(&self, alert: &AdminAlert) -> Result<(), NotifyError> {
        if alert.incident_title.is_empty() {
            return Err(NotifyError::MissingTitle);
        }
        info!(
            title = %alert.incident_title,
            assigned_to = %alert.assigned_to,
            "Administrator alert: high priority ticket"
        );
        Ok(())
    }
}

/// Non-blocking submission side of the alert queue.
#[derive(Debug, Clone)]
pub struct AlertHandle {
    sender: mpsc::Sender<AdminAlert>,
}

impl AlertHandle {
    /// Create a handle and the receiving end of its queue.
    ///
    /// Tests use the receiver directly to observe submitted alerts.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AdminAlert>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Queue an alert without blocking. Returns `false` if it was dropped.
    pub fn submit(&self, alert: AdminAlert) -> bool {
        match self.sender.try_send(alert) {
            Ok(()) => true,
            Err(TrySendError::Full(alert)) => {
                warn!(title = %alert.incident_title, "Alert queue full, alert dropped");
                false
            }
            Err(TrySendError::Closed(alert)) => {
                warn!(title = %alert.incident_title, "Alert dispatcher stopped, alert dropped");
                false
            }
        }
    }
}

/// Delivery counters reported when the dispatcher shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: usize,
    pub failed: usize,
}

/// Worker that drains the alert queue into a [`Notifier`].
pub struct AlertDispatcher {
    handle: AlertHandle,
    cancel: CancellationToken,
    worker: JoinHandle<DispatchStats>,
}

impl AlertDispatcher {
    /// Spawn the worker on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(notifier: Arc<dyn Notifier>, capacity: usize) -> Self {
        let (handle, receiver) = AlertHandle::channel(capacity);
        let cancel = CancellationToken::new();
        let worker = tokio::spawn(run_worker(notifier, receiver, cancel.clone()));
        debug!(capacity, "Alert dispatcher started");
        Self {
            handle,
            cancel,
            worker,
        }
    }

    /// A handle for submitting alerts
    pub fn handle(&self) -> AlertHandle {
        self.handle.clone()
    }

    /// Stop the worker after it delivers every alert already queued.
    ///
    /// Alerts submitted after this call are dropped.
    pub async fn shutdown(self) -> DispatchStats {
        self.cancel.cancel();
        drop(self.handle);
        match self.worker.await {
            Ok(stats) => {
                debug!(
                    delivered = stats.delivered,
                    failed = stats.failed,
                    "Alert dispatcher stopped"
                );
                stats
            }
            Err(e) => {
                warn!("Alert dispatcher worker ended abnormally: {}", e);
                DispatchStats::default()
            }
        }
    }
}

async fn run_worker(
    notifier: Arc<dyn Notifier>,
    mut receiver: mpsc::Receiver<AdminAlert>,
    cancel: CancellationToken,
) -> DispatchStats {
    let mut stats = DispatchStats::default();

    loop {
        tokio::select! {
            biased;
            next = receiver.recv() => match next {
                Some(alert) => deliver(notifier.as_ref(), &alert, &mut stats).await,
                None => break,
            },
            _ = cancel.cancelled() => break,
        }
    }

    receiver.close();
    while let Ok(alert) = receiver.try_recv() {
        deliver(notifier.as_ref(), &alert, &mut stats).await;
    }
    stats
}

async fn deliver(notifier: &dyn Notifier, alert: &AdminAlert, stats: &mut DispatchStats) {
    match notifier.notify_administrator(alert).await {
        Ok(()) => stats.delivered += 1,
        Err(e) => {
            stats.failed += 1;
            warn!(title = %alert.incident_title, "Administrator alert not delivered: {}", e);
        }
    }
}
