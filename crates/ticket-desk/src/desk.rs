//! Wires the configured collaborators around a [`TicketEngine`].

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use ticketing::notify::DispatchStats;
use ticketing::{
    AlertDispatcher, InMemoryDirectory, JsonFileTicketStore, LogNotifier, Notifier, TicketEngine,
};

use crate::config::DeskConfig;
use crate::webhook::WebhookNotifier;

/// A running desk: the engine plus the alert worker it feeds.
pub struct Desk {
    engine: TicketEngine,
    dispatcher: AlertDispatcher,
}

impl Desk {
    /// Load the directory and store, and start the alert dispatcher.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn open(config: &DeskConfig) -> Result<Self> {
        let mut directory = InMemoryDirectory::load(&config.users_path)
            .with_context(|| format!("Failed to load users from {}", config.users_path.display()))?;
        if let Some(manager) = &config.account_manager {
            directory = directory.with_account_manager(manager.clone());
        }

        let store = JsonFileTicketStore::open(&config.store_path).with_context(|| {
            format!(
                "Failed to open ticket store {}",
                config.store_path.display()
            )
        })?;

        let notifier: Arc<dyn Notifier> = match &config.webhook_url {
            Some(url) => {
                let webhook = WebhookNotifier::new(url.clone());
                debug!(url = %webhook.url(), "Administrator alerts go to webhook");
                Arc::new(webhook)
            }
            None => Arc::new(LogNotifier),
        };
        let dispatcher = AlertDispatcher::spawn(notifier, config.alert_queue_capacity);

        info!(
            users = directory.len(),
            account_manager = %directory.account_manager_username(),
            store = %store.path().display(),
            webhook = config.webhook_url.is_some(),
            "Ticket desk ready"
        );

        let engine = TicketEngine::new(Arc::new(directory), Arc::new(store), dispatcher.handle());
        Ok(Self { engine, dispatcher })
    }

    pub fn engine(&self) -> &TicketEngine {
        &self.engine
    }

    /// Flush queued alerts and stop the dispatcher.
    pub async fn close(self) -> DispatchStats {
        drop(self.engine);
        self.dispatcher.shutdown().await
    }
}
