//! Administrator alerts over HTTP.
//!
//! POSTs the alert as JSON (`{"incident_title": ..., "assigned_to": ...}`).
//! Any non-2xx status counts as a failed delivery; the dispatcher logs it and
//! moves on.

use std::time::Duration;

use async_trait::async_trait;
use ticketing::{AdminAlert, Notifier, NotifyError};

/// Upper bound on a single delivery attempt.
const WEBHOOK_TIMEOUT_SECS: u64 = 10;

pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify_administrator(&self, alert: &AdminAlert) -> Result<(), NotifyError> {
        if alert.incident_title.is_empty() {
            return Err(NotifyError::MissingTitle);
        }

        let resp = self
            .client
            .post(&self.url)
            .json(alert)
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError::Delivery(format!(
                "webhook {} returned {}",
                self.url,
                resp.status()
            )));
        }
        Ok(())
    }
}
