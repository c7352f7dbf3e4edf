use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ticketing::notify::DEFAULT_ALERT_QUEUE_CAPACITY;

/// Top-level desk configuration.
///
/// Resolution order: CLI flags, then the TOML config file, then
/// `TICKET_DESK_*` environment variables, then built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// TOML users file backing the directory
    pub users_path: PathBuf,
    /// JSON snapshot file backing the ticket store
    pub store_path: PathBuf,
    /// Overrides the account manager named in the users file
    pub account_manager: Option<String>,
    /// Administrator alerts are POSTed here when set; otherwise logged
    pub webhook_url: Option<String>,
    /// Alerts queued beyond this are dropped
    pub alert_queue_capacity: usize,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl DeskConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            users_path: lookup("TICKET_DESK_USERS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("users.toml")),
            store_path: lookup("TICKET_DESK_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("tickets.json")),
            account_manager: lookup("TICKET_DESK_ACCOUNT_MANAGER").filter(|s| !s.is_empty()),
            webhook_url: lookup("TICKET_DESK_WEBHOOK_URL").filter(|s| !s.is_empty()),
            alert_queue_capacity: lookup("TICKET_DESK_ALERT_QUEUE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ALERT_QUEUE_CAPACITY),
        }
    }

    /// Load a TOML config file. Missing keys fall back to the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
        let config: DeskConfig =
            toml::from_str(&content).context("Failed to parse desk config TOML")?;
        Ok(config)
    }

    /// Resolve relative paths against `base` (the config file's directory).
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.users_path.is_relative() {
            self.users_path = base.join(&self.users_path);
        }
        if self.store_path.is_relative() {
            self.store_path = base.join(&self.store_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = DeskConfig::from_lookup(|_| None);
        assert_eq!(config.users_path, PathBuf::from("users.toml"));
        assert_eq!(config.store_path, PathBuf::from("tickets.json"));
        assert_eq!(config.alert_queue_capacity, DEFAULT_ALERT_QUEUE_CAPACITY);
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = DeskConfig::from_lookup(lookup_from(&[
            ("TICKET_DESK_STORE", "/var/lib/desk/tickets.json"),
            ("TICKET_DESK_ACCOUNT_MANAGER", "Sara L"),
            ("TICKET_DESK_ALERT_QUEUE", "8"),
            ("TICKET_DESK_WEBHOOK_URL", ""),
        ]));
        assert_eq!(config.store_path, PathBuf::from("/var/lib/desk/tickets.json"));
        assert_eq!(config.account_manager.as_deref(), Some("Sara L"));
        assert_eq!(config.alert_queue_capacity, 8);
        assert!(config.webhook_url.is_none(), "empty URL means disabled");
    }

    #[test]
    fn test_invalid_queue_size_falls_back() {
        let config = DeskConfig::from_lookup(lookup_from(&[("TICKET_DESK_ALERT_QUEUE", "lots")]));
        assert_eq!(config.alert_queue_capacity, DEFAULT_ALERT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = DeskConfig::from_lookup(lookup_from(&[(
            "TICKET_DESK_USERS",
            "/etc/desk/users.toml",
        )]));
        config.resolve_paths(Path::new("/srv/desk"));
        assert_eq!(config.users_path, PathBuf::from("/etc/desk/users.toml"));
        assert_eq!(config.store_path, PathBuf::from("/srv/desk/tickets.json"));
    }
}
