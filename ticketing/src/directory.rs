//! User directory: lookup-by-name service consumed by the engine.
//!
//! `InMemoryDirectory` implements the trait over a fixed user set, optionally
//! loaded from a TOML users file:
//!
//! ```toml
//! account_manager = "Sarah"
//!
//! [[users]]
//! username = "Johan"
//! first_name = "Johan"
//! last_name = "C"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::User;

/// Account manager username used when a users file does not name one
pub const DEFAULT_ACCOUNT_MANAGER: &str = "Sarah";

/// Lookup-by-name over user identity records.
///
/// A miss is reported as `None`; the engine turns it into `UnknownUser`.
#[cfg_attr(test, mockall::automock)]
pub trait UserDirectory: Send + Sync {
    /// Resolve a user by username.
    fn lookup_user(&self, username: &str) -> Option<User>;

    /// Resolve the designated account manager for paying customers.
    fn lookup_account_manager(&self) -> Option<User>;
}

/// Errors loading a users file
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Failed to read users file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid users file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate username in users file: {0}")]
    DuplicateUser(String),
}

/// On-disk shape of a users file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryFile {
    #[serde(default)]
    pub account_manager: Option<String>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Directory over a fixed set of users.
#[derive(Debug, Clone)]
pub struct InMemoryDirectory {
    users: HashMap<String, User>,
    account_manager: String,
}

impl InMemoryDirectory {
    /// Create an empty directory whose account manager is `account_manager`.
    pub fn new(account_manager: impl Into<String>) -> Self {
        Self {
            users: HashMap::new(),
            account_manager: account_manager.into(),
        }
    }

    /// Build from a list of users. Later duplicates replace earlier ones.
    pub fn with_users(account_manager: impl Into<String>, users: Vec<User>) -> Self {
        let mut directory = Self::new(account_manager);
        for user in users {
            directory.insert(user);
        }
        directory
    }

    /// Build from a parsed users file, rejecting duplicate usernames.
    pub fn from_file_contents(file: DirectoryFile) -> Result<Self, DirectoryError> {
        let account_manager = file
            .account_manager
            .unwrap_or_else(|| DEFAULT_ACCOUNT_MANAGER.to_string());
        let mut directory = Self::new(account_manager);
        for user in file.users {
            if directory.users.contains_key(&user.username) {
                return Err(DirectoryError::DuplicateUser(user.username));
            }
            directory.insert(user);
        }
        Ok(directory)
    }

    /// Parse a TOML users document.
    pub fn from_toml_str(content: &str) -> Result<Self, DirectoryError> {
        let file: DirectoryFile = toml::from_str(content)?;
        Self::from_file_contents(file)
    }

    /// Load a TOML users file from disk.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let content = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Replace the designated account manager username.
    pub fn with_account_manager(mut self, account_manager: impl Into<String>) -> Self {
        self.account_manager = account_manager.into();
        self
    }

    pub fn insert(&mut self, user: User) {
        self.users.insert(user.username.clone(), user);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn account_manager_username(&self) -> &str {
        &self.account_manager
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT_MANAGER)
    }
}

impl UserDirectory for InMemoryDirectory {
    fn lookup_user(&self, username: &str) -> Option<User> {
        self.users.get(username).cloned()
    }

    fn lookup_account_manager(&self) -> Option<User> {
        self.lookup_user(&self.account_manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS_TOML: &str = r#"
account_manager = "Sara L"

[[users]]
username = "Johan C"
first_name = "Johan"
last_name = "C"

[[users]]
username = "Sara L"
first_name = "Sara"
last_name = "L"
"#;

    #[test]
    fn test_lookup_hit_and_miss() {
        let directory =
            InMemoryDirectory::with_users("Sarah", vec![User::new("Johan", "Johan", "C")]);
        assert_eq!(directory.lookup_user("Johan").unwrap().last_name, "C");
        assert!(directory.lookup_user("johan").is_none());
        assert!(directory.lookup_user("Invalid Name").is_none());
    }

    #[test]
    fn test_account_manager_resolves_through_users() {
        let directory = InMemoryDirectory::from_toml_str(USERS_TOML).unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(
            directory.lookup_account_manager().unwrap().username,
            "Sara L"
        );
    }

    #[test]
    fn test_missing_account_manager_is_none() {
        let directory =
            InMemoryDirectory::with_users("Sarah", vec![User::new("Johan", "Johan", "C")]);
        assert!(directory.lookup_account_manager().is_none());
    }

    #[test]
    fn test_account_manager_override() {
        let directory = InMemoryDirectory::from_toml_str(USERS_TOML)
            .unwrap()
            .with_account_manager("Johan C");
        assert_eq!(
            directory.lookup_account_manager().unwrap().first_name,
            "Johan"
        );
    }

    #[test]
    fn test_default_account_manager_name() {
        let directory = InMemoryDirectory::from_toml_str("users = []").unwrap();
        assert!(directory.is_empty());
        assert_eq!(directory.account_manager_username(), DEFAULT_ACCOUNT_MANAGER);
    }

    #[test]
    fn test_duplicate_users_rejected() {
        let doc = r#"
[[users]]
username = "Johan"
first_name = "Johan"
last_name = "C"

[[users]]
username = "Johan"
first_name = "Other"
last_name = "Person"
"#;
        let err = InMemoryDirectory::from_toml_str(doc).unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateUser(name) if name == "Johan"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.toml");
        std::fs::write(&path, USERS_TOML).unwrap();

        let directory = InMemoryDirectory::load(&path).unwrap();
        assert!(directory.lookup_user("Johan C").is_some());

        let missing = InMemoryDirectory::load(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(DirectoryError::Io { .. })));
    }
}
