//! Ticket priority and the fixed tables keyed by it.
//!
//! Escalation and pricing are data, not control flow: each is a constant
//! array indexed by [`Priority::index`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordered ticket priority, `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
}

/// One escalation step. High is absorbing.
const ESCALATION_TABLE: [Priority; 3] = [Priority::Medium, Priority::High, Priority::High];

/// Price in whole dollars charged to paying customers, by final priority.
const PRICE_TABLE_DOLLARS: [u32; 3] = [50, 50, 100];

impl Priority {
    /// All priorities in ascending order
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    const fn index(self) -> usize {
        self as usize
    }

    /// The priority one step up, capped at `High`.
    pub fn escalated(self) -> Priority {
        ESCALATION_TABLE[self.index()]
    }

    /// Price of a paying-customer ticket at this (final) priority.
    pub fn price_dollars(self) -> u32 {
        PRICE_TABLE_DOLLARS[self.index()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a string is not one of `low`, `medium`, `high`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown priority '{0}' (expected low, medium or high)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}
