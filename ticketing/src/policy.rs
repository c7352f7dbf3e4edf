//! Priority Escalation Policy: deterministic, no I/O
//!
//! A requested priority moves up exactly one step when either signal fires:
//!
//! ```text
//! created < now - 1h                      → stale incident
//! title contains Crash|Important|Failure  → urgent keyword (case-sensitive)
//! ```
//!
//! Both signals together still produce a single step. `now` is supplied by the
//! caller, captured once per operation.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::Priority;

/// Title substrings that mark an incident as urgent
pub const URGENCY_KEYWORDS: [&str; 3] = ["Crash", "Important", "Failure"];

/// Incidents older than this are escalated
pub const STALE_AFTER_MINUTES: i64 = 60;

/// Which signal caused an escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationTrigger {
    /// Incident occurred more than an hour before evaluation
    StaleIncident,
    /// Title contains one of [`URGENCY_KEYWORDS`]
    UrgentKeyword(&'static str),
}

impl std::fmt::Display for EscalationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleIncident => write!(f, "incident older than {STALE_AFTER_MINUTES} minutes"),
            Self::UrgentKeyword(keyword) => write!(f, "title contains '{keyword}'"),
        }
    }
}

/// Result of applying the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationOutcome {
    pub requested: Priority,
    pub priority: Priority,
    /// First signal that fired, if any
    pub trigger: Option<EscalationTrigger>,
}

impl EscalationOutcome {
    pub fn escalated(&self) -> bool {
        self.priority != self.requested
    }
}

/// Apply the escalation policy.
pub fn escalate(
    requested: Priority,
    created: DateTime<Utc>,
    title: &str,
    now: DateTime<Utc>,
) -> EscalationOutcome {
    let trigger = detect_trigger(created, title, now);
    let priority = match trigger {
        Some(_) => requested.escalated(),
        None => requested,
    };
    EscalationOutcome {
        requested,
        priority,
        trigger,
    }
}

fn detect_trigger(
    created: DateTime<Utc>,
    title: &str,
    now: DateTime<Utc>,
) -> Option<EscalationTrigger> {
    // A cutoff before the earliest representable time means nothing is stale.
    let stale = now
        .checked_sub_signed(Duration::minutes(STALE_AFTER_MINUTES))
        .is_some_and(|cutoff| created < cutoff);
    if stale {
        return Some(EscalationTrigger::StaleIncident);
    }
    URGENCY_KEYWORDS
        .into_iter()
        .find(|keyword| title.contains(keyword))
        .map(EscalationTrigger::UrgentKeyword)
}
