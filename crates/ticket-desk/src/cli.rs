//! Command-line interface
//!
//! ```bash
//! ticket-desk create --title "System Crash" --priority medium --assignee Johan \
//!     --description "The system crashed when user performed a search" --paying
//! ticket-desk assign --id 1 --to Marc
//! ticket-desk show --id 1
//! ticket-desk demo
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use ticketing::{NewTicket, Priority, TicketId};

use crate::config::DeskConfig;
use crate::desk::Desk;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the TOML users file (overrides TICKET_DESK_USERS)
    #[arg(long, global = true)]
    pub users: Option<PathBuf>,

    /// Path to the JSON ticket store (overrides TICKET_DESK_STORE)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a ticket from an incident report and print its id
    Create {
        #[arg(long)]
        title: String,

        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,

        /// Username of the responsible person
        #[arg(long)]
        assignee: String,

        #[arg(long)]
        description: String,

        /// Incident time (RFC 3339); defaults to now
        #[arg(long, conflicts_with = "minutes_ago")]
        created_at: Option<DateTime<Utc>>,

        /// Incident time as minutes before now
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        minutes_ago: Option<i64>,

        /// Ticket is raised by a paying customer
        #[arg(long, default_value_t = false)]
        paying: bool,
    },

    /// Reassign a ticket to another user
    Assign {
        #[arg(long)]
        id: u64,

        #[arg(long)]
        to: String,
    },

    /// Print a ticket as JSON
    Show {
        #[arg(long)]
        id: u64,
    },

    /// Create a paying "System Crash" ticket and reassign it
    Demo {
        #[arg(long, default_value = "Johan")]
        assignee: String,

        #[arg(long, default_value = "Michael")]
        reassign_to: String,
    },
}

impl Args {
    /// Build the effective config: file (or environment), then CLI overrides.
    pub fn desk_config(&self) -> Result<DeskConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = DeskConfig::from_file(path)?;
                if let Some(base) = path.parent() {
                    config.resolve_paths(base);
                }
                config
            }
            None => DeskConfig::from_env(),
        };
        if let Some(users) = &self.users {
            config.users_path = users.clone();
        }
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        Ok(config)
    }
}

/// Execute a parsed command line.
pub async fn run(args: Args) -> Result<()> {
    let config = args.desk_config()?;
    let desk = Desk::open(&config)?;

    let outcome = execute(desk.engine(), args.command);

    let stats = desk.close().await;
    if stats.delivered + stats.failed > 0 {
        info!(
            delivered = stats.delivered,
            failed = stats.failed,
            "Administrator alerts processed"
        );
    }
    outcome
}

fn execute(engine: &ticketing::TicketEngine, command: Command) -> Result<()> {
    match command {
        Command::Create {
            title,
            priority,
            assignee,
            description,
            created_at,
            minutes_ago,
            paying,
        } => {
            let now = Utc::now();
            let created = incident_time(now, created_at, minutes_ago)?;
            let request = NewTicket::new(title.clone(), priority, assignee, description)
                .created_at(created)
                .paying_customer(paying);
            let id = engine
                .create_ticket_at(request, now)
                .with_context(|| format!("Failed to create ticket '{title}'"))?;
            println!("{id}");
        }
        Command::Assign { id, to } => {
            engine
                .assign_ticket(TicketId(id), &to)
                .with_context(|| format!("Failed to assign ticket {id} to {to}"))?;
            println!("Ticket {id} assigned to {to}");
        }
        Command::Show { id } => {
            let ticket = engine
                .ticket(TicketId(id))
                .with_context(|| format!("Failed to read ticket {id}"))?;
            println!("{}", serde_json::to_string_pretty(&ticket)?);
        }
        Command::Demo {
            assignee,
            reassign_to,
        } => {
            let id = engine
                .create_ticket(
                    NewTicket::new(
                        "System Crash",
                        Priority::Medium,
                        assignee,
                        "The system crashed when user performed a search",
                    )
                    .paying_customer(true),
                )
                .context("Demo ticket creation failed")?;
            println!("Created ticket {id}");
            engine
                .assign_ticket(id, &reassign_to)
                .with_context(|| format!("Demo reassignment to {reassign_to} failed"))?;
            println!("Ticket {id} assigned to {reassign_to}");
        }
    }
    Ok(())
}

fn incident_time(
    now: DateTime<Utc>,
    created_at: Option<DateTime<Utc>>,
    minutes_ago: Option<i64>,
) -> Result<DateTime<Utc>> {
    match (created_at, minutes_ago) {
        (Some(at), _) => Ok(at),
        (None, Some(minutes)) => Duration::try_minutes(minutes)
            .and_then(|ago| now.checked_sub_signed(ago))
            .with_context(|| format!("--minutes-ago {minutes} is out of range")),
        (None, None) => Ok(now),
    }
}
