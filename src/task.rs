// Data model for the task tracker

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp format used everywhere: audit log, exports, table rendering
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Ordinal priority level. Declaration order is the ordering:
/// LOW < MEDIUM < HIGH < CRITICAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// All levels, lowest first. Used by statistics and the shell menus.
    pub const ALL: [Urgency; 4] = [Urgency::Low, Urgency::Medium, Urgency::High, Urgency::Critical];

    /// Map a menu digit (1-4) to an urgency level.
    pub fn from_menu_choice(choice: u32) -> Option<Urgency> {
        match choice {
            1 => Some(Urgency::Low),
            2 => Some(Urgency::Medium),
            3 => Some(Urgency::High),
            4 => Some(Urgency::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "LOW",
            Urgency::Medium => "MEDIUM",
            Urgency::High => "HIGH",
            Urgency::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work tracked by the store.
///
/// `id` and `created_at` are fixed at construction; only `completed` mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub urgency: Urgency,
    pub created_at: DateTime<Local>,
    pub completed: bool,
}

impl Task {
    pub fn new(id: u64, description: impl Into<String>, urgency: Urgency) -> Self {
        Self {
            id,
            description: description.into(),
            urgency,
            created_at: Local::now(),
            completed: false,
        }
    }

    /// Creation timestamp rendered in the crate-wide format, local time.
    pub fn created_str(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Export status label (the table view uses DONE/PENDING instead).
    pub fn status_str(&self) -> &'static str {
        if self.completed { "COMPLETED" } else { "PENDING" }
    }
}
