//! Entities making up a profile. Field names on disk are camelCase and map one to one onto the
//! structs here; there is no separate storage representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name shown for entries whose project no longer exists.
pub const UNKNOWN_PROJECT: &str = "unknown";

/// A budget category with weekly hour bounds. The bounds are independent of each other: nothing
/// keeps `min_hours <= target_hours <= max_hours`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub color: String,
    pub min_hours: f64,
    pub target_hours: f64,
    pub max_hours: f64,
}

impl Project {
    /// New project with all bounds at zero.
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            min_hours: 0.,
            target_hours: 0.,
            max_hours: 0.,
        }
    }

    pub fn with_bounds(self, min_hours: f64, target_hours: f64, max_hours: f64) -> Self {
        Self {
            min_hours,
            target_hours,
            max_hours,
            ..self
        }
    }

    pub fn in_range(&self, hours: f64) -> bool {
        self.min_hours <= hours && hours <= self.max_hours
    }
}

/// One logged chunk of work. Never edited after creation, only removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    pub id: String,
    pub project_id: String,
    pub hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Entries of a single calendar date, in insertion order. A day without entries is never kept
/// in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkDay {
    pub date: String,
    pub entries: Vec<WorkEntry>,
}

impl WorkDay {
    pub fn total_hours(&self) -> f64 {
        self.entries.iter().map(|e| e.hours).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub weekly_budget_hours: f64,
    pub projects: Vec<Project>,
    pub work_days: Vec<WorkDay>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Display name for `id`, falling back to [UNKNOWN_PROJECT].
    pub fn project_name(&self, id: &str) -> &str {
        self.project(id).map_or(UNKNOWN_PROJECT, |p| p.name.as_str())
    }

    pub fn day(&self, date: &str) -> Option<&WorkDay> {
        self.work_days.iter().find(|d| d.date == date)
    }
}
