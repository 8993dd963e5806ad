//! The state transition engine. [Engine::apply] maps the current [AppState] and a [Command] to
//! the next state without touching the previous one.
//!
//! Commands that can't apply (no profile yet, unknown ids) are absorbed: the caller gets the
//! same state back and no error. Every mutating command on an existing profile refreshes
//! `updated_at`, even when nothing else changed.

pub mod command;
pub mod session;
pub mod transitions;

use std::sync::Arc;

use tracing::debug;

use crate::{
    model::{Profile, WorkEntry},
    utils::{clock::Clock, ids::IdGenerator},
};

pub use command::{AddEntryInput, Command};
use transitions::{remove_entry, remove_project_everywhere, upsert_day};

/// Everything the engine knows about. `profile` is `None` before setup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub profile: Option<Arc<Profile>>,
    pub settings_open: bool,
}

impl AppState {
    pub fn with_profile(profile: Option<Profile>) -> Self {
        Self {
            profile: profile.map(Arc::new),
            settings_open: false,
        }
    }
}

/// Holds the capabilities transitions need: a clock for timestamps and a source of entry ids.
pub struct Engine {
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl Engine {
    pub fn new(clock: Box<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    pub fn apply(&self, state: &AppState, command: Command) -> AppState {
        debug!("Applying {}", command.name());
        match command {
            Command::OpenSettings => AppState {
                settings_open: true,
                ..state.clone()
            },
            Command::CloseSettings => AppState {
                settings_open: false,
                ..state.clone()
            },
            Command::CreateProfile {
                weekly_budget_hours,
                projects,
            } => {
                let now = self.clock.time();
                AppState {
                    profile: Some(Arc::new(Profile {
                        weekly_budget_hours,
                        projects,
                        work_days: vec![],
                        created_at: now,
                        updated_at: now,
                    })),
                    ..state.clone()
                }
            }
            Command::ResetProfile => AppState::default(),
            Command::SetWeeklyBudget {
                weekly_budget_hours,
            } => self.update_profile(state, |profile| Profile {
                weekly_budget_hours,
                ..profile.clone()
            }),
            Command::AddProject { project } => self.update_profile(state, |profile| {
                let mut projects = profile.projects.clone();
                projects.push(project);
                Profile {
                    projects,
                    ..profile.clone()
                }
            }),
            Command::UpdateProject { project } => self.update_profile(state, |profile| {
                if profile.project(&project.id).is_none() {
                    debug!("No project with id {} to update", project.id);
                }
                let projects = profile
                    .projects
                    .iter()
                    .map(|p| if p.id == project.id { project.clone() } else { p.clone() })
                    .collect();
                Profile {
                    projects,
                    ..profile.clone()
                }
            }),
            Command::RemoveProject { project_id } => {
                self.update_profile(state, |profile| remove_project_everywhere(profile, &project_id))
            }
            Command::AddEntry { input } => self.update_profile(state, |profile| {
                let entry = WorkEntry {
                    id: self.ids.next_id(),
                    project_id: input.project_id,
                    hours: input.hours,
                    note: input.note,
                    created_at: self.clock.time(),
                };
                debug!("Logging entry {} on {}", entry.id, input.date);
                Profile {
                    work_days: upsert_day(&profile.work_days, &input.date, entry),
                    ..profile.clone()
                }
            }),
            Command::RemoveEntry { date, entry_id } => self.update_profile(state, |profile| {
                Profile {
                    work_days: remove_entry(&profile.work_days, &date, &entry_id),
                    ..profile.clone()
                }
            }),
        }
    }

    /// Applies `change` when a profile exists and stamps the result. Without a profile the state
    /// comes back untouched.
    fn update_profile(&self, state: &AppState, change: impl FnOnce(&Profile) -> Profile) -> AppState {
        let Some(profile) = state.profile.as_deref() else {
            debug!("No profile, ignoring command");
            return state.clone();
        };
        let mut next = change(profile);
        next.updated_at = self.clock.time();
        AppState {
            profile: Some(Arc::new(next)),
            ..state.clone()
        }
    }
}
