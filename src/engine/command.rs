use crate::model::Project;

/// Input for logging hours. The engine takes it as given: callers check that the project exists
/// and that hours are positive.
#[derive(Debug, Clone, PartialEq)]
pub struct AddEntryInput {
    pub date: String,
    pub project_id: String,
    pub hours: f64,
    pub note: Option<String>,
}

/// Every change to the application state is expressed as one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    OpenSettings,
    CloseSettings,
    /// Replaces any existing profile. Project ids must already be assigned.
    CreateProfile {
        weekly_budget_hours: f64,
        projects: Vec<Project>,
    },
    /// Drops the profile and any transient ui state.
    ResetProfile,
    SetWeeklyBudget {
        weekly_budget_hours: f64,
    },
    AddProject {
        project: Project,
    },
    /// Whole record replace of the project with the same id.
    UpdateProject {
        project: Project,
    },
    /// Removes the project together with every entry logged against it.
    RemoveProject {
        project_id: String,
    },
    AddEntry {
        input: AddEntryInput,
    },
    RemoveEntry {
        date: String,
        entry_id: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::OpenSettings => "settings/open",
            Command::CloseSettings => "settings/close",
            Command::CreateProfile { .. } => "profile/create",
            Command::ResetProfile => "profile/reset",
            Command::SetWeeklyBudget { .. } => "profile/setWeeklyBudget",
            Command::AddProject { .. } => "project/add",
            Command::UpdateProject { .. } => "project/update",
            Command::RemoveProject { .. } => "project/remove",
            Command::AddEntry { .. } => "entry/add",
            Command::RemoveEntry { .. } => "entry/remove",
        }
    }
}
