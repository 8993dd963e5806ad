//! List level building blocks for the engine. Each function returns new collections and leaves
//! its inputs alone.

use crate::model::{Profile, WorkDay, WorkEntry};

/// Appends `entry` to the day with `date`, creating the day at the end when missing.
pub fn upsert_day(work_days: &[WorkDay], date: &str, entry: WorkEntry) -> Vec<WorkDay> {
    let mut days = work_days.to_vec();
    match days.iter_mut().find(|d| d.date == date) {
        Some(day) => day.entries.push(entry),
        None => days.push(WorkDay {
            date: date.to_string(),
            entries: vec![entry],
        }),
    }
    days
}

/// Removes the entry from the day with `date`. A day left without entries disappears. Unknown
/// dates or entry ids leave the days as they were.
pub fn remove_entry(work_days: &[WorkDay], date: &str, entry_id: &str) -> Vec<WorkDay> {
    let Some(idx) = work_days.iter().position(|d| d.date == date) else {
        return work_days.to_vec();
    };

    let mut days = work_days.to_vec();
    days[idx].entries.retain(|e| e.id != entry_id);
    if days[idx].entries.is_empty() {
        days.remove(idx);
    }
    days
}

/// Drops the project and every entry referencing it, then every day that ended up empty.
pub fn remove_project_everywhere(profile: &Profile, project_id: &str) -> Profile {
    let projects = profile
        .projects
        .iter()
        .filter(|p| p.id != project_id)
        .cloned()
        .collect();

    let work_days = profile
        .work_days
        .iter()
        .map(|d| WorkDay {
            date: d.date.clone(),
            entries: d
                .entries
                .iter()
                .filter(|e| e.project_id != project_id)
                .cloned()
                .collect(),
        })
        .filter(|d| !d.entries.is_empty())
        .collect();

    Profile {
        projects,
        work_days,
        ..profile.clone()
    }
}
