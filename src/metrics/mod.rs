//! Figures derived from a profile for one week. Nothing here is cached: every call walks the
//! profile again, which is plenty fast for a single profile and a week of entries.

pub mod report;

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{
    model::{Project, WorkDay},
    utils::time::in_week,
};

/// Projects whose actual hours are within this many hours of the target are on track.
pub const TONE_TOLERANCE_HOURS: f64 = 1.0;

/// Total hours up to this share of the weekly budget only warn.
pub const BUDGET_WARN_RATIO: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Warn,
    Bad,
}

/// Where the actual hours sit relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Under,
    Over,
    Exact,
}

/// Reconciliation of one project for one week.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStatus {
    pub actual: f64,
    pub target: f64,
    pub delta: f64,
    pub within_range: bool,
    pub tone: Tone,
}

impl ProjectStatus {
    pub fn direction(&self) -> Direction {
        if self.actual < self.target {
            Direction::Under
        } else if self.actual > self.target {
            Direction::Over
        } else {
            Direction::Exact
        }
    }
}

pub fn targets_by_project(projects: &[Project]) -> HashMap<String, f64> {
    projects
        .iter()
        .map(|p| (p.id.clone(), p.target_hours))
        .collect()
}

/// Hours logged per project id in the week starting at `week_start`. Every project is present,
/// with 0 when nothing was logged. Entries whose project is gone still count under their id.
pub fn actuals_by_project_for_week(
    projects: &[Project],
    work_days: &[WorkDay],
    week_start: NaiveDate,
) -> HashMap<String, f64> {
    let mut map = projects
        .iter()
        .map(|p| (p.id.clone(), 0.))
        .collect::<HashMap<_, _>>();

    for day in work_days.iter().filter(|d| in_week(&d.date, week_start)) {
        for entry in &day.entries {
            *map.entry(entry.project_id.clone()).or_insert(0.) += entry.hours;
        }
    }

    map
}

pub fn day_total_hours(day: Option<&WorkDay>) -> f64 {
    day.map_or(0., WorkDay::total_hours)
}

pub fn tone_for(delta: f64, within_range: bool) -> Tone {
    if !within_range {
        Tone::Bad
    } else if delta.abs() <= TONE_TOLERANCE_HOURS {
        Tone::Good
    } else {
        Tone::Warn
    }
}

pub fn project_status(project: &Project, actual: f64) -> ProjectStatus {
    let target = project.target_hours;
    let delta = actual - target;
    let within_range = project.in_range(actual);
    ProjectStatus {
        actual,
        target,
        delta,
        within_range,
        tone: tone_for(delta, within_range),
    }
}

/// Tone of the whole week against the budget.
pub fn budget_tone(used: f64, weekly_budget_hours: f64) -> Tone {
    if used <= weekly_budget_hours {
        Tone::Good
    } else if used <= weekly_budget_hours * BUDGET_WARN_RATIO {
        Tone::Warn
    } else {
        Tone::Bad
    }
}

/// Weekly hours against the budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub budget: f64,
    /// Sum over existing projects only, orphaned entries are left out.
    pub used: f64,
    /// May go negative.
    pub remaining: f64,
    pub min_total: f64,
    pub max_total: f64,
    pub tone: Tone,
}

impl BudgetSummary {
    pub fn new(weekly_budget_hours: f64, projects: &[Project], actuals: &HashMap<String, f64>) -> Self {
        let used = projects
            .iter()
            .map(|p| actuals.get(&p.id).copied().unwrap_or(0.))
            .sum::<f64>();
        Self {
            budget: weekly_budget_hours,
            used,
            remaining: weekly_budget_hours - used,
            min_total: projects.iter().map(|p| p.min_hours.max(0.)).sum(),
            max_total: projects.iter().map(|p| p.max_hours.max(0.)).sum(),
            tone: budget_tone(used, weekly_budget_hours),
        }
    }

    pub fn within_budget(&self) -> bool {
        self.used <= self.budget
    }

    pub fn remaining_clamped(&self) -> f64 {
        self.remaining.max(0.)
    }
}

/// How much of the weekly budget the project targets claim.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetAllocation {
    pub budget: f64,
    pub total_targets: f64,
    /// Negative when targets exceed the budget.
    pub unallocated: f64,
    pub ratio: f64,
}

impl TargetAllocation {
    pub fn new(weekly_budget_hours: f64, projects: &[Project]) -> Self {
        let total_targets = projects
            .iter()
            .map(|p| p.target_hours)
            .filter(|t| t.is_finite())
            .sum::<f64>();
        let ratio = if weekly_budget_hours > 0. {
            total_targets / weekly_budget_hours
        } else {
            0.
        };
        Self {
            budget: weekly_budget_hours,
            total_targets,
            unallocated: weekly_budget_hours - total_targets,
            ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::{
        model::{Project, WorkDay, WorkEntry},
        utils::time::{in_week, week_start},
    };

    use super::*;

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn entry(project_id: &str, hours: f64) -> WorkEntry {
        WorkEntry {
            id: format!("{project_id}-{hours}"),
            project_id: project_id.into(),
            hours,
            note: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        }
    }

    fn day(date: &str, entries: Vec<WorkEntry>) -> WorkDay {
        WorkDay {
            date: date.into(),
            entries,
        }
    }

    fn projects() -> Vec<Project> {
        vec![
            Project::new("a", "A", "#111").with_bounds(5., 10., 15.),
            Project::new("b", "B", "#222").with_bounds(20., 30., 35.),
        ]
    }

    fn days() -> Vec<WorkDay> {
        vec![
            day("2023-12-31", vec![entry("a", 4.)]),
            day("2024-01-01", vec![entry("a", 2.), entry("b", 3.5)]),
            day("2024-01-03", vec![entry("gone", 1.25)]),
            day("2024-01-07", vec![entry("b", 0.75)]),
            day("2024-01-08", vec![entry("a", 6.)]),
        ]
    }

    #[test]
    fn test_targets() {
        let targets = targets_by_project(&projects());
        assert_eq!(targets.len(), 2);
        assert_eq!(targets["a"], 10.);
        assert_eq!(targets["b"], 30.);
    }

    #[test]
    fn test_actuals_for_week() {
        let actuals = actuals_by_project_for_week(&projects(), &days(), week());
        assert_eq!(actuals["a"], 2.);
        assert_eq!(actuals["b"], 4.25);
        assert_eq!(actuals["gone"], 1.25);
        assert_eq!(actuals.len(), 3);
    }

    #[test]
    fn test_actuals_with_no_entries() {
        let actuals = actuals_by_project_for_week(&projects(), &[], week());
        assert_eq!(actuals["a"], 0.);
        assert_eq!(actuals["b"], 0.);
    }

    #[test]
    fn test_actuals_match_day_totals() {
        let days = days();
        for start in [
            week_start(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            week(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        ] {
            let actuals = actuals_by_project_for_week(&projects(), &days, start);
            let by_project = actuals.values().sum::<f64>();
            let by_day = days
                .iter()
                .filter(|d| in_week(&d.date, start))
                .map(|d| day_total_hours(Some(d)))
                .sum::<f64>();
            assert_eq!(by_project, by_day, "{start}");
        }
    }

    #[test]
    fn test_day_total() {
        assert_eq!(day_total_hours(None), 0.);
        assert_eq!(day_total_hours(Some(&days()[1])), 5.5);
    }

    #[test]
    fn test_tone() {
        assert_eq!(tone_for(0., true), Tone::Good);
        assert_eq!(tone_for(1., true), Tone::Good);
        assert_eq!(tone_for(-1., true), Tone::Good);
        assert_eq!(tone_for(1.25, true), Tone::Warn);
        assert_eq!(tone_for(-2., true), Tone::Warn);
        assert_eq!(tone_for(0., false), Tone::Bad);
    }

    #[test]
    fn test_weekly_scenario() {
        let projects = projects();
        let days = vec![day("2024-01-01", vec![entry("a", 8.)])];
        let actuals = actuals_by_project_for_week(&projects, &days, week());
        assert_eq!(actuals.len(), 2);
        assert_eq!(actuals["a"], 8.);
        assert_eq!(actuals["b"], 0.);

        let status = project_status(&projects[0], actuals["a"]);
        assert_eq!(
            status,
            ProjectStatus {
                actual: 8.,
                target: 10.,
                delta: -2.,
                within_range: true,
                tone: Tone::Warn,
            }
        );
        assert_eq!(status.direction(), Direction::Under);

        let status = project_status(&projects[1], actuals["b"]);
        assert!(!status.within_range);
        assert_eq!(status.tone, Tone::Bad);
    }

    #[test]
    fn test_direction() {
        let project = Project::new("a", "A", "#111").with_bounds(0., 10., 20.);
        assert_eq!(project_status(&project, 10.).direction(), Direction::Exact);
        assert_eq!(project_status(&project, 10.25).direction(), Direction::Over);
    }

    #[test]
    fn test_budget_tone() {
        assert_eq!(budget_tone(40., 40.), Tone::Good);
        assert_eq!(budget_tone(44., 40.), Tone::Warn);
        assert_eq!(budget_tone(44.25, 40.), Tone::Bad);
        assert_eq!(budget_tone(0., 0.), Tone::Good);
        assert_eq!(budget_tone(0.25, 0.), Tone::Bad);
    }

    #[test]
    fn test_budget_summary_skips_orphans() {
        let projects = projects();
        let actuals = actuals_by_project_for_week(&projects, &days(), week());
        let summary = BudgetSummary::new(5., &projects, &actuals);
        assert_eq!(summary.used, 6.25);
        assert_eq!(summary.remaining, -1.25);
        assert_eq!(summary.remaining_clamped(), 0.);
        assert!(!summary.within_budget());
        assert_eq!(summary.tone, Tone::Bad);
        assert_eq!(summary.min_total, 25.);
        assert_eq!(summary.max_total, 50.);
    }

    #[test]
    fn test_target_allocation() {
        let allocation = TargetAllocation::new(50., &projects());
        assert_eq!(allocation.total_targets, 40.);
        assert_eq!(allocation.unallocated, 10.);
        assert_eq!(allocation.ratio, 0.8);

        let allocation = TargetAllocation::new(0., &projects());
        assert_eq!(allocation.ratio, 0.);
        assert_eq!(allocation.unallocated, -40.);
    }
}
