use chrono::NaiveDate;
use tracing::instrument;

use crate::{
    model::{Profile, Project, WorkDay},
    utils::time::week_dates,
};

use super::{
    actuals_by_project_for_week, day_total_hours, project_status, BudgetSummary, ProjectStatus,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRow<'a> {
    pub project: &'a Project,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayRow<'a> {
    pub date: String,
    pub day: Option<&'a WorkDay>,
    pub total: f64,
}

/// Everything shown for one week: budget, per project reconciliation and the day by day log.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyReport<'a> {
    pub week_start: NaiveDate,
    pub budget: BudgetSummary,
    /// Sorted by the size of the delta, largest first.
    pub projects: Vec<ProjectRow<'a>>,
    pub days: Vec<DayRow<'a>>,
}

impl<'a> WeeklyReport<'a> {
    #[instrument(skip(profile))]
    pub fn new(profile: &'a Profile, week_start: NaiveDate) -> Self {
        let actuals = actuals_by_project_for_week(&profile.projects, &profile.work_days, week_start);

        let mut projects = profile
            .projects
            .iter()
            .map(|project| {
                let actual = actuals.get(&project.id).copied().unwrap_or(0.);
                ProjectRow {
                    project,
                    status: project_status(project, actual),
                }
            })
            .collect::<Vec<_>>();
        projects.sort_by(|a, b| b.status.delta.abs().total_cmp(&a.status.delta.abs()));

        let days = week_dates(week_start)
            .into_iter()
            .map(|date| {
                let day = profile.day(&date);
                DayRow {
                    total: day_total_hours(day),
                    date,
                    day,
                }
            })
            .collect();

        Self {
            week_start,
            budget: BudgetSummary::new(profile.weekly_budget_hours, &profile.projects, &actuals),
            projects,
            days,
        }
    }

    /// Project furthest above its target, if any is above.
    pub fn biggest_over(&self) -> Option<&ProjectRow<'a>> {
        self.projects
            .iter()
            .filter(|row| row.status.delta > 0.)
            .max_by(|a, b| a.status.delta.total_cmp(&b.status.delta))
    }

    /// Project furthest below its target, if any is below.
    pub fn biggest_under(&self) -> Option<&ProjectRow<'a>> {
        self.projects
            .iter()
            .filter(|row| row.status.delta < 0.)
            .min_by(|a, b| a.status.delta.total_cmp(&b.status.delta))
    }
}
