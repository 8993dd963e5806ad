//! Plain text views of a profile. Every function returns the text so the caller decides where it
//! goes; colours are optional so the output stays readable when piped.

use std::fmt::Write;

use ansi_term::Colour;

use crate::{
    metrics::{report::WeeklyReport, Direction, TargetAllocation, Tone},
    model::{Profile, WorkDay},
    utils::hours::{format_delta, format_hours},
};

fn paint(tone: Tone, text: &str, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    let colour = match tone {
        Tone::Good => Colour::Green,
        Tone::Warn => Colour::Yellow,
        Tone::Bad => Colour::Red,
    };
    colour.paint(text).to_string()
}

fn tone_label(tone: Tone) -> &'static str {
    match tone {
        Tone::Good => "good",
        Tone::Warn => "warn",
        Tone::Bad => "bad",
    }
}

/// One line per entry: `- <project> - <hours> [- <note>]`.
pub fn render_day(profile: &Profile, date: &str, day: Option<&WorkDay>) -> String {
    let mut out = String::new();
    let total = day.map_or(0., WorkDay::total_hours);
    let _ = writeln!(out, "{date}\t{}", format_hours(total));
    let Some(day) = day else {
        let _ = writeln!(out, "no entries");
        return out;
    };
    for entry in &day.entries {
        let base = format!(
            "- {} - {}",
            profile.project_name(&entry.project_id),
            format_hours(entry.hours)
        );
        match entry.note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(note) => {
                let _ = writeln!(out, "{base} - {note}\t[{}]", entry.id);
            }
            None => {
                let _ = writeln!(out, "{base}\t[{}]", entry.id);
            }
        }
    }
    out
}

pub fn render_projects(profile: &Profile) -> String {
    let mut out = String::new();
    for project in &profile.projects {
        let _ = writeln!(
            out,
            "{}\t{}\tmin {}\ttarget {}\tmax {}\t[{}]",
            project.name,
            project.color,
            format_hours(project.min_hours),
            format_hours(project.target_hours),
            format_hours(project.max_hours),
            project.id
        );
    }
    let allocation = TargetAllocation::new(profile.weekly_budget_hours, &profile.projects);
    let remaining = if allocation.unallocated >= 0. {
        format!("{} remaining", format_hours(allocation.unallocated))
    } else {
        format!("{} over", format_hours(allocation.unallocated.abs()))
    };
    let _ = writeln!(
        out,
        "targets {} of budget {} ({:.0}%), {remaining}",
        format_hours(allocation.total_targets),
        format_hours(allocation.budget),
        allocation.ratio * 100.
    );
    out
}

pub fn render_report(profile: &Profile, report: &WeeklyReport, color: bool) -> String {
    let mut out = String::new();
    let budget = &report.budget;

    let _ = writeln!(out, "weekly report, week of {}", report.week_start.format("%Y-%m-%d"));
    let _ = writeln!(out);
    let verdict = if budget.within_budget() {
        "within budget"
    } else {
        "over budget"
    };
    let _ = writeln!(
        out,
        "budget {}\tused {}\tremaining {}\t{}",
        format_hours(budget.budget),
        format_hours(budget.used),
        format_hours(budget.remaining),
        paint(budget.tone, verdict, color)
    );
    let _ = writeln!(
        out,
        "project minimums {}\tproject maximums {}",
        format_hours(budget.min_total),
        format_hours(budget.max_total)
    );
    let under = report
        .biggest_under()
        .map(|row| format!("{} {}", row.project.name, format_delta(row.status.delta)))
        .unwrap_or_else(|| "none".into());
    let over = report
        .biggest_over()
        .map(|row| format!("{} {}", row.project.name, format_delta(row.status.delta)))
        .unwrap_or_else(|| "none".into());
    let _ = writeln!(out, "biggest under: {under}");
    let _ = writeln!(out, "biggest over: {over}");

    let _ = writeln!(out);
    let _ = writeln!(out, "projects");
    for row in &report.projects {
        let status = &row.status;
        let direction = match status.direction() {
            Direction::Under => "under target",
            Direction::Over => "over target",
            Direction::Exact => "on target",
        };
        let _ = write!(
            out,
            "{}\tactual {}\ttarget {}\trange {}-{}\t{}\t{}",
            row.project.name,
            format_hours(status.actual),
            format_hours(status.target),
            format_hours(row.project.min_hours),
            format_hours(row.project.max_hours),
            paint(status.tone, &format_delta(status.delta), color),
            direction,
        );
        if !status.within_range {
            let _ = write!(out, "\t{}", paint(Tone::Bad, "out of range", color));
        }
        let _ = writeln!(out, "\t({})", tone_label(status.tone));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "timeline");
    for day in &report.days {
        let _ = writeln!(out, "{}\t{}", day.date, format_hours(day.total));
        let Some(work_day) = day.day else {
            continue;
        };
        for entry in &work_day.entries {
            let _ = write!(
                out,
                "  {}\t{}",
                profile.project_name(&entry.project_id),
                format_hours(entry.hours)
            );
            match &entry.note {
                Some(note) if !note.trim().is_empty() => {
                    let _ = writeln!(out, "\t{}", note.trim());
                }
                _ => {
                    let _ = writeln!(out);
                }
            }
        }
    }
    out
}
