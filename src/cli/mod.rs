pub mod dates;
pub mod render;

use std::{io::IsTerminal, path::PathBuf};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use dates::{resolve_date, DateStyle};
use tokio::sync::mpsc;
use tracing::{info, level_filters::LevelFilter};

use crate::{
    engine::{session::Session, AddEntryInput, AppState, Command, Engine},
    metrics::report::WeeklyReport,
    model::{Profile, Project},
    storage::{load_profile, persistence::PersistenceModule, JsonProfileStore},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, ensure_dir},
        hours::{format_hours, Hours},
        ids::{IdGenerator, UuidGenerator},
        logging::{enable_logging, CLI_PREFIX},
        time::{date_key, week_start},
    },
};

/// Colours handed out to projects created from the terminal, in order.
pub const DEFAULT_COLORS: [&str; 7] = [
    "#4f46e5", "#10b981", "#f59e0b", "#ef4444", "#22c55e", "#06b6d4", "#a855f7",
];
const FALLBACK_COLOR: &str = "#3f3f46";

#[derive(Parser, Debug)]
#[command(name = "Weektally", version, long_about = None)]
#[command(about = "Log hours per project and compare every week against your targets", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Print logs to the console")]
    log: bool,
    #[arg(long = "log-filter", help = "Log level written to the log files")]
    log_filter: Option<LevelFilter>,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Create the profile with a weekly budget and initial projects")]
    Setup {
        #[arg(long, help = "Weekly budget in hours, e.g. 40 or 37h30m")]
        budget: Hours,
        #[arg(long = "project", required = true, help = "Project name, can be repeated")]
        projects: Vec<String>,
        #[arg(long, help = "Replace an existing profile")]
        force: bool,
    },
    #[command(about = "Change the weekly budget")]
    Budget { hours: Hours },
    #[command(about = "List projects and how much of the budget their targets take")]
    Projects,
    #[command(about = "Add, change or remove projects")]
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    #[command(about = "Log hours against a project")]
    Log {
        #[arg(help = "Project name or id")]
        project: String,
        #[arg(help = "Hours, e.g. 1.5, 1h30m or 90m. Rounded to quarter hours")]
        hours: Hours,
        #[arg(long, help = "Day to log on. Defaults to today")]
        date: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    #[command(about = "Remove a logged entry")]
    Unlog {
        entry_id: String,
        #[arg(long, help = "Day the entry is on. Searched for when omitted")]
        date: Option<String>,
    },
    #[command(about = "Show the entries of a day")]
    Day {
        #[arg(long)]
        date: Option<String>,
    },
    #[command(about = "Show the weekly report for the week containing a day")]
    Report {
        #[arg(long)]
        date: Option<String>,
    },
    #[command(about = "Delete the profile with all projects and entries")]
    Reset,
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    Add {
        name: String,
        #[arg(long)]
        color: Option<String>,
        #[command(flatten)]
        bounds: BoundsArgs,
    },
    Update {
        #[arg(help = "Project name or id")]
        project: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[command(flatten)]
        bounds: BoundsArgs,
    },
    Remove {
        #[arg(help = "Project name or id. Entries logged against it are removed too")]
        project: String,
    },
}

#[derive(Debug, Clone, Copy, clap::Args)]
struct BoundsArgs {
    #[arg(long, help = "Minimum weekly hours")]
    min: Option<Hours>,
    #[arg(long, help = "Target weekly hours")]
    target: Option<Hours>,
    #[arg(long, help = "Maximum weekly hours")]
    max: Option<Hours>,
}

impl BoundsArgs {
    /// Overrides the bounds of `project` that were given, snapped to quarter hours.
    fn apply(self, project: Project) -> Project {
        let pick = |value: Option<Hours>, current: f64| {
            value.map_or(current, |v| *v.quarter_rounded())
        };
        Project {
            min_hours: pick(self.min, project.min_hours),
            target_hours: pick(self.target, project.target_hours),
            max_hours: pick(self.max, project.max_hours),
            ..project
        }
    }
}

/// Capabilities commands need besides the session.
pub struct CliContext<'a> {
    pub clock: &'a dyn Clock,
    pub ids: &'a dyn IdGenerator,
    pub date_style: DateStyle,
    pub color: bool,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .clone()
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        args.log_filter
    };
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, args.log)?;

    let store = JsonProfileStore::new(app_dir)?;
    let profile = load_profile(&store).await;

    let (sender, receiver) = mpsc::unbounded_channel();
    let persistence = tokio::spawn(PersistenceModule::new(receiver, store).run());

    let mut session = Session::new(
        Engine::new(Box::new(DefaultClock), Box::new(UuidGenerator)),
        AppState::with_profile(profile),
        Some(sender),
    );
    let context = CliContext {
        clock: &DefaultClock,
        ids: &UuidGenerator,
        date_style: args.date_style,
        color: std::io::stdout().is_terminal(),
    };

    let result = execute(args.commands, &mut session, &context);

    // Dropping the session closes the channel, which lets persistence write the last snapshot
    // and finish.
    drop(session);
    persistence.await?;

    let output = result?;
    print!("{output}");
    Ok(())
}

fn require_profile(session: &Session) -> Result<&Profile> {
    session
        .profile()
        .ok_or_else(|| anyhow!("There is no profile yet, create one with `weektally setup`"))
}

/// Finds a project by id, or by name ignoring case.
fn find_project<'a>(profile: &'a Profile, key: &str) -> Result<&'a Project> {
    if let Some(project) = profile.project(key) {
        return Ok(project);
    }
    let key = key.trim().to_lowercase();
    let mut matches = profile
        .projects
        .iter()
        .filter(|p| p.name.trim().to_lowercase() == key);
    match (matches.next(), matches.next()) {
        (Some(project), None) => Ok(project),
        (Some(_), Some(_)) => bail!("More than one project is called {key:?}, use its id"),
        (None, _) => bail!("No project called {key:?}"),
    }
}

fn next_color(projects: &[Project]) -> String {
    DEFAULT_COLORS
        .iter()
        .find(|c| projects.iter().all(|p| p.color != **c))
        .unwrap_or(&FALLBACK_COLOR)
        .to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates the command line input, dispatches it and returns what should be printed.
fn execute(command: Commands, session: &mut Session, context: &CliContext) -> Result<String> {
    match command {
        Commands::Setup {
            budget,
            projects,
            force,
        } => {
            if session.profile().is_some() && !force {
                bail!("A profile already exists. Use --force to replace it");
            }
            if *budget <= 0. {
                bail!("The weekly budget has to be positive");
            }
            if projects.iter().any(|name| name.trim().is_empty()) {
                bail!("Project names can't be empty");
            }
            let projects = projects
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    Project::new(
                        context.ids.next_id(),
                        name.trim(),
                        DEFAULT_COLORS[i % DEFAULT_COLORS.len()],
                    )
                })
                .collect::<Vec<_>>();
            let count = projects.len();
            session.dispatch(Command::CreateProfile {
                weekly_budget_hours: *budget.quarter_rounded(),
                projects,
            });
            info!("Created profile with {count} projects");
            Ok(format!(
                "Created profile with a {budget} weekly budget and {count} projects\n"
            ))
        }
        Commands::Budget { hours } => {
            require_profile(session)?;
            let hours = hours.quarter_rounded();
            session.dispatch(Command::SetWeeklyBudget {
                weekly_budget_hours: *hours,
            });
            Ok(format!("Weekly budget set to {hours}\n"))
        }
        Commands::Projects => Ok(render::render_projects(require_profile(session)?)),
        Commands::Project { command } => execute_project(command, session, context),
        Commands::Log {
            project,
            hours,
            date,
            note,
        } => {
            let profile = require_profile(session)?;
            let project = find_project(profile, &project)?.clone();
            let hours = hours.quarter_rounded();
            if *hours <= 0. {
                bail!("Hours have to be at least a quarter of an hour");
            }
            let date = date_key(resolve_date(date.as_deref(), context.clock, context.date_style)?);
            session.dispatch(Command::AddEntry {
                input: AddEntryInput {
                    date: date.clone(),
                    project_id: project.id.clone(),
                    hours: *hours,
                    note: non_empty(note),
                },
            });
            let entry_id = session
                .profile()
                .and_then(|p| p.day(&date))
                .and_then(|d| d.entries.last())
                .map(|e| e.id.clone())
                .unwrap_or_default();
            Ok(format!(
                "Logged {hours} on {} for {date} [{entry_id}]\n",
                project.name
            ))
        }
        Commands::Unlog { entry_id, date } => {
            let profile = require_profile(session)?;
            let date = match date {
                Some(date) => {
                    let date = date_key(resolve_date(Some(date.as_str()), context.clock, context.date_style)?);
                    let found = profile
                        .day(&date)
                        .is_some_and(|d| d.entries.iter().any(|e| e.id == entry_id));
                    if !found {
                        bail!("No entry {entry_id} on {date}");
                    }
                    date
                }
                None => profile
                    .work_days
                    .iter()
                    .find(|d| d.entries.iter().any(|e| e.id == entry_id))
                    .map(|d| d.date.clone())
                    .ok_or_else(|| anyhow!("No entry {entry_id}"))?,
            };
            session.dispatch(Command::RemoveEntry {
                date: date.clone(),
                entry_id: entry_id.clone(),
            });
            Ok(format!("Removed entry {entry_id} from {date}\n"))
        }
        Commands::Day { date } => {
            let profile = require_profile(session)?;
            let date = date_key(resolve_date(date.as_deref(), context.clock, context.date_style)?);
            Ok(render::render_day(profile, &date, profile.day(&date)))
        }
        Commands::Report { date } => {
            let profile = require_profile(session)?;
            let date = resolve_date(date.as_deref(), context.clock, context.date_style)?;
            let report = WeeklyReport::new(profile, week_start(date));
            Ok(render::render_report(profile, &report, context.color))
        }
        Commands::Reset => {
            session.dispatch(Command::ResetProfile);
            Ok("Profile removed\n".to_string())
        }
    }
}

fn execute_project(command: ProjectCommand, session: &mut Session, context: &CliContext) -> Result<String> {
    let profile = require_profile(session)?;
    match command {
        ProjectCommand::Add {
            name,
            color,
            bounds,
        } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("Project names can't be empty");
            }
            let color = non_empty(color).unwrap_or_else(|| next_color(&profile.projects));
            let project = bounds.apply(Project::new(context.ids.next_id(), name, color));
            let message = format!("Added project {} [{}]\n", project.name, project.id);
            session.dispatch(Command::AddProject { project });
            Ok(message)
        }
        ProjectCommand::Update {
            project,
            name,
            color,
            bounds,
        } => {
            let current = find_project(profile, &project)?.clone();
            let name = match name {
                Some(name) if name.trim().is_empty() => bail!("Project names can't be empty"),
                Some(name) => name.trim().to_string(),
                None => current.name.clone(),
            };
            let project = bounds.apply(Project {
                name,
                color: non_empty(color).unwrap_or_else(|| current.color.clone()),
                ..current
            });
            let message = format!(
                "Updated project {}: min {} target {} max {}\n",
                project.name,
                format_hours(project.min_hours),
                format_hours(project.target_hours),
                format_hours(project.max_hours),
            );
            session.dispatch(Command::UpdateProject { project });
            Ok(message)
        }
        ProjectCommand::Remove { project } => {
            let project = find_project(profile, &project)?.clone();
            session.dispatch(Command::RemoveProject {
                project_id: project.id.clone(),
            });
            Ok(format!(
                "Removed project {} and every entry logged against it\n",
                project.name
            ))
        }
    }
}
