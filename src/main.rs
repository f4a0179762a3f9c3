mod catalog;
mod config;
mod db;
mod error;
mod ledger;
mod logging;
mod models;
mod session;
mod tui;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::debug;

use config::Config;
use db::{Database, ProgressStore};
use error::{Error, Result};
use models::{CalendarCell, JsonOutput, Level, WeekdayPattern};
use session::DailySelection;

#[derive(Parser)]
#[command(name = "streakwell")]
#[command(about = "A daily wellness routine tracker with streaks, calendars and progress charts")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// User profile to read and write (defaults to $STREAKWELL_USER or "local")
    #[arg(long, short, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Show the routine for a day
    Today {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Level to show instead of the stored one
        #[arg(long, short)]
        level: Option<String>,
    },

    /// Show the 7-day plan
    Plan {
        /// Level to show instead of the stored one
        #[arg(long, short)]
        level: Option<String>,
    },

    /// Mark a whole day complete
    Complete {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Tick steps of a day's routine; the day is recorded once every step is ticked
    Check {
        /// Step numbers as shown by `today` (1-based)
        #[arg(required = true, num_args = 1..)]
        steps: Vec<usize>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Level whose routine is ticked instead of the stored one
        #[arg(long, short)]
        level: Option<String>,
    },

    /// Set the difficulty level: beginner, intermediate or advanced
    Level {
        level: String,
    },

    /// Show streak and progress statistics
    Stats {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Show the last 30 days
    History {
        /// Last day of the window (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Show a month calendar
    Calendar {
        #[arg(long, short)]
        year: Option<i32>,

        /// Month number, 1-12
        #[arg(long, short)]
        month: Option<u32>,
    },

    /// Show completions per weekday
    Pattern,

    /// Delete all progress for the user
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Launch interactive terminal UI
    Tui,
}

fn main() {
    let cli = Cli::parse();
    let config = Config::from_env().with_user(cli.user.clone());

    if matches!(cli.command, Commands::Tui) {
        if let Err(e) = logging::init_to_file(&config.log_filter, &config.log_path()) {
            eprintln!("Warning: could not open log file: {}", e);
        }
    } else {
        logging::init(&config.log_filter);
    }

    if let Err(e) = run(cli, config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn date_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => ledger::parse_date(d),
        None => Ok(today()),
    }
}

fn print_json<T: serde::Serialize>(data: T) -> Result<()> {
    println!("{}", serde_json::to_string(&JsonOutput::ok(data))?);
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let db = Database::open(&config.db_path)?;
    db.init()?;
    let user = config.user.as_str();
    debug!(user, db = %config.db_path.display(), "starting");

    match cli.command {
        Commands::Init => {
            if cli.json {
                print_json(())?;
            } else {
                println!("Database initialized at: {}", config.db_path.display());
            }
        }

        Commands::Today { date, level } => {
            let date = date_or_today(date.as_deref())?;
            let record = db.load(user)?;
            let level = level
                .as_deref()
                .map(Level::from_str_or_default)
                .unwrap_or(record.level);
            let selection = DailySelection::open_for(level, date, &record);

            if cli.json {
                print_json(&selection)?;
            } else {
                let routine = &selection.routine;
                println!("=== {}: {} ===", routine.day_name, routine.focus);
                println!("{}", routine.description);
                println!(
                    "Date: {}   Level: {} ({})",
                    ledger::format_date(date),
                    level.label(),
                    level.estimated_time()
                );
                println!();
                for (i, step) in routine.exercises.iter().enumerate() {
                    let mark = if selection.done[i] { "x" } else { " " };
                    println!("  {}. [{}] {}", i + 1, mark, step.text);
                }
                println!();
                if record.is_completed(date) {
                    println!("Status: completed");
                } else {
                    println!("Status: not completed yet");
                    println!(
                        "Tick steps with: streakwell check <n>... --date {} --level {}",
                        ledger::format_date(date),
                        level.as_str()
                    );
                }
            }
        }

        Commands::Plan { level } => {
            let level = match level {
                Some(l) => Level::from_str_or_default(&l),
                None => db.load(user)?.level,
            };
            let plan = catalog::get_weekly_plan();

            if cli.json {
                print_json(plan)?;
            } else {
                println!("=== Weekly Plan ({}) ===", level.label());
                for day in plan.iter() {
                    println!();
                    println!("{:<10} {} - {}", day.name, day.focus, day.description);
                    for step in day.routine(level) {
                        println!("    {}", step.text);
                    }
                }
            }
        }

        Commands::Complete { date } => {
            let date = date_or_today(date.as_deref())?;
            let (record, newly) = db.complete_day(user, date)?;

            if cli.json {
                print_json(serde_json::json!({
                    "date": date,
                    "newly_completed": newly,
                    "streak": record.streak,
                    "total_completed": record.total_completed,
                }))?;
            } else if newly {
                println!("Marked {} complete.", ledger::format_date(date));
                println!(
                    "Streak: {} days   Total: {}",
                    record.streak, record.total_completed
                );
            } else {
                println!("{} was already completed.", ledger::format_date(date));
            }
        }

        Commands::Check { steps, date, level } => {
            let date = date_or_today(date.as_deref())?;
            let record = db.load(user)?;
            let level = level
                .as_deref()
                .map(Level::from_str_or_default)
                .unwrap_or(record.level);
            let mut selection = DailySelection::open(level, date);
            let len = selection.steps().len();
            for n in steps {
                let index = n
                    .checked_sub(1)
                    .ok_or(Error::StepOutOfRange { index: n, len })?;
                selection.toggle_step(index)?;
            }

            let was_completed = record.is_completed(date);
            let record = if selection.is_fully_complete() {
                db.update(user, |current| selection.commit_if_complete(current))?
            } else {
                record
            };

            if cli.json {
                print_json(serde_json::json!({
                    "selection": &selection,
                    "streak": record.streak,
                    "total_completed": record.total_completed,
                }))?;
            } else {
                println!(
                    "{}/{} steps done for {}.",
                    selection.completed_count(),
                    len,
                    ledger::format_date(date)
                );
                if selection.is_fully_complete() && !was_completed {
                    println!(
                        "Routine complete! Streak: {} days   Total: {}",
                        record.streak, record.total_completed
                    );
                } else if was_completed {
                    println!("This day was already recorded.");
                }
            }
        }

        Commands::Level { level } => {
            let level = Level::from_str(&level).ok_or(Error::InvalidLevel(level))?;
            let record = db.set_level(user, level)?;

            if cli.json {
                print_json(&record)?;
            } else {
                println!(
                    "Level set to {}. Goal: {} workouts.",
                    level.label(),
                    level.goal()
                );
            }
        }

        Commands::Stats { date } => {
            let date = date_or_today(date.as_deref())?;
            let record = db.load(user)?;
            let summary = ledger::summarize(&record, date);

            if cli.json {
                print_json(&summary)?;
            } else {
                println!("=== Progress ===");
                println!("Current streak: {} days", summary.streak);
                println!("Best streak: {} days", summary.best_streak);
                println!("Workouts completed: {}", summary.total_completed);
                println!(
                    "Level: {} ({}/{} goal, {}%)",
                    summary.level.label(),
                    summary.total_completed.min(summary.goal),
                    summary.goal,
                    summary.goal_progress
                );
                println!("This month: {} days", summary.this_month);
                println!("Consistency (30 days): {}", format_consistency(summary.consistency));
            }
        }

        Commands::History { date } => {
            let date = date_or_today(date.as_deref())?;
            let record = db.load(user)?;
            let series = ledger::last_30_days_series(&record.completed_dates, date);

            if cli.json {
                print_json(&series)?;
            } else {
                let strip: String = series
                    .iter()
                    .map(|p| if p.completed == 1 { '█' } else { '·' })
                    .collect();
                println!(
                    "{} .. {}",
                    ledger::format_date(series[0].date),
                    ledger::format_date(date)
                );
                println!("{}", strip);
                println!(
                    "Consistency: {}",
                    format_consistency(ledger::consistency(&series))
                );
            }
        }

        Commands::Calendar { year, month } => {
            let now = today();
            let year = year.unwrap_or_else(|| now.year());
            let month0 = match month {
                Some(m) if (1..=12).contains(&m) => m - 1,
                Some(m) => return Err(Error::InvalidMonth { year, month: m }),
                None => now.month0(),
            };
            let record = db.load(user)?;
            let cells = ledger::calendar_month(&record.completed_dates, year, month0)?;

            if cli.json {
                print_json(&cells)?;
            } else {
                let title = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
                    .map(|d| d.format("%B %Y").to_string())
                    .unwrap_or_default();
                println!("{:^28}", title);
                for line in render_calendar(&cells) {
                    println!("{}", line);
                }
                println!(
                    "{} days completed",
                    ledger::completed_in_month(&record.completed_dates, year, month0)
                );
            }
        }

        Commands::Pattern => {
            let record = db.load(user)?;
            let pattern = ledger::weekday_intensity(&record.completed_dates);

            if cli.json {
                print_json(serde_json::json!({
                    "counts": pattern.counts,
                    "intensity": pattern.intensities(),
                }))?;
            } else {
                for line in render_pattern(&pattern) {
                    println!("{}", line);
                }
            }
        }

        Commands::Reset { yes } => {
            if !yes {
                if cli.json {
                    println!(
                        "{}",
                        serde_json::to_string(&JsonOutput::<()>::err("Pass --yes to confirm"))?
                    );
                } else {
                    println!("This deletes all progress for '{}'. Re-run with --yes.", user);
                }
                return Ok(());
            }
            let removed = db.reset(user)?;
            if cli.json {
                print_json(serde_json::json!({ "removed": removed }))?;
            } else if removed {
                println!("Progress for '{}' deleted.", user);
            } else {
                println!("No progress found for '{}'.", user);
            }
        }

        Commands::Tui => {
            tui::run(db, config.user.clone())?;
        }
    }

    Ok(())
}

fn format_consistency(pct: Option<u32>) -> String {
    match pct {
        Some(p) => format!("{}%", p),
        None => "n/a".to_string(),
    }
}

fn render_calendar(cells: &[CalendarCell]) -> Vec<String> {
    let mut lines = vec![WeekdayPattern::LABELS.join(" ")];
    for week in cells.chunks(7) {
        let line: Vec<String> = week
            .iter()
            .map(|c| match c.day {
                Some(day) => format!("{:>2}{} ", day, if c.completed { "*" } else { " " }),
                None => "    ".to_string(),
            })
            .collect();
        lines.push(line.concat().trim_end().to_string());
    }
    lines
}

fn render_pattern(pattern: &WeekdayPattern) -> Vec<String> {
    WeekdayPattern::LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let level = pattern.intensity(i) as usize;
            format!(
                "{} {}{} {}",
                label,
                "█".repeat(level),
                "░".repeat(4 - level),
                pattern.counts[i]
            )
        })
        .collect()
}
