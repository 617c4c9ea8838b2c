//! `goalpath` command-line entry point.
//!
//! # Responsibility
//! - Expose goal/task scheduling from `goalpath_core` without the mobile UI.
//! - Keep output deterministic; `--json` switches every command to JSON.

mod cmd;
mod output;
mod store;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::rule::{parse_date_arg, RuleArgs};
use cmd::{goal::GoalSubcommand, task::TaskSubcommand, template::TemplateSubcommand};
use goalpath_core::NaiveDate;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "goalpath",
    about = "Plan goals and expand their recurring tasks into dated schedules",
    version,
    propagate_version = true
)]
struct Cli {
    /// SQLite database file (default: <temp>/goalpath.sqlite3)
    #[arg(long, global = true, env = "GOALPATH_DB_PATH")]
    db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log level: trace | debug | info | warn | error
    #[arg(long, global = true, env = "GOALPATH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (logging is off without it)
    #[arg(long, global = true, env = "GOALPATH_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the core library is linked
    Ping,

    /// Preview the dates a repeat rule produces in a window
    Expand {
        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,
        #[arg(long, value_parser = parse_date_arg)]
        due: NaiveDate,
        #[command(flatten)]
        rule: RuleArgs,
    },

    /// Show which monthly modes yield a date in a window
    MonthlyModes {
        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,
        #[arg(long, value_parser = parse_date_arg)]
        due: NaiveDate,
    },

    /// Manage goals
    Goal {
        #[command(subcommand)]
        subcommand: GoalSubcommand,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Browse community templates and turn them into goals
    Template {
        #[command(subcommand)]
        subcommand: TemplateSubcommand,
    },

    /// Show scheduled tasks for a day or its week
    Agenda {
        /// Day to show (default: today)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// Show the Sunday-started week containing the day
        #[arg(long)]
        week: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or(goalpath_core::default_log_level());
        goalpath_core::init_logging(level, &log_dir.to_string_lossy())
            .context("failed to initialize logging")?;
    }

    let db_path = store::resolve_db_path(cli.db.as_deref());
    let json = cli.json;
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        db_path.display()
    );

    match cli.command {
        Commands::Ping => {
            if json {
                output::print_json(&serde_json::json!({
                    "ping": goalpath_core::ping(),
                    "version": goalpath_core::core_version(),
                }))
            } else {
                println!("goalpath_core ping={}", goalpath_core::ping());
                println!("goalpath_core version={}", goalpath_core::core_version());
                Ok(())
            }
        }
        Commands::Expand { start, due, rule } => {
            cmd::schedule::expand_dates(start, due, &rule, json)
        }
        Commands::MonthlyModes { start, due } => cmd::schedule::monthly_modes(start, due, json),
        Commands::Goal { subcommand } => {
            let conn = store::open(&db_path)?;
            cmd::goal::run(&conn, subcommand, json)
        }
        Commands::Task { subcommand } => {
            let conn = store::open(&db_path)?;
            cmd::task::run(&conn, subcommand, json)
        }
        Commands::Template { subcommand } => {
            let conn = store::open(&db_path)?;
            cmd::template::run(&conn, subcommand, json)
        }
        Commands::Agenda { date, week } => {
            let conn = store::open(&db_path)?;
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            cmd::agenda::run(&conn, date, week, json)
        }
    }
}
