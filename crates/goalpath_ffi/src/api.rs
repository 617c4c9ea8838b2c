//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Translate string/int wire values into core types and back.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Dates cross the boundary as `yyyy-MM-dd` strings; weekdays as
//!   Sunday-based indices (`0..=6`).
//! - Failures are reported in envelopes (`ok=false` + message), never thrown.

use goalpath_core::db::open_db;
use goalpath_core::{
    core_version as core_version_inner, expand, format_iso_date, format_iso_dates,
    init_logging as init_logging_inner, monthly_mode_options, parse_iso_date, ping as ping_inner,
    AgendaEntry, DateChange, Goal, GoalService, MonthlyMode, NaiveDate, RecurrenceRule,
    SqliteGoalRepository, SqliteTaskRepository, SqliteTemplateRepository, SwipeOutcome, Task,
    TaskDraft, TaskService, TaskType, Template, TemplateFilter, TemplateService, WeekdaySet,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const ENTRY_DB_FILE_NAME: &str = "goalpath.sqlite3";
static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Repeat settings as sent by the task editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatInput {
    /// `normal|daily|weekly|monthly`.
    pub task_type: String,
    /// Picked dates for `normal`.
    pub dates: Vec<String>,
    /// Selected weekdays for `weekly` (0 = Sunday).
    pub days_of_week: Vec<u8>,
    /// `start|mid|end` for `monthly`.
    pub monthly_mode: Option<String>,
}

/// Date list envelope for live previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatesResponse {
    pub ok: bool,
    pub dates: Vec<String>,
    pub message: String,
}

/// Availability of one monthly mode for the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyModeItem {
    pub mode: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyModesResponse {
    pub ok: bool,
    pub items: Vec<MonthlyModeItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryActionResponse {
    pub ok: bool,
    /// Created or affected goal/task ID.
    pub id: Option<String>,
    /// Materialized dates when the action saved a task.
    pub dates: Vec<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl EntryActionResponse {
    fn success(message: impl Into<String>, id: String, dates: Vec<String>) -> Self {
        Self {
            ok: true,
            id: Some(id),
            dates,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            dates: Vec::new(),
            message: message.into(),
        }
    }
}

/// Outcome of a goal date change.
///
/// `needs_confirmation=true` means nothing changed; the UI must ask the user
/// and call again with `confirmed=true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDateChangeResponse {
    pub ok: bool,
    pub needs_confirmation: bool,
    pub task_count: u32,
    pub cleared_tasks: u32,
    pub message: String,
}

impl GoalDateChangeResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            needs_confirmation: false,
            task_count: 0,
            cleared_tasks: 0,
            message: message.into(),
        }
    }
}

/// One schedule row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaItem {
    pub goal_id: String,
    pub goal_title: String,
    pub task_id: String,
    pub title: String,
    /// `normal|daily|weekly|monthly`.
    pub task_type: String,
    /// `in_progress|completed|failed`.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaResponse {
    pub ok: bool,
    pub date: String,
    pub items: Vec<AgendaItem>,
    pub message: String,
}

/// Goal row for list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalItem {
    pub id: String,
    pub title: String,
    pub start_date: String,
    pub due_date: String,
}

impl From<Goal> for GoalItem {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.uuid.to_string(),
            title: goal.title,
            start_date: format_iso_date(goal.start_date),
            due_date: format_iso_date(goal.due_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalsResponse {
    pub ok: bool,
    pub items: Vec<GoalItem>,
    pub message: String,
}

/// Task with its repeat settings and materialized dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub description: Option<String>,
    pub task_type: String,
    pub days_of_week: Vec<u8>,
    pub monthly_mode: Option<String>,
    pub status: String,
    pub dates: Vec<String>,
}

impl From<Task> for TaskItem {
    fn from(task: Task) -> Self {
        Self {
            id: task.uuid.to_string(),
            goal_id: task.goal_id.to_string(),
            title: task.title,
            description: task.description,
            task_type: task.kind.as_str().to_string(),
            days_of_week: task
                .selected_days_of_week
                .map(|days| days.indices())
                .unwrap_or_default(),
            monthly_mode: task.monthly_mode.map(|mode| mode.as_str().to_string()),
            status: task.status.as_str().to_string(),
            dates: format_iso_dates(&task.selected_dates),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// One day of the week view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaDayItem {
    pub date: String,
    pub items: Vec<AgendaItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekAgendaResponse {
    pub ok: bool,
    pub days: Vec<AgendaDayItem>,
    pub message: String,
}

/// Template task as shown on the customize screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTaskItem {
    pub title: String,
    pub task_type: String,
    pub days_of_week: Vec<u8>,
    pub monthly_mode: Option<String>,
}

/// Community template card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateItem {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `workout|finance`.
    pub category: String,
    pub is_favorite: bool,
    pub tasks: Vec<TemplateTaskItem>,
}

impl From<Template> for TemplateItem {
    fn from(template: Template) -> Self {
        Self {
            id: template.id.to_string(),
            title: template.title,
            description: template.description,
            category: template.category.as_str().to_string(),
            is_favorite: template.is_favorite,
            tasks: template
                .tasks
                .into_iter()
                .map(|task| TemplateTaskItem {
                    title: task.title,
                    task_type: task.kind.as_str().to_string(),
                    days_of_week: task
                        .selected_days_of_week
                        .map(|days| days.indices())
                        .unwrap_or_default(),
                    monthly_mode: task.monthly_mode.map(|mode| mode.as_str().to_string()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatesResponse {
    pub ok: bool,
    pub items: Vec<TemplateItem>,
    pub message: String,
}

/// Expands repeat settings over `[start, due]` without saving anything.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Invalid range, unknown type/mode, bad weekday or out-of-range picked
///   date return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn expand_task_dates(start: String, due: String, repeat: RepeatInput) -> DatesResponse {
    let result = parse_window(&start, &due).and_then(|(start, due)| {
        let rule = parse_rule(&repeat)?;
        expand(start, due, &rule).map_err(|err| err.to_string())
    });

    match result {
        Ok(dates) => DatesResponse {
            ok: true,
            message: format!("{} date(s).", dates.len()),
            dates: format_iso_dates(&dates),
        },
        Err(message) => DatesResponse {
            ok: false,
            dates: Vec::new(),
            message: format!("expand_task_dates failed: {message}"),
        },
    }
}

/// Which monthly modes produce at least one date in `[start, due]`.
#[flutter_rust_bridge::frb(sync)]
pub fn monthly_mode_availability(start: String, due: String) -> MonthlyModesResponse {
    let result = parse_window(&start, &due).and_then(|(start, due)| {
        monthly_mode_options(start, due).map_err(|err| err.to_string())
    });

    match result {
        Ok(options) => MonthlyModesResponse {
            ok: true,
            items: options
                .into_iter()
                .map(|option| MonthlyModeItem {
                    mode: option.mode.as_str().to_string(),
                    available: option.available,
                })
                .collect(),
            message: String::new(),
        },
        Err(message) => MonthlyModesResponse {
            ok: false,
            items: Vec::new(),
            message: format!("monthly_mode_availability failed: {message}"),
        },
    }
}

/// Creates a goal.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Returns the created goal ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_create_goal(title: String, start: String, due: String) -> EntryActionResponse {
    let result = parse_window(&start, &due).and_then(|(start, due)| {
        with_connection(|conn| {
            let service = GoalService::new(repo_err(SqliteGoalRepository::try_new(conn))?);
            service
                .create_goal(title.trim(), start, due)
                .map_err(|err| err.to_string())
        })
    });

    match result {
        Ok(goal) => {
            EntryActionResponse::success("Goal created.", goal.uuid.to_string(), Vec::new())
        }
        Err(message) => {
            EntryActionResponse::failure(format!("entry_create_goal failed: {message}"))
        }
    }
}

/// Adds a task to a goal, expanding its dates over the goal window.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Returns the task ID and its materialized dates on success.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_add_task(
    goal_id: String,
    title: String,
    description: Option<String>,
    repeat: RepeatInput,
) -> EntryActionResponse {
    let result = parse_id(&goal_id).and_then(|goal_id| {
        let mut draft = TaskDraft::new(title, parse_rule(&repeat)?);
        draft.description = description;
        with_task_service(|service| {
            service
                .add_task(goal_id, draft)
                .map_err(|err| err.to_string())
        })
    });

    match result {
        Ok(task) => EntryActionResponse::success(
            "Task created.",
            task.uuid.to_string(),
            format_iso_dates(&task.selected_dates),
        ),
        Err(message) => EntryActionResponse::failure(format!("entry_add_task failed: {message}")),
    }
}

/// Replaces a task's title, description and repeat settings.
///
/// # FFI contract
/// - Dates are recomputed from scratch over the goal window.
/// - Swipe status is kept.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_update_task(
    task_id: String,
    title: String,
    description: Option<String>,
    repeat: RepeatInput,
) -> EntryActionResponse {
    let result = parse_id(&task_id).and_then(|task_id| {
        let mut draft = TaskDraft::new(title, parse_rule(&repeat)?);
        draft.description = description;
        with_task_service(|service| {
            service
                .update_task(task_id, draft)
                .map_err(|err| err.to_string())
        })
    });

    match result {
        Ok(task) => EntryActionResponse::success(
            "Task updated.",
            task.uuid.to_string(),
            format_iso_dates(&task.selected_dates),
        ),
        Err(message) => {
            EntryActionResponse::failure(format!("entry_update_task failed: {message}"))
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete_task(task_id: String) -> EntryActionResponse {
    let result = parse_id(&task_id).and_then(|task_id| {
        with_task_service(|service| service.delete_task(task_id).map_err(|err| err.to_string()))
            .map(|()| task_id)
    });

    match result {
        Ok(task_id) => EntryActionResponse::success("Task deleted.", task_id.to_string(), Vec::new()),
        Err(message) => {
            EntryActionResponse::failure(format!("entry_delete_task failed: {message}"))
        }
    }
}

/// Records a committed swipe on a task: `complete` (right) or `fail` (left).
#[flutter_rust_bridge::frb(sync)]
pub fn entry_swipe_task(task_id: String, outcome: String) -> EntryActionResponse {
    let result = parse_id(&task_id).and_then(|task_id| {
        let outcome = parse_outcome(&outcome)?;
        with_task_service(|service| {
            service
                .apply_swipe_outcome(task_id, outcome)
                .map_err(|err| err.to_string())
        })
    });

    match result {
        Ok(task) => EntryActionResponse::success(
            format!("Task {}.", task.status.as_str()),
            task.uuid.to_string(),
            format_iso_dates(&task.selected_dates),
        ),
        Err(message) => {
            EntryActionResponse::failure(format!("entry_swipe_task failed: {message}"))
        }
    }
}

/// Records a committed swipe on a whole goal card; every task of the goal
/// gets the same status.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_swipe_goal(goal_id: String, outcome: String) -> EntryActionResponse {
    let result = parse_id(&goal_id).and_then(|goal_id| {
        let outcome = parse_outcome(&outcome)?;
        with_task_service(|service| {
            service
                .apply_goal_swipe_outcome(goal_id, outcome)
                .map_err(|err| err.to_string())
        })
        .map(|tasks| (goal_id, outcome, tasks))
    });

    match result {
        Ok((goal_id, outcome, tasks)) => EntryActionResponse::success(
            format!(
                "{} task(s) {}.",
                tasks.len(),
                outcome.task_status().as_str()
            ),
            goal_id.to_string(),
            Vec::new(),
        ),
        Err(message) => {
            EntryActionResponse::failure(format!("entry_swipe_goal failed: {message}"))
        }
    }
}

/// Goals ordered by window.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list_goals() -> GoalsResponse {
    let result = with_connection(|conn| {
        let service = GoalService::new(repo_err(SqliteGoalRepository::try_new(conn))?);
        service.list_goals().map_err(|err| err.to_string())
    });

    match result {
        Ok(goals) => GoalsResponse {
            ok: true,
            message: format!("{} goal(s).", goals.len()),
            items: goals.into_iter().map(GoalItem::from).collect(),
        },
        Err(message) => GoalsResponse {
            ok: false,
            items: Vec::new(),
            message: format!("entry_list_goals failed: {message}"),
        },
    }
}

/// Tasks of one goal in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list_tasks(goal_id: String) -> TasksResponse {
    let result = parse_id(&goal_id).and_then(|goal_id| {
        with_task_service(|service| service.list_tasks(goal_id).map_err(|err| err.to_string()))
    });

    match result {
        Ok(tasks) => TasksResponse {
            ok: true,
            message: format!("{} task(s).", tasks.len()),
            items: tasks.into_iter().map(TaskItem::from).collect(),
        },
        Err(message) => TasksResponse {
            ok: false,
            items: Vec::new(),
            message: format!("entry_list_tasks failed: {message}"),
        },
    }
}

/// Moves a goal's window.
///
/// # FFI contract
/// - With tasks and `confirmed=false`: `needs_confirmation=true`, nothing
///   changed.
/// - Otherwise the window moves and every task of the goal is deleted.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_change_goal_dates(
    goal_id: String,
    start: String,
    due: String,
    confirmed: bool,
) -> GoalDateChangeResponse {
    let result = parse_id(&goal_id).and_then(|goal_id| {
        let (start, due) = parse_window(&start, &due)?;
        with_connection(|conn| {
            let service = GoalService::new(repo_err(SqliteGoalRepository::try_new(conn))?);
            service
                .change_goal_dates(goal_id, start, due, confirmed)
                .map_err(|err| err.to_string())
        })
    });

    match result {
        Ok(DateChange::ConfirmationRequired { task_count }) => GoalDateChangeResponse {
            ok: true,
            needs_confirmation: true,
            task_count,
            cleared_tasks: 0,
            message: format!("Changing dates will delete {task_count} task(s)."),
        },
        Ok(DateChange::Applied { cleared_tasks, .. }) => {
            let cleared_tasks = u32::try_from(cleared_tasks).unwrap_or(u32::MAX);
            GoalDateChangeResponse {
                ok: true,
                needs_confirmation: false,
                task_count: 0,
                cleared_tasks,
                message: "Goal dates updated.".to_string(),
            }
        }
        Err(message) => {
            GoalDateChangeResponse::failure(format!("entry_change_goal_dates failed: {message}"))
        }
    }
}

/// Tasks scheduled on `date` across all goals.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_agenda(date: String) -> AgendaResponse {
    let result = parse_date(&date).and_then(|day| {
        with_task_service(|service| service.agenda_for(day).map_err(|err| err.to_string()))
            .map(|entries| (day, entries))
    });

    match result {
        Ok((day, entries)) => {
            let items = entries.into_iter().map(agenda_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "Nothing scheduled.".to_string()
            } else {
                format!("{} task(s).", items.len())
            };
            AgendaResponse {
                ok: true,
                date: format_iso_date(day),
                items,
                message,
            }
        }
        Err(message) => AgendaResponse {
            ok: false,
            date,
            items: Vec::new(),
            message: format!("entry_agenda failed: {message}"),
        },
    }
}

/// Sunday-started week containing `date`, seven days in order.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_week_agenda(date: String) -> WeekAgendaResponse {
    let result = parse_date(&date).and_then(|day| {
        with_task_service(|service| service.week_agenda(day).map_err(|err| err.to_string()))
    });

    match result {
        Ok(days) => {
            let total = days.iter().map(|day| day.entries.len()).sum::<usize>();
            WeekAgendaResponse {
                ok: true,
                days: days
                    .into_iter()
                    .map(|day| AgendaDayItem {
                        date: format_iso_date(day.date),
                        items: day.entries.into_iter().map(agenda_item).collect(),
                    })
                    .collect(),
                message: format!("{total} task(s) this week."),
            }
        }
        Err(message) => WeekAgendaResponse {
            ok: false,
            days: Vec::new(),
            message: format!("entry_week_agenda failed: {message}"),
        },
    }
}

/// Community templates passing `filter` (`all|favorites|workout|finance`)
/// whose title or description contains `query`, case-insensitively.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list_templates(filter: String, query: String) -> TemplatesResponse {
    let result = filter
        .parse::<TemplateFilter>()
        .map_err(|err| err.to_string())
        .and_then(|filter| {
            with_template_service(|service| {
                service
                    .filter_templates(filter, &query)
                    .map_err(|err| err.to_string())
            })
        });

    match result {
        Ok(templates) => TemplatesResponse {
            ok: true,
            message: format!("{} template(s).", templates.len()),
            items: templates.into_iter().map(TemplateItem::from).collect(),
        },
        Err(message) => TemplatesResponse {
            ok: false,
            items: Vec::new(),
            message: format!("entry_list_templates failed: {message}"),
        },
    }
}

/// Flips a template's favorite mark; returns the updated template.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_toggle_template_favorite(template_id: String) -> TemplatesResponse {
    let result = parse_id(&template_id).and_then(|template_id| {
        with_template_service(|service| {
            service
                .toggle_favorite(template_id)
                .map_err(|err| err.to_string())
        })
    });

    match result {
        Ok(template) => TemplatesResponse {
            ok: true,
            message: if template.is_favorite {
                "Added to favorites.".to_string()
            } else {
                "Removed from favorites.".to_string()
            },
            items: vec![TemplateItem::from(template)],
        },
        Err(message) => TemplatesResponse {
            ok: false,
            items: Vec::new(),
            message: format!("entry_toggle_template_favorite failed: {message}"),
        },
    }
}

/// Creates a goal from a customized template.
///
/// Input semantics:
/// - `title`: goal title; blank keeps the template title.
/// - `cycled_tasks`: task indices whose repeat type steps
///   `daily -> weekly -> monthly -> daily`, applied first.
/// - `removed_tasks`: task indices left out.
/// - Indices are 0-based positions in the template as listed.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_use_template(
    template_id: String,
    title: String,
    start: String,
    due: String,
    cycled_tasks: Vec<u32>,
    removed_tasks: Vec<u32>,
) -> EntryActionResponse {
    let result = parse_id(&template_id).and_then(|template_id| {
        let (start, due) = parse_window(&start, &due)?;
        with_template_service(|service| {
            let mut draft = service
                .customize(template_id)
                .map_err(|err| err.to_string())?;
            if !title.trim().is_empty() {
                draft.title = title;
            }
            for index in cycled_tasks {
                draft
                    .cycle_task_type(index as usize)
                    .ok_or_else(|| format!("template has no task at index {index}"))?;
            }
            let mut removed_tasks = removed_tasks;
            removed_tasks.sort_unstable();
            removed_tasks.dedup();
            for index in removed_tasks.into_iter().rev() {
                draft
                    .remove_task(index as usize)
                    .ok_or_else(|| format!("template has no task at index {index}"))?;
            }
            service
                .instantiate_goal(&draft, start, due)
                .map_err(|err| err.to_string())
        })
    });

    match result {
        Ok(created) => EntryActionResponse::success(
            format!("Goal created with {} task(s).", created.tasks.len()),
            created.goal.uuid.to_string(),
            Vec::new(),
        ),
        Err(message) => {
            EntryActionResponse::failure(format!("entry_use_template failed: {message}"))
        }
    }
}

fn agenda_item(entry: AgendaEntry) -> AgendaItem {
    AgendaItem {
        goal_id: entry.goal_id.to_string(),
        goal_title: entry.goal_title,
        task_id: entry.task.uuid.to_string(),
        title: entry.task.title,
        task_type: entry.task.kind.as_str().to_string(),
        status: entry.task.status.as_str().to_string(),
    }
}

fn parse_outcome(value: &str) -> Result<SwipeOutcome, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "complete" => Ok(SwipeOutcome::Complete),
        "fail" => Ok(SwipeOutcome::Fail),
        other => Err(format!(
            "unknown swipe outcome `{other}`; expected complete|fail"
        )),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_iso_date(value).map_err(|err| err.to_string())
}

fn parse_window(start: &str, due: &str) -> Result<(NaiveDate, NaiveDate), String> {
    Ok((parse_date(start)?, parse_date(due)?))
}

fn parse_id(value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|err| format!("invalid id `{value}`: {err}"))
}

fn parse_rule(repeat: &RepeatInput) -> Result<RecurrenceRule, String> {
    let kind = repeat
        .task_type
        .trim()
        .parse::<TaskType>()
        .map_err(|err| err.to_string())?;

    let rule = match kind {
        TaskType::Normal => RecurrenceRule::Normal {
            dates: repeat
                .dates
                .iter()
                .map(|value| parse_date(value))
                .collect::<Result<Vec<_>, _>>()?,
        },
        TaskType::Daily => RecurrenceRule::Daily,
        TaskType::Weekly => RecurrenceRule::Weekly {
            days: WeekdaySet::from_indices(&repeat.days_of_week)
                .map_err(|err| err.to_string())?,
        },
        TaskType::Monthly => {
            let raw = repeat
                .monthly_mode
                .as_deref()
                .ok_or_else(|| "monthly_mode is required for monthly tasks".to_string())?;
            RecurrenceRule::Monthly {
                mode: raw
                    .trim()
                    .parse::<MonthlyMode>()
                    .map_err(|err| err.to_string())?,
            }
        }
    };
    Ok(rule)
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("GOALPATH_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
        })
        .clone()
}

fn with_connection<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let db_path = resolve_entry_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=entry_db_open module=ffi status=error error={err}");
        format!("entry DB open failed: {err}")
    })?;
    f(&conn)
}

fn with_task_service<T>(
    f: impl FnOnce(
        &TaskService<SqliteGoalRepository<'_>, SqliteTaskRepository<'_>>,
    ) -> Result<T, String>,
) -> Result<T, String> {
    with_connection(|conn| {
        let service = TaskService::new(
            repo_err(SqliteGoalRepository::try_new(conn))?,
            repo_err(SqliteTaskRepository::try_new(conn))?,
        );
        f(&service)
    })
}

fn with_template_service<T>(
    f: impl FnOnce(
        &TemplateService<
            SqliteTemplateRepository<'_>,
            SqliteGoalRepository<'_>,
            SqliteTaskRepository<'_>,
        >,
    ) -> Result<T, String>,
) -> Result<T, String> {
    with_connection(|conn| {
        let service = TemplateService::new(
            repo_err(SqliteTemplateRepository::try_new(conn))?,
            repo_err(SqliteGoalRepository::try_new(conn))?,
            repo_err(SqliteTaskRepository::try_new(conn))?,
        );
        f(&service)
    })
}

fn repo_err<T>(result: goalpath_core::RepoResult<T>) -> Result<T, String> {
    result.map_err(|err| format!("entry repo init failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, entry_add_task, entry_agenda, entry_change_goal_dates, entry_create_goal,
        entry_delete_task, entry_list_goals, entry_list_tasks, entry_list_templates,
        entry_swipe_goal, entry_swipe_task, entry_toggle_template_favorite, entry_update_task,
        entry_use_template, entry_week_agenda, expand_task_dates, init_logging,
        monthly_mode_availability, ping, RepeatInput,
    };

    fn repeat(task_type: &str) -> RepeatInput {
        RepeatInput {
            task_type: task_type.to_string(),
            dates: Vec::new(),
            days_of_week: Vec::new(),
            monthly_mode: None,
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn expand_task_dates_weekly_preview() {
        let mut input = repeat("weekly");
        input.days_of_week = vec![1, 3, 5];
        let response =
            expand_task_dates("2025-02-01".to_string(), "2025-02-28".to_string(), input);
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.dates.len(), 12);
        assert_eq!(response.dates[0], "2025-02-03");
    }

    #[test]
    fn expand_task_dates_reports_bad_input() {
        let reversed =
            expand_task_dates("2025-03-01".to_string(), "2025-02-01".to_string(), repeat("daily"));
        assert!(!reversed.ok);
        assert!(reversed.message.contains("must be >= start date"));

        let missing_mode = expand_task_dates(
            "2025-01-01".to_string(),
            "2025-01-31".to_string(),
            repeat("monthly"),
        );
        assert!(!missing_mode.ok);
        assert!(missing_mode.message.contains("monthly_mode"));

        let unknown = expand_task_dates(
            "2025-01-01".to_string(),
            "2025-01-31".to_string(),
            repeat("yearly"),
        );
        assert!(!unknown.ok);
    }

    #[test]
    fn monthly_mode_availability_marks_short_windows() {
        let response = monthly_mode_availability("2025-03-10".to_string(), "2025-03-20".to_string());
        assert!(response.ok, "{}", response.message);
        let available = response
            .items
            .iter()
            .filter(|item| item.available)
            .map(|item| item.mode.as_str())
            .collect::<Vec<_>>();
        assert_eq!(available, vec!["mid"]);
    }

    #[test]
    fn goal_task_flow_with_confirmation_and_agenda() {
        let goal = entry_create_goal(
            "FFI flow".to_string(),
            "2190-03-01".to_string(),
            "2190-03-31".to_string(),
        );
        assert!(goal.ok, "{}", goal.message);
        let goal_id = goal.id.expect("goal id");

        let mut input = repeat("monthly");
        input.monthly_mode = Some("mid".to_string());
        let task = entry_add_task(goal_id.clone(), "Check in".to_string(), None, input);
        assert!(task.ok, "{}", task.message);
        assert_eq!(task.dates, vec!["2190-03-16".to_string()]);
        let task_id = task.id.expect("task id");

        let swiped = entry_swipe_task(task_id.clone(), "complete".to_string());
        assert!(swiped.ok, "{}", swiped.message);

        let agenda = entry_agenda("2190-03-16".to_string());
        assert!(agenda.ok, "{}", agenda.message);
        let item = agenda
            .items
            .iter()
            .find(|item| item.task_id == task_id)
            .expect("task should be on the agenda");
        assert_eq!(item.status, "completed");
        assert_eq!(item.goal_title, "FFI flow");

        let pending = entry_change_goal_dates(
            goal_id.clone(),
            "2190-04-01".to_string(),
            "2190-04-30".to_string(),
            false,
        );
        assert!(pending.ok, "{}", pending.message);
        assert!(pending.needs_confirmation);
        assert_eq!(pending.task_count, 1);

        let applied = entry_change_goal_dates(
            goal_id,
            "2190-04-01".to_string(),
            "2190-04-30".to_string(),
            true,
        );
        assert!(applied.ok, "{}", applied.message);
        assert!(!applied.needs_confirmation);
        assert_eq!(applied.cleared_tasks, 1);

        let agenda = entry_agenda("2190-03-16".to_string());
        assert!(agenda.items.iter().all(|item| item.task_id != task_id));
    }

    #[test]
    fn entry_add_task_rejects_unknown_goal() {
        let response = entry_add_task(
            "11111111-2222-4333-8444-555555555555".to_string(),
            "orphan".to_string(),
            None,
            repeat("daily"),
        );
        assert!(!response.ok);
        assert!(response.message.contains("goal not found"));
    }

    #[test]
    fn entry_swipe_task_rejects_unknown_outcome() {
        let response = entry_swipe_task(
            "11111111-2222-4333-8444-555555555555".to_string(),
            "sideways".to_string(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("complete|fail"));
    }

    #[test]
    fn task_edit_list_and_delete_round_trip() {
        let goal = entry_create_goal(
            "FFI edits".to_string(),
            "2191-05-01".to_string(),
            "2191-05-31".to_string(),
        );
        assert!(goal.ok, "{}", goal.message);
        let goal_id = goal.id.expect("goal id");

        let listed = entry_list_goals();
        assert!(listed.ok, "{}", listed.message);
        let item = listed
            .items
            .iter()
            .find(|item| item.id == goal_id)
            .expect("goal should be listed");
        assert_eq!(item.start_date, "2191-05-01");

        let task = entry_add_task(goal_id.clone(), "Swim".to_string(), None, repeat("daily"));
        assert!(task.ok, "{}", task.message);
        assert_eq!(task.dates.len(), 31);
        let task_id = task.id.expect("task id");

        let mut weekly = repeat("weekly");
        weekly.days_of_week = vec![0];
        let updated = entry_update_task(
            task_id.clone(),
            "Long swim".to_string(),
            Some("open water".to_string()),
            weekly,
        );
        assert!(updated.ok, "{}", updated.message);
        // Sundays of May 2191: 1, 8, 15, 22, 29.
        assert_eq!(updated.dates.len(), 5);
        assert_eq!(updated.dates[0], "2191-05-01");

        let tasks = entry_list_tasks(goal_id.clone());
        assert!(tasks.ok, "{}", tasks.message);
        assert_eq!(tasks.items.len(), 1);
        assert_eq!(tasks.items[0].title, "Long swim");
        assert_eq!(tasks.items[0].description.as_deref(), Some("open water"));
        assert_eq!(tasks.items[0].task_type, "weekly");
        assert_eq!(tasks.items[0].days_of_week, vec![0]);
        assert_eq!(tasks.items[0].dates, updated.dates);

        let blank = entry_update_task(task_id.clone(), "  ".to_string(), None, repeat("daily"));
        assert!(!blank.ok);
        assert!(blank.message.contains("title must not be blank"));

        let deleted = entry_delete_task(task_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(entry_list_tasks(goal_id).items.is_empty());

        let again = entry_delete_task(task_id);
        assert!(!again.ok);
        assert!(again.message.contains("task not found"));
    }

    #[test]
    fn goal_swipe_and_week_agenda() {
        let goal = entry_create_goal(
            "FFI week".to_string(),
            "2192-06-01".to_string(),
            "2192-06-30".to_string(),
        );
        let goal_id = goal.id.expect("goal id");
        let mut tuesdays = repeat("weekly");
        tuesdays.days_of_week = vec![2];
        let first = entry_add_task(goal_id.clone(), "Plan".to_string(), None, tuesdays);
        let second = entry_add_task(goal_id.clone(), "Review".to_string(), None, repeat("daily"));
        assert!(first.ok && second.ok);

        let swiped = entry_swipe_goal(goal_id.clone(), "fail".to_string());
        assert!(swiped.ok, "{}", swiped.message);
        assert_eq!(swiped.message, "2 task(s) failed.");
        let tasks = entry_list_tasks(goal_id.clone());
        assert!(tasks.items.iter().all(|task| task.status == "failed"));

        let bad = entry_swipe_goal(goal_id, "sideways".to_string());
        assert!(!bad.ok);

        let week = entry_week_agenda("2192-06-10".to_string());
        assert!(week.ok, "{}", week.message);
        assert_eq!(week.days.len(), 7);
        let first_task = first.id.expect("task id");
        let with_plan = week
            .days
            .iter()
            .filter(|day| day.items.iter().any(|item| item.task_id == first_task))
            .map(|day| day.date.as_str())
            .collect::<Vec<_>>();
        // 2192-06-10 is a Sunday, so the week runs 06-10 .. 06-16.
        assert_eq!(week.days[0].date, "2192-06-10");
        assert_eq!(with_plan, vec!["2192-06-12"]);

        let invalid = entry_week_agenda("2192-6-10".to_string());
        assert!(!invalid.ok);
    }

    #[test]
    fn list_goals_and_tasks_report_bad_ids() {
        let tasks = entry_list_tasks("not-a-uuid".to_string());
        assert!(!tasks.ok);
        assert!(tasks.message.contains("invalid id"));

        let missing = entry_list_tasks("11111111-2222-4333-8444-555555555555".to_string());
        assert!(!missing.ok);
        assert!(missing.message.contains("goal not found"));
    }

    #[test]
    fn templates_filter_favorite_and_instantiate() {
        let finance = entry_list_templates("finance".to_string(), String::new());
        assert!(finance.ok, "{}", finance.message);
        assert!(finance.items.iter().all(|item| item.category == "finance"));

        let searched = entry_list_templates("all".to_string(), "SCHWARZENEGGER".to_string());
        assert_eq!(searched.items.len(), 1);
        let arnold = searched.items[0].clone();
        assert_eq!(arnold.tasks.len(), 4);

        // The file database outlives a test run, so compare against the
        // state found rather than a fixed flag.
        let toggled = entry_toggle_template_favorite(arnold.id.clone());
        assert!(toggled.ok, "{}", toggled.message);
        assert_eq!(toggled.items[0].is_favorite, !arnold.is_favorite);
        let restored = entry_toggle_template_favorite(arnold.id.clone());
        assert_eq!(restored.items[0].is_favorite, arnold.is_favorite);

        let used = entry_use_template(
            arnold.id.clone(),
            "FFI Arnold".to_string(),
            "2193-02-01".to_string(),
            "2193-02-28".to_string(),
            vec![3],
            vec![0, 2],
        );
        assert!(used.ok, "{}", used.message);
        assert_eq!(used.message, "Goal created with 2 task(s).");
        let tasks = entry_list_tasks(used.id.expect("goal id"));
        let kinds = tasks
            .items
            .iter()
            .map(|task| (task.title.as_str(), task.task_type.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![("Strength training", "weekly"), ("Track progress", "daily")]
        );

        let out_of_range = entry_use_template(
            arnold.id,
            String::new(),
            "2193-02-01".to_string(),
            "2193-02-28".to_string(),
            Vec::new(),
            vec![9],
        );
        assert!(!out_of_range.ok);
        assert!(out_of_range.message.contains("index 9"));

        let unknown = entry_list_templates("recent".to_string(), String::new());
        assert!(!unknown.ok);
    }
}
