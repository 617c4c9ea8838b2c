//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist tasks together with their materialized occurrence dates.
//! - Serve date-indexed lookups for the schedule view.
//!
//! # Invariants
//! - `task_dates` always mirrors `Task::selected_dates` exactly; updates
//!   replace the whole set inside one transaction.
//! - A task never moves to another goal through `update_task`.
//! - Per-goal listing follows insertion order.

use super::columns::{date_to_db, days_of_week_to_db, parse_date, parse_days_of_week, parse_uuid};
use super::error::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::goal::GoalId;
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::recurrence::{MonthlyMode, TaskType};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    tasks.uuid,
    tasks.goal_uuid,
    tasks.title,
    tasks.description,
    tasks.type,
    tasks.days_of_week,
    tasks.monthly_mode,
    tasks.status
FROM tasks";

/// Repository interface for tasks.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Replaces every stored field and the full date set of a task.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, goal_id: GoalId) -> RepoResult<Vec<Task>>;
    /// Tasks with an occurrence on `date`, grouped by goal window order.
    fn list_tasks_on(&self, date: NaiveDate) -> RepoResult<Vec<Task>>;
    fn set_task_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<()>;
    /// Sets `status` on every task of a goal at once; returns the task count.
    fn set_goal_task_status(&self, goal_id: GoalId, status: TaskStatus) -> RepoResult<usize>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_tasks(&self, sql: &str, bind: &str) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([bind])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(self.conn, row)?);
        }

        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let goal_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM goals WHERE uuid = ?1);",
            [task.goal_id.to_string()],
            |row| row.get(0),
        )?;
        if !goal_exists {
            return Err(RepoError::GoalNotFound(task.goal_id));
        }

        tx.execute(
            "INSERT INTO tasks (
                uuid,
                goal_uuid,
                title,
                description,
                type,
                days_of_week,
                monthly_mode,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.uuid.to_string(),
                task.goal_id.to_string(),
                task.title.as_str(),
                task.description.as_deref(),
                task.kind.as_str(),
                task.selected_days_of_week.map(days_of_week_to_db),
                task.monthly_mode.map(MonthlyMode::as_str),
                task.status.as_str(),
            ],
        )?;
        insert_dates(&tx, task.uuid, &task.selected_dates)?;
        tx.commit()?;

        Ok(task.uuid)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let id_text = task.uuid.to_string();
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE tasks
             SET
                title = ?3,
                description = ?4,
                type = ?5,
                days_of_week = ?6,
                monthly_mode = ?7,
                status = ?8,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND goal_uuid = ?2;",
            params![
                id_text.as_str(),
                task.goal_id.to_string(),
                task.title.as_str(),
                task.description.as_deref(),
                task.kind.as_str(),
                task.selected_days_of_week.map(days_of_week_to_db),
                task.monthly_mode.map(MonthlyMode::as_str),
                task.status.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(task.uuid));
        }

        tx.execute(
            "DELETE FROM task_dates WHERE task_uuid = ?1;",
            [id_text.as_str()],
        )?;
        insert_dates(&tx, task.uuid, &task.selected_dates)?;
        tx.commit()?;

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut tasks =
            self.query_tasks(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"), &id.to_string())?;
        Ok(tasks.pop())
    }

    fn list_tasks(&self, goal_id: GoalId) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} WHERE goal_uuid = ?1 ORDER BY tasks.rowid ASC;"),
            &goal_id.to_string(),
        )
    }

    fn list_tasks_on(&self, date: NaiveDate) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!(
                "{TASK_SELECT_SQL}
                 JOIN task_dates ON task_dates.task_uuid = tasks.uuid
                 JOIN goals ON goals.uuid = tasks.goal_uuid
                 WHERE task_dates.occurs_on = ?1
                 ORDER BY goals.start_date ASC, goals.uuid ASC, tasks.rowid ASC;"
            ),
            &date_to_db(date),
        )
    }

    fn set_task_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET status = ?2, updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), status.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }

    fn set_goal_task_status(&self, goal_id: GoalId, status: TaskStatus) -> RepoResult<usize> {
        let goal_text = goal_id.to_string();
        let tx = self.conn.unchecked_transaction()?;
        let goal_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM goals WHERE uuid = ?1);",
            [goal_text.as_str()],
            |row| row.get(0),
        )?;
        if !goal_exists {
            return Err(RepoError::GoalNotFound(goal_id));
        }

        let changed = tx.execute(
            "UPDATE tasks
             SET status = ?2, updated_at = (strftime('%s', 'now') * 1000)
             WHERE goal_uuid = ?1;",
            params![goal_text.as_str(), status.as_str()],
        )?;
        tx.commit()?;

        Ok(changed)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }
}

fn insert_dates(conn: &Connection, task_id: TaskId, dates: &[NaiveDate]) -> RepoResult<()> {
    let mut stmt = conn.prepare("INSERT INTO task_dates (task_uuid, occurs_on) VALUES (?1, ?2);")?;
    let id_text = task_id.to_string();
    for date in dates {
        stmt.execute(params![id_text.as_str(), date_to_db(*date)])?;
    }
    Ok(())
}

fn load_dates(conn: &Connection, task_uuid: &str) -> RepoResult<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(
        "SELECT occurs_on
         FROM task_dates
         WHERE task_uuid = ?1
         ORDER BY occurs_on ASC;",
    )?;
    let mut rows = stmt.query([task_uuid])?;
    let mut dates = Vec::new();

    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        dates.push(parse_date(&value, "task_dates.occurs_on")?);
    }

    Ok(dates)
}

fn parse_task_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let goal_text: String = row.get("goal_uuid")?;

    let type_text: String = row.get("type")?;
    let kind = type_text
        .parse::<TaskType>()
        .map_err(|_| RepoError::InvalidData(format!("invalid task type `{type_text}` in tasks.type")))?;

    let selected_days_of_week = match row.get::<_, Option<String>>("days_of_week")? {
        Some(value) => Some(parse_days_of_week(&value, "tasks.days_of_week")?),
        None => None,
    };

    let monthly_mode = match row.get::<_, Option<String>>("monthly_mode")? {
        Some(value) => Some(value.parse::<MonthlyMode>().map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid monthly mode `{value}` in tasks.monthly_mode"
            ))
        })?),
        None => None,
    };

    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let task = Task {
        uuid: parse_uuid(&uuid_text, "tasks.uuid")?,
        goal_id: parse_uuid(&goal_text, "tasks.goal_uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        kind,
        selected_dates: load_dates(conn, &uuid_text)?,
        selected_days_of_week,
        monthly_mode,
        status,
    };
    task.validate()?;
    Ok(task)
}
