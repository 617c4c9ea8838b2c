//! Goal repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `goals` table.
//! - Own the destructive date change that clears a goal's tasks.
//!
//! # Invariants
//! - Rescheduling and task clearing commit together or not at all.
//! - Deleting a goal deletes its tasks and their dates (FK cascade).
//! - Listing order is deterministic: `start_date, due_date, uuid`.

use super::columns::{date_to_db, parse_date, parse_uuid};
use super::error::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::goal::{Goal, GoalId, GoalValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const GOAL_SELECT_SQL: &str = "SELECT uuid, title, start_date, due_date FROM goals";

/// Repository interface for goals.
pub trait GoalRepository {
    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId>;
    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>>;
    fn list_goals(&self) -> RepoResult<Vec<Goal>>;
    fn rename_goal(&self, id: GoalId, title: &str) -> RepoResult<()>;
    /// Number of tasks currently owned by the goal.
    fn count_tasks(&self, id: GoalId) -> RepoResult<u32>;
    /// Moves the goal window and deletes all its tasks in one transaction.
    ///
    /// Returns the number of deleted tasks.
    fn reschedule_goal(&self, id: GoalId, start: NaiveDate, due: NaiveDate) -> RepoResult<usize>;
    fn delete_goal(&self, id: GoalId) -> RepoResult<()>;
}

/// SQLite-backed goal repository.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId> {
        goal.validate()?;

        self.conn.execute(
            "INSERT INTO goals (uuid, title, start_date, due_date)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                goal.uuid.to_string(),
                goal.title.as_str(),
                date_to_db(goal.start_date),
                date_to_db(goal.due_date),
            ],
        )?;

        Ok(goal.uuid)
    }

    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GOAL_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_goal_row(row)?));
        }

        Ok(None)
    }

    fn list_goals(&self) -> RepoResult<Vec<Goal>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GOAL_SELECT_SQL} ORDER BY start_date ASC, due_date ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut goals = Vec::new();

        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }

        Ok(goals)
    }

    fn rename_goal(&self, id: GoalId, title: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE goals
             SET title = ?2, updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), title],
        )?;

        if changed == 0 {
            return Err(RepoError::GoalNotFound(id));
        }

        Ok(())
    }

    fn count_tasks(&self, id: GoalId) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE goal_uuid = ?1;",
            [id.to_string()],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn reschedule_goal(&self, id: GoalId, start: NaiveDate, due: NaiveDate) -> RepoResult<usize> {
        if due < start {
            return Err(GoalValidationError::InvalidDateRange { start, due }.into());
        }

        let id_text = id.to_string();
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE goals
             SET start_date = ?2, due_date = ?3, updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id_text.as_str(), date_to_db(start), date_to_db(due)],
        )?;
        if changed == 0 {
            return Err(RepoError::GoalNotFound(id));
        }

        let cleared = tx.execute("DELETE FROM tasks WHERE goal_uuid = ?1;", [id_text.as_str()])?;
        tx.commit()?;
        Ok(cleared)
    }

    fn delete_goal(&self, id: GoalId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM goals WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::GoalNotFound(id));
        }

        Ok(())
    }
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let uuid_text: String = row.get("uuid")?;
    let start_text: String = row.get("start_date")?;
    let due_text: String = row.get("due_date")?;

    let goal = Goal::with_id(
        parse_uuid(&uuid_text, "goals.uuid")?,
        row.get::<_, String>("title")?,
        parse_date(&start_text, "goals.start_date")?,
        parse_date(&due_text, "goals.due_date")?,
    )?;
    Ok(goal)
}
