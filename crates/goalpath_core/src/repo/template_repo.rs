//! Template catalog repository.
//!
//! # Responsibility
//! - Read the community template catalog seeded by migration.
//! - Persist the per-device favorite flag.
//!
//! # Invariants
//! - Catalog order is `sort_order` and task order is `position`.
//! - Only `is_favorite` is writable.

use super::columns::{parse_days_of_week, parse_uuid};
use super::error::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::template::{Template, TemplateCategory, TemplateId, TemplateTask};
use crate::recurrence::{MonthlyMode, TaskType};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TEMPLATE_SELECT_SQL: &str =
    "SELECT uuid, title, description, category, is_favorite FROM templates";

pub trait TemplateRepository {
    fn list_templates(&self) -> RepoResult<Vec<Template>>;
    fn get_template(&self, id: TemplateId) -> RepoResult<Option<Template>>;
    fn set_favorite(&self, id: TemplateId, is_favorite: bool) -> RepoResult<()>;
}

/// SQLite-backed template catalog.
pub struct SqliteTemplateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTemplateRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn load_tasks(&self, template_uuid: &str) -> RepoResult<Vec<TemplateTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT title, type, days_of_week, monthly_mode
             FROM template_tasks
             WHERE template_uuid = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([template_uuid])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_template_task_row(row)?);
        }

        Ok(tasks)
    }

    fn parse_template_row(&self, row: &Row<'_>) -> RepoResult<Template> {
        let uuid_text: String = row.get("uuid")?;
        let category_text: String = row.get("category")?;
        let category = TemplateCategory::parse(&category_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid template category `{category_text}` in templates.category"
            ))
        })?;

        Ok(Template {
            id: parse_uuid(&uuid_text, "templates.uuid")?,
            title: row.get("title")?,
            description: row.get("description")?,
            category,
            is_favorite: row.get("is_favorite")?,
            tasks: self.load_tasks(&uuid_text)?,
        })
    }
}

impl TemplateRepository for SqliteTemplateRepository<'_> {
    fn list_templates(&self) -> RepoResult<Vec<Template>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEMPLATE_SELECT_SQL} ORDER BY sort_order ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut templates = Vec::new();

        while let Some(row) = rows.next()? {
            templates.push(self.parse_template_row(row)?);
        }

        Ok(templates)
    }

    fn get_template(&self, id: TemplateId) -> RepoResult<Option<Template>> {
        self.conn
            .query_row(
                &format!("{TEMPLATE_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(self.parse_template_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn set_favorite(&self, id: TemplateId, is_favorite: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE templates SET is_favorite = ?2 WHERE uuid = ?1;",
            params![id.to_string(), is_favorite],
        )?;

        if changed == 0 {
            return Err(RepoError::TemplateNotFound(id));
        }

        Ok(())
    }
}

fn parse_template_task_row(row: &Row<'_>) -> RepoResult<TemplateTask> {
    let type_text: String = row.get("type")?;
    let kind = type_text.parse::<TaskType>().map_err(|_| {
        RepoError::InvalidData(format!("invalid task type `{type_text}` in template_tasks.type"))
    })?;

    let selected_days_of_week = match row.get::<_, Option<String>>("days_of_week")? {
        Some(value) => Some(parse_days_of_week(&value, "template_tasks.days_of_week")?),
        None => None,
    };

    let monthly_mode = match row.get::<_, Option<String>>("monthly_mode")? {
        Some(value) => Some(value.parse::<MonthlyMode>().map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid monthly mode `{value}` in template_tasks.monthly_mode"
            ))
        })?),
        None => None,
    };

    let task = TemplateTask {
        title: row.get("title")?,
        kind,
        selected_days_of_week,
        monthly_mode,
    };
    task.validate()?;
    Ok(task)
}
