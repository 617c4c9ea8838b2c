//! Community template use-cases.
//!
//! # Responsibility
//! - Filter and search the template catalog.
//! - Toggle favorites.
//! - Turn a (customized) template into a goal with expanded tasks.
//!
//! # Invariants
//! - Instantiation validates the goal and expands every task before the
//!   first write; a failed task write removes the half-built goal.

use crate::model::goal::{Goal, GoalValidationError};
use crate::model::task::{Task, TaskValidationError};
use crate::model::template::{
    GoalDraft, Template, TemplateFilter, TemplateId, TemplateValidationError,
};
use crate::recurrence::{expand, RecurrenceError};
use crate::repo::goal_repo::GoalRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::template_repo::TemplateRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug)]
pub enum TemplateServiceError {
    TemplateNotFound(TemplateId),
    Template(TemplateValidationError),
    Goal(GoalValidationError),
    Task(TaskValidationError),
    Recurrence(RecurrenceError),
    Repo(RepoError),
}

impl Display for TemplateServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemplateNotFound(id) => write!(f, "template not found: {id}"),
            Self::Template(err) => write!(f, "{err}"),
            Self::Goal(err) => write!(f, "{err}"),
            Self::Task(err) => write!(f, "{err}"),
            Self::Recurrence(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TemplateServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Template(err) => Some(err),
            Self::Goal(err) => Some(err),
            Self::Task(err) => Some(err),
            Self::Recurrence(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TemplateNotFound(_) => None,
        }
    }
}

impl From<TemplateValidationError> for TemplateServiceError {
    fn from(value: TemplateValidationError) -> Self {
        Self::Template(value)
    }
}

impl From<GoalValidationError> for TemplateServiceError {
    fn from(value: GoalValidationError) -> Self {
        Self::Goal(value)
    }
}

impl From<TaskValidationError> for TemplateServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Task(value)
    }
}

impl From<RecurrenceError> for TemplateServiceError {
    fn from(value: RecurrenceError) -> Self {
        Self::Recurrence(value)
    }
}

impl From<RepoError> for TemplateServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TemplateNotFound(id) => Self::TemplateNotFound(id),
            RepoError::Template(err) => Self::Template(err),
            RepoError::Goal(err) => Self::Goal(err),
            RepoError::Task(err) => Self::Task(err),
            other => Self::Repo(other),
        }
    }
}

pub type TemplateServiceResult<T> = Result<T, TemplateServiceError>;

/// Goal and tasks created from a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantiatedGoal {
    pub goal: Goal,
    pub tasks: Vec<Task>,
}

pub struct TemplateService<C, G, T>
where
    C: TemplateRepository,
    G: GoalRepository,
    T: TaskRepository,
{
    templates: C,
    goals: G,
    tasks: T,
}

impl<C, G, T> TemplateService<C, G, T>
where
    C: TemplateRepository,
    G: GoalRepository,
    T: TaskRepository,
{
    pub fn new(templates: C, goals: G, tasks: T) -> Self {
        Self {
            templates,
            goals,
            tasks,
        }
    }

    /// Catalog entries passing `filter` whose title or description contains
    /// `query` (case-insensitive, blank matches all), in catalog order.
    pub fn filter_templates(
        &self,
        filter: TemplateFilter,
        query: &str,
    ) -> TemplateServiceResult<Vec<Template>> {
        Ok(self
            .templates
            .list_templates()?
            .into_iter()
            .filter(|template| filter.matches(template) && template.matches_query(query))
            .collect())
    }

    pub fn get_template(&self, id: TemplateId) -> TemplateServiceResult<Template> {
        self.templates
            .get_template(id)?
            .ok_or(TemplateServiceError::TemplateNotFound(id))
    }

    /// Flips the favorite flag and returns the updated template.
    pub fn toggle_favorite(&self, id: TemplateId) -> TemplateServiceResult<Template> {
        let mut template = self.get_template(id)?;
        template.is_favorite = !template.is_favorite;
        self.templates.set_favorite(id, template.is_favorite)?;
        info!(
            "event=template_favorite module=service status=ok template_id={id} favorite={}",
            template.is_favorite
        );
        Ok(template)
    }

    /// Starts customizing a catalog template.
    pub fn customize(&self, id: TemplateId) -> TemplateServiceResult<GoalDraft> {
        Ok(self.get_template(id)?.customize())
    }

    /// Creates a goal over `[start_date, due_date]` from a draft and expands
    /// every draft task over that window.
    pub fn instantiate_goal(
        &self,
        draft: &GoalDraft,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> TemplateServiceResult<InstantiatedGoal> {
        let goal = Goal::new(draft.title.trim(), start_date, due_date)?;
        let tasks = draft
            .tasks
            .iter()
            .map(|template_task| -> TemplateServiceResult<Task> {
                template_task.validate()?;
                let rule = template_task.rule();
                let dates = expand(start_date, due_date, &rule)?;
                Ok(Task::from_rule(
                    Uuid::new_v4(),
                    goal.uuid,
                    template_task.title.trim(),
                    None,
                    &rule,
                    dates,
                )?)
            })
            .collect::<TemplateServiceResult<Vec<_>>>()?;

        self.goals.create_goal(&goal)?;
        for task in &tasks {
            if let Err(err) = self.tasks.create_task(task) {
                warn!(
                    "event=template_instantiate module=service status=rollback template_id={} goal_id={}",
                    draft.template_id, goal.uuid
                );
                if let Err(cleanup) = self.goals.delete_goal(goal.uuid) {
                    warn!(
                        "event=template_instantiate module=service status=error goal_id={} error={cleanup}",
                        goal.uuid
                    );
                }
                return Err(err.into());
            }
        }

        info!(
            "event=template_instantiate module=service status=ok template_id={} goal_id={} tasks={}",
            draft.template_id,
            goal.uuid,
            tasks.len()
        );
        Ok(InstantiatedGoal { goal, tasks })
    }
}
