//! Task use-case service.
//!
//! # Responsibility
//! - Expand a task's repeat rule over its goal window on every save.
//! - Record swipe outcomes as task status, per task or per goal.
//! - Build per-day and per-week agendas for the schedule view.
//!
//! # Invariants
//! - Saving a task always recomputes `selected_dates` from scratch; earlier
//!   selections are never merged in.
//! - An empty expansion (e.g. weekly with no days) is a valid task.

use crate::gesture::SwipeOutcome;
use crate::model::goal::{Goal, GoalId};
use crate::model::task::{Task, TaskId, TaskStatus, TaskValidationError};
use crate::recurrence::{expand, week_containing, RecurrenceError, RecurrenceRule};
use crate::repo::goal_repo::GoalRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    Recurrence(RecurrenceError),
    Validation(TaskValidationError),
    GoalNotFound(GoalId),
    TaskNotFound(TaskId),
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recurrence(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::GoalNotFound(id) => write!(f, "goal not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Recurrence(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::GoalNotFound(_) | Self::TaskNotFound(_) => None,
        }
    }
}

impl From<RecurrenceError> for TaskServiceError {
    fn from(value: RecurrenceError) -> Self {
        Self::Recurrence(value)
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::GoalNotFound(id) => Self::GoalNotFound(id),
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::Task(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// User input for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub rule: RecurrenceRule,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, rule: RecurrenceRule) -> Self {
        Self {
            title: title.into(),
            description: None,
            rule,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One task occurrence on a schedule day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaEntry {
    pub goal_id: GoalId,
    pub goal_title: String,
    pub task: Task,
}

/// All occurrences on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaDay {
    pub date: NaiveDate,
    pub entries: Vec<AgendaEntry>,
}

/// Task service facade over goal and task repositories.
pub struct TaskService<G: GoalRepository, T: TaskRepository> {
    goals: G,
    tasks: T,
}

impl<G: GoalRepository, T: TaskRepository> TaskService<G, T> {
    pub fn new(goals: G, tasks: T) -> Self {
        Self { goals, tasks }
    }

    /// Dates a draft rule would produce under the goal, without saving.
    ///
    /// Drives the live date list of the task editor.
    pub fn preview_dates(
        &self,
        goal_id: GoalId,
        rule: &RecurrenceRule,
    ) -> TaskServiceResult<Vec<NaiveDate>> {
        let goal = self.require_goal(goal_id)?;
        Ok(expand(goal.start_date, goal.due_date, rule)?)
    }

    /// Expands the draft over the goal window and stores a new task.
    pub fn add_task(&self, goal_id: GoalId, draft: TaskDraft) -> TaskServiceResult<Task> {
        let goal = self.require_goal(goal_id)?;
        let task = build_task(Uuid::new_v4(), &goal, draft)?;
        self.tasks.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok goal_id={goal_id} task_id={} type={} dates={}",
            task.uuid,
            task.kind,
            task.selected_dates.len()
        );
        Ok(task)
    }

    /// Replaces a task's content and rule, re-expanding dates from scratch.
    ///
    /// Status is preserved.
    pub fn update_task(&self, task_id: TaskId, draft: TaskDraft) -> TaskServiceResult<Task> {
        let existing = self.require_task(task_id)?;
        let goal = self.require_goal(existing.goal_id)?;
        let mut task = build_task(task_id, &goal, draft)?;
        task.status = existing.status;
        self.tasks.update_task(&task)?;
        info!(
            "event=task_update module=service status=ok task_id={task_id} type={} dates={}",
            task.kind,
            task.selected_dates.len()
        );
        Ok(task)
    }

    pub fn get_task(&self, task_id: TaskId) -> TaskServiceResult<Option<Task>> {
        Ok(self.tasks.get_task(task_id)?)
    }

    /// Tasks of one goal in insertion order.
    pub fn list_tasks(&self, goal_id: GoalId) -> TaskServiceResult<Vec<Task>> {
        self.require_goal(goal_id)?;
        Ok(self.tasks.list_tasks(goal_id)?)
    }

    pub fn delete_task(&self, task_id: TaskId) -> TaskServiceResult<()> {
        self.tasks.delete_task(task_id)?;
        info!("event=task_delete module=service status=ok task_id={task_id}");
        Ok(())
    }

    pub fn set_task_status(&self, task_id: TaskId, status: TaskStatus) -> TaskServiceResult<Task> {
        self.tasks.set_task_status(task_id, status)?;
        info!(
            "event=task_status module=service status=ok task_id={task_id} task_status={}",
            status.as_str()
        );
        self.require_task(task_id)
    }

    /// Records a committed swipe (right = completed, left = failed).
    pub fn apply_swipe_outcome(
        &self,
        task_id: TaskId,
        outcome: SwipeOutcome,
    ) -> TaskServiceResult<Task> {
        self.set_task_status(task_id, outcome.task_status())
    }

    /// Records a swipe on a whole goal card: every task of the goal gets the
    /// outcome's status in one statement. Returns the goal's tasks afterwards.
    pub fn apply_goal_swipe_outcome(
        &self,
        goal_id: GoalId,
        outcome: SwipeOutcome,
    ) -> TaskServiceResult<Vec<Task>> {
        let status = outcome.task_status();
        let changed = self.tasks.set_goal_task_status(goal_id, status)?;
        info!(
            "event=goal_status module=service status=ok goal_id={goal_id} task_status={} tasks={changed}",
            status.as_str()
        );
        Ok(self.tasks.list_tasks(goal_id)?)
    }

    /// Occurrences on `date`, ordered by goal window then task insertion.
    pub fn agenda_for(&self, date: NaiveDate) -> TaskServiceResult<Vec<AgendaEntry>> {
        let mut goal_titles: HashMap<GoalId, String> = HashMap::new();
        self.agenda_with_cache(date, &mut goal_titles)
    }

    /// Sunday-started week around `date`, one `AgendaDay` per day.
    pub fn week_agenda(&self, date: NaiveDate) -> TaskServiceResult<Vec<AgendaDay>> {
        let mut goal_titles: HashMap<GoalId, String> = HashMap::new();
        week_containing(date)
            .into_iter()
            .map(|day| {
                Ok(AgendaDay {
                    date: day,
                    entries: self.agenda_with_cache(day, &mut goal_titles)?,
                })
            })
            .collect()
    }

    fn agenda_with_cache(
        &self,
        date: NaiveDate,
        goal_titles: &mut HashMap<GoalId, String>,
    ) -> TaskServiceResult<Vec<AgendaEntry>> {
        let tasks = self.tasks.list_tasks_on(date)?;
        let mut entries = Vec::with_capacity(tasks.len());

        for task in tasks {
            let goal_title = match goal_titles.get(&task.goal_id) {
                Some(title) => title.clone(),
                None => {
                    let title = self.require_goal(task.goal_id)?.title;
                    goal_titles.insert(task.goal_id, title.clone());
                    title
                }
            };
            entries.push(AgendaEntry {
                goal_id: task.goal_id,
                goal_title,
                task,
            });
        }

        Ok(entries)
    }

    fn require_goal(&self, goal_id: GoalId) -> TaskServiceResult<Goal> {
        self.goals
            .get_goal(goal_id)?
            .ok_or(TaskServiceError::GoalNotFound(goal_id))
    }

    fn require_task(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .get_task(task_id)?
            .ok_or(TaskServiceError::TaskNotFound(task_id))
    }
}

fn build_task(task_id: TaskId, goal: &Goal, draft: TaskDraft) -> TaskServiceResult<Task> {
    let dates = expand(goal.start_date, goal.due_date, &draft.rule)?;
    let description = draft
        .description
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    Ok(Task::from_rule(
        task_id,
        goal.uuid,
        draft.title.trim(),
        description,
        &draft.rule,
        dates,
    )?)
}
