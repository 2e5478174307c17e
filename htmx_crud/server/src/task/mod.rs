use std::sync::Arc;

use crate::repository::{Entity, InMemoryRepository};
use crate::service::{ServiceError, require_text};

pub mod api;
pub mod web;

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Task {
    id: u64,
    title: String,
    done: bool,
}

impl Task {
    pub fn new(id: u64, title: String, done: bool) -> Self {
        Self { id, title, done }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the title of the task.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns whether the task has been completed.
    pub fn done(&self) -> bool {
        self.done
    }
}

impl Entity for Task {
    fn id(&self) -> u64 {
        self.id
    }
}

pub type TaskRepository = InMemoryRepository<Task>;

#[derive(Clone, Default)]
pub struct TaskState {
    pub repository: Arc<TaskRepository>,
}

pub struct TaskService<'a> {
    repository: &'a TaskRepository,
}

impl TaskService<'_> {
    pub fn new(repository: &TaskRepository) -> TaskService<'_> {
        TaskService { repository }
    }

    /// Retrieves all tasks in creation order.
    #[tracing::instrument(skip(self))]
    pub fn list(&self) -> Vec<Task> {
        self.repository.find_all()
    }

    /// Creates a new, not yet done task.
    ///
    /// # Arguments
    ///
    /// * `title` - The title of the task. Surrounding whitespace is dropped.
    ///
    /// # Returns
    ///
    /// The created `Task`, or `InvalidInput` if the title is blank.
    #[tracing::instrument(skip(self))]
    pub fn create(&self, title: &str) -> Result<Task, ServiceError> {
        let title = require_text("title", title)?;
        let task = self.repository.add(|id| Task::new(id, title, false));
        tracing::info!(id = task.id(), "Task created");
        Ok(task)
    }

    #[tracing::instrument(skip(self))]
    pub fn get(&self, id: u64) -> Result<Task, ServiceError> {
        self.repository
            .find_by_id(id)
            .ok_or(ServiceError::not_found("Task", id))
    }

    /// Flips the `done` flag of a task.
    ///
    /// # Returns
    ///
    /// The task in its new state, or `NotFound` if no task has this ID.
    #[tracing::instrument(skip(self))]
    pub fn toggle(&self, id: u64) -> Result<Task, ServiceError> {
        self.repository
            .modify(id, |task| task.done = !task.done)
            .ok_or(ServiceError::not_found("Task", id))
    }

    /// Deletes a task by its ID.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: u64) -> Result<(), ServiceError> {
        if !self.repository.delete(id) {
            return Err(ServiceError::not_found("Task", id));
        }
        tracing::info!(id, "Task deleted");
        Ok(())
    }
}
