use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, put},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::task::{Task, TaskService, TaskState};
use crate::web::WebError;

#[derive(Debug, Deserialize)]
pub struct CreateTaskForm {
    #[serde(default)]
    title: String,
}

#[derive(Template)]
#[template(path = "tasks/task_list.html")]
struct TaskListTemplate {
    tasks: Vec<Task>,
}

impl TaskListTemplate {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

#[derive(Template)]
#[template(path = "tasks/task_item.html")]
struct TaskItemTemplate {
    task: Task,
}

impl TaskItemTemplate {
    pub fn new(task: Task) -> Self {
        Self { task }
    }
}

/// Handler for GET /htmx/tasks that returns the task list fragment.
#[tracing::instrument(skip(state))]
async fn tasks_handler(State(state): State<Arc<TaskState>>) -> Result<Html<String>, WebError> {
    let task_service = TaskService::new(&state.repository);
    let template = TaskListTemplate::new(task_service.list());
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for creating a task via POST request.
#[tracing::instrument(skip(state))]
async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    Form(form): Form<CreateTaskForm>,
) -> Result<Html<String>, WebError> {
    let task_service = TaskService::new(&state.repository);
    task_service.create(&form.title)?;
    let template = TaskListTemplate::new(task_service.list());
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for PUT /htmx/tasks/{id} that toggles the task and renders only its item.
#[tracing::instrument(skip(state))]
async fn toggle_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u64>,
) -> Result<Html<String>, WebError> {
    let task_service = TaskService::new(&state.repository);
    let task = task_service.toggle(id)?;
    let template = TaskItemTemplate::new(task);
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for DELETE /htmx/tasks/{id}.
/// The empty 200 response tells HTMX to swap the item out.
#[tracing::instrument(skip(state))]
async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, WebError> {
    let task_service = TaskService::new(&state.repository);
    task_service.delete(id)?;
    Ok(StatusCode::OK)
}

/// Creates and returns the router for the task fragments.
pub fn create_task_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/htmx/tasks", get(tasks_handler).post(create_task_handler))
        .route(
            "/htmx/tasks/{id}",
            put(toggle_task_handler).delete(delete_task_handler),
        )
        .with_state(state)
}
