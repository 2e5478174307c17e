use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::service::ServiceError;
use crate::user::{Gender, User, UserInput, UserService, UserState, parse_age, parse_gender};
use crate::web::WebError;

/// Form fields for creating or editing a user. Everything arrives as text.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    age: Option<String>,
    #[serde(default)]
    gender: Option<String>,
}

impl TryFrom<UserForm> for UserInput {
    type Error = ServiceError;

    fn try_from(form: UserForm) -> Result<Self, Self::Error> {
        Ok(UserInput {
            age: parse_age(form.age.as_deref())?,
            gender: parse_gender(form.gender.as_deref())?.unwrap_or_default(),
            first_name: form.first_name,
            last_name: form.last_name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
    gender: Option<String>,
}

struct GenderOption {
    value: &'static str,
    selected: bool,
}

fn gender_options(current: Gender) -> Vec<GenderOption> {
    Gender::ALL
        .into_iter()
        .map(|gender| GenderOption {
            value: gender.as_str(),
            selected: gender == current,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "users/users_table.html")]
struct UsersTableTemplate {
    users: Vec<User>,
}

impl UsersTableTemplate {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[derive(Template)]
#[template(path = "users/user_rows.html")]
struct UserRowsTemplate {
    users: Vec<User>,
}

impl UserRowsTemplate {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[derive(Template)]
#[template(path = "users/user_row.html")]
struct UserRowTemplate {
    user: User,
}

impl UserRowTemplate {
    pub fn new(user: User) -> Self {
        Self { user }
    }
}

#[derive(Template)]
#[template(path = "users/edit_user_row.html")]
struct EditUserRowTemplate {
    user: User,
    gender_options: Vec<GenderOption>,
}

impl EditUserRowTemplate {
    pub fn new(user: User) -> Self {
        let gender_options = gender_options(user.gender());
        Self {
            user,
            gender_options,
        }
    }
}

/// Handler for GET /htmx/users that returns the whole users table.
#[tracing::instrument(skip(state))]
async fn users_handler(State(state): State<Arc<UserState>>) -> Result<Html<String>, WebError> {
    let user_service = UserService::new(&state.repository);
    let template = UsersTableTemplate::new(user_service.list());
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for creating a user via POST request.
#[tracing::instrument(skip(state))]
async fn create_user_handler(
    State(state): State<Arc<UserState>>,
    Form(form): Form<UserForm>,
) -> Result<Html<String>, WebError> {
    let user_service = UserService::new(&state.repository);
    user_service.create(UserInput::try_from(form)?)?;
    let template = UsersTableTemplate::new(user_service.list());
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for GET /htmx/users/search that returns only the matching table rows.
#[tracing::instrument(skip(state))]
async fn search_users_handler(
    State(state): State<Arc<UserState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, WebError> {
    let user_service = UserService::new(&state.repository);
    let gender = parse_gender(query.gender.as_deref())?;
    let users = user_service.search(query.q.as_deref(), gender);
    let template = UserRowsTemplate::new(users);
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for GET /htmx/users/{id} and GET /htmx/users/{id}/row that return a single row.
#[tracing::instrument(skip(state))]
async fn user_row_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<u64>,
) -> Result<Html<String>, WebError> {
    let user_service = UserService::new(&state.repository);
    let template = UserRowTemplate::new(user_service.get(id)?);
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for serving the inline edit row.
#[tracing::instrument(skip(state))]
async fn edit_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<u64>,
) -> Result<Html<String>, WebError> {
    let user_service = UserService::new(&state.repository);
    let template = EditUserRowTemplate::new(user_service.get(id)?);
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for updating a user via PUT request.
#[tracing::instrument(skip(state))]
async fn update_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<u64>,
    Form(form): Form<UserForm>,
) -> Result<Html<String>, WebError> {
    let user_service = UserService::new(&state.repository);
    let updated_user = user_service.update(id, UserInput::try_from(form)?)?;

    // Render only the updated user row
    let template = UserRowTemplate::new(updated_user);
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for deleting a user via DELETE request.
#[tracing::instrument(skip(state))]
async fn delete_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, WebError> {
    let user_service = UserService::new(&state.repository);
    user_service.delete(id)?;
    Ok(StatusCode::OK)
}

/// Creates and returns the user router with all user fragment routes.
pub fn create_user_router(state: Arc<UserState>) -> Router {
    Router::new()
        .route("/htmx/users", get(users_handler).post(create_user_handler))
        .route("/htmx/users/search", get(search_users_handler))
        .route(
            "/htmx/users/{id}",
            get(user_row_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/htmx/users/{id}/edit", get(edit_user_handler))
        .route("/htmx/users/{id}/row", get(user_row_handler))
        .with_state(state)
}
