use crate::user::{Gender, User, UserInput, UserService, UserState, parse_gender};
use crate::web::api::{ApiError, ApiJson, ErrorResponse};
use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON representation of a User for API responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserJson {
    /// Unique identifier for the user
    id: u64,
    first_name: String,
    last_name: String,
    /// Age in years, if known
    age: Option<u8>,
    gender: Gender,
}

impl From<User> for UserJson {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            age: user.age(),
            gender: user.gender(),
        }
    }
}

/// Request body for creating or replacing a user.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    /// Must be between 0 and 130 when given
    #[serde(default)]
    age: Option<i32>,
    /// Case-insensitive, defaults to UNKNOWN
    #[serde(default, deserialize_with = "deserialize_gender")]
    gender: Gender,
}

/// Reads a gender the same way the form and query parameters do.
fn deserialize_gender<'de, D>(deserializer: D) -> Result<Gender, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    parse_gender(value.as_deref())
        .map(Option::unwrap_or_default)
        .map_err(serde::de::Error::custom)
}

impl From<UserRequest> for UserInput {
    fn from(request: UserRequest) -> Self {
        UserInput {
            first_name: request.first_name,
            last_name: request.last_name,
            age: request.age,
            gender: request.gender,
        }
    }
}

/// Query parameters for filtering users.
#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    q: Option<String>,
    gender: Option<String>,
}

/// Handler for GET /api/users - Returns users in JSON format, optionally filtered.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("q" = Option<String>, Query,
            description = "Case-insensitive substring of the first or last name"),
        ("gender" = Option<Gender>, Query, description = "Only users with this gender")
    ),
    responses(
        (status = 200, description = "Successfully retrieved users", body = [UserJson]),
        (status = 400, description = "Unknown gender filter", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn list_users_handler(
    State(state): State<Arc<UserState>>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<Vec<UserJson>>, ApiError> {
    let service = UserService::new(&state.repository);
    let gender = parse_gender(query.gender.as_deref())?;
    let users = service.search(query.q.as_deref(), gender);
    Ok(Json(users.into_iter().map(UserJson::from).collect()))
}

/// Handler for POST /api/users - Creates a new user.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserJson),
        (status = 400, description = "Invalid user fields or malformed body", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn create_user_handler(
    State(state): State<Arc<UserState>>,
    ApiJson(request): ApiJson<UserRequest>,
) -> Result<(StatusCode, Json<UserJson>), ApiError> {
    let service = UserService::new(&state.repository);
    let user = service.create(request.into())?;
    Ok((StatusCode::CREATED, Json(UserJson::from(user))))
}

/// Handler for GET /api/users/{id} - Returns a single user.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserJson),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn get_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<u64>,
) -> Result<Json<UserJson>, ApiError> {
    let service = UserService::new(&state.repository);
    Ok(Json(UserJson::from(service.get(id)?)))
}

/// Handler for PUT /api/users/{id} - Replaces all fields of a user.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserJson),
        (status = 400, description = "Invalid user fields or malformed body", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn update_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<u64>,
    ApiJson(request): ApiJson<UserRequest>,
) -> Result<Json<UserJson>, ApiError> {
    let service = UserService::new(&state.repository);
    let user = service.update(id, request.into())?;
    Ok(Json(UserJson::from(user)))
}

/// Handler for DELETE /api/users/{id} - Deletes a user.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn delete_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let service = UserService::new(&state.repository);
    service.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the users API router.
pub fn create_api_router(state: Arc<UserState>) -> Router {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .with_state(state)
}
