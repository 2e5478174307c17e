use axum::{
    Json, Router,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::service::ServiceError;
use crate::web::AppState;
use crate::{message, task, user};

/// JSON response for API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error code
    pub error: String,
    /// Human readable description
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: String) -> Self {
        Self {
            error: error.to_string(),
            message,
        }
    }
}

/// Error returned by the JSON handlers, rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let (status, code) = match &err {
            ServiceError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        };
        tracing::warn!("API request failed: {}", err);
        Self {
            status,
            body: ErrorResponse::new(code, err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        tracing::warn!("Rejected JSON body: {}", message);
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse::new("INVALID_INPUT", message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// JSON body extractor that reports unreadable bodies as `INVALID_INPUT`.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(OpenApi)]
#[openapi(
    paths(
        message::api::list_messages_handler,
        message::api::create_message_handler,
        message::api::get_message_handler,
        task::api::list_tasks_handler,
        task::api::create_task_handler,
        task::api::toggle_task_handler,
        task::api::delete_task_handler,
        user::api::list_users_handler,
        user::api::create_user_handler,
        user::api::get_user_handler,
        user::api::update_user_handler,
        user::api::delete_user_handler,
    ),
    components(schemas(ErrorResponse)),
    tags(
        (name = "Messages", description = "Append-only message board"),
        (name = "Tasks", description = "Task list with completion toggling"),
        (name = "Users", description = "User records with search")
    )
)]
pub struct ApiDoc;

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(state: &AppState) -> Router {
    let api_routes = message::api::create_api_router(state.messages.clone())
        .merge(task::api::create_api_router(state.tasks.clone()))
        .merge(user::api::create_api_router(state.users.clone()));
    Router::new().nest("/api", api_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn maps_invalid_input_to_bad_request_payload() {
        let api_error =
            ApiError::from(ServiceError::invalid("age", "200 is not between 0 and 130"));

        let response = api_error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            payload,
            serde_json::json!({
                "error": "INVALID_INPUT",
                "message": "Invalid age: 200 is not between 0 and 130"
            })
        );
    }

    #[test]
    fn maps_not_found_to_404() {
        let response = ApiError::from(ServiceError::not_found("Task", 1)).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn documents_every_json_route() {
        let doc = ApiDoc::openapi();
        let mut paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        paths.sort();

        assert_eq!(
            paths,
            vec![
                "/api/messages",
                "/api/messages/{id}",
                "/api/tasks",
                "/api/tasks/{id}",
                "/api/tasks/{id}/toggle",
                "/api/users",
                "/api/users/{id}",
            ]
        );
    }
}
