use crate::message::{Message, MessageService, MessageState};
use crate::web::api::{ApiError, ApiJson, ErrorResponse};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON representation of a Message for API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageJson {
    /// Unique identifier for the message
    id: u64,
    /// Message body
    text: String,
}

impl From<Message> for MessageJson {
    fn from(message: Message) -> Self {
        Self {
            id: message.id(),
            text: message.text().to_string(),
        }
    }
}

/// Request body for posting a message.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMessageRequest {
    #[serde(default)]
    text: String,
}

/// Handler for GET /api/messages - Returns all messages in JSON format.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "Successfully retrieved messages", body = [MessageJson])
    ),
    tag = "Messages"
)]
pub async fn list_messages_handler(
    State(state): State<Arc<MessageState>>,
) -> Json<Vec<MessageJson>> {
    let service = MessageService::new(&state.repository);
    Json(service.list().into_iter().map(MessageJson::from).collect())
}

/// Handler for POST /api/messages - Posts a new message.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message created", body = MessageJson),
        (status = 400, description = "Blank message text or malformed body", body = ErrorResponse)
    ),
    tag = "Messages"
)]
pub async fn create_message_handler(
    State(state): State<Arc<MessageState>>,
    ApiJson(request): ApiJson<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageJson>), ApiError> {
    let service = MessageService::new(&state.repository);
    let message = service.create(&request.text)?;
    Ok((StatusCode::CREATED, Json(MessageJson::from(message))))
}

/// Handler for GET /api/messages/{id} - Returns a single message.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/messages/{id}",
    params(
        ("id" = u64, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message found", body = MessageJson),
        (status = 404, description = "Message not found", body = ErrorResponse)
    ),
    tag = "Messages"
)]
pub async fn get_message_handler(
    State(state): State<Arc<MessageState>>,
    Path(id): Path<u64>,
) -> Result<Json<MessageJson>, ApiError> {
    let service = MessageService::new(&state.repository);
    Ok(Json(MessageJson::from(service.get(id)?)))
}

/// Creates and returns the messages API router.
pub fn create_api_router(state: Arc<MessageState>) -> Router {
    Router::new()
        .route(
            "/messages",
            get(list_messages_handler).post(create_message_handler),
        )
        .route("/messages/{id}", get(get_message_handler))
        .with_state(state)
}
