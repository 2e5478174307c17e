use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::message::{Message, MessageService, MessageState};
use crate::web::WebError;

#[derive(Debug, Deserialize)]
pub struct CreateMessageForm {
    #[serde(default)]
    text: String,
}

#[derive(Template)]
#[template(path = "messages/message_list.html")]
struct MessageListTemplate {
    messages: Vec<Message>,
}

impl MessageListTemplate {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

/// Renders every message as the `#message-list` fragment.
pub fn render_message_list(messages: Vec<Message>) -> Result<String, WebError> {
    MessageListTemplate::new(messages)
        .render()
        .map_err(WebError::from)
}

/// Handler for GET /messages and GET /htmx/messages.
#[tracing::instrument(skip(state))]
async fn messages_handler(
    State(state): State<Arc<MessageState>>,
) -> Result<Html<String>, WebError> {
    let message_service = MessageService::new(&state.repository);
    render_message_list(message_service.list()).map(Html)
}

/// Handler for POST /add-message and POST /htmx/messages.
/// Responds with the whole list so the new message shows up in order.
#[tracing::instrument(skip(state))]
async fn add_message_handler(
    State(state): State<Arc<MessageState>>,
    Form(form): Form<CreateMessageForm>,
) -> Result<Html<String>, WebError> {
    let message_service = MessageService::new(&state.repository);
    message_service.create(&form.text)?;
    render_message_list(message_service.list()).map(Html)
}

/// Creates and returns the router for the message fragments.
pub fn create_message_router(state: Arc<MessageState>) -> Router {
    Router::new()
        .route("/messages", get(messages_handler))
        .route("/add-message", post(add_message_handler))
        .route(
            "/htmx/messages",
            get(messages_handler).post(add_message_handler),
        )
        .with_state(state)
}
