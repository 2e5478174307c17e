use anyhow::Context;
use askama::Template;
use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{self, Config};
use crate::message::MessageState;
use crate::message::web::create_message_router;
use crate::service::ServiceError;
use crate::task::TaskState;
use crate::task::web::create_task_router;
use crate::user::UserState;
use crate::user::web::create_user_router;

pub mod api;

const HX_RETARGET: &str = "hx-retarget";
const HX_RESWAP: &str = "hx-reswap";

/// Shared state: the configuration plus one store per entity type.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub messages: Arc<MessageState>,
    pub tasks: Arc<TaskState>,
    pub users: Arc<UserState>,
}

impl AppState {
    /// Creates state with fresh, empty stores.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            messages: Arc::new(MessageState::default()),
            tasks: Arc::new(TaskState::default()),
            users: Arc::new(UserState::default()),
        }
    }
}

/// Custom error type for fragment handler operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Represents an error during template rendering.
    /// The specific `askama::Error` is captured as the source of this error.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents a validation or lookup failure reported by a service.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Template)]
#[template(path = "error_message.html")]
struct ErrorMessageTemplate {
    message: String,
}

impl ErrorMessageTemplate {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

/// Builds the 400 response for rejected input from the rendered error fragment.
fn invalid_input_response(rendered: askama::Result<String>) -> Response {
    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(err) => {
            tracing::error!("Error fragment rendering failed: {}", err);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    let mut response = (StatusCode::BAD_REQUEST, Html(rendered)).into_response();
    // Point HTMX at the error region instead of the request target
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static(HX_RETARGET),
        HeaderValue::from_static("#errors"),
    );
    headers.insert(
        HeaderName::from_static(HX_RESWAP),
        HeaderValue::from_static("innerHTML"),
    );
    response
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Service(err @ ServiceError::InvalidInput { .. }) => {
                tracing::warn!("Rejected input: {}", err);
                invalid_input_response(ErrorMessageTemplate::new(err.to_string()).render())
            }
            WebError::Service(err @ ServiceError::NotFound { .. }) => {
                tracing::warn!("{}", err);
                StatusCode::NOT_FOUND.into_response()
            }
            WebError::Template(err) => {
                tracing::error!("Template rendering failed: {}", err);
                let user_facing_error_message = "An unexpected error occurred while processing \
                    your request. Please try again later.";
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(format!(
                        "<h1>Internal Server Error</h1><p>{}</p>",
                        user_facing_error_message
                    )),
                )
                    .into_response()
            }
        }
    }
}

/// Builds the CORS layer for the configured frontend origins.
fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let allow_origin = if config.allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid allowed origin '{}'", origin))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(HX_RETARGET),
            HeaderName::from_static(HX_RESWAP),
        ]))
}

/// Assembles every route of the application on top of the given state.
pub fn create_app(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config)?;

    let fragment_routes = Router::new()
        .merge(create_message_router(state.messages.clone()))
        .merge(create_task_router(state.tasks.clone()))
        .merge(create_user_router(state.users.clone()));

    let app = Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(fragment_routes)
        .merge(api::create_api_router(&state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );
    Ok(app)
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);
    tracing::info!(origins = ?config.allowed_origins, "Allowing cross-origin requests");

    let app = create_app(AppState::new(config))?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn can_handle_template_error_with_internal_server_error() {
        // Simulate a template rendering error using askama::Error::Custom
        let custom_error_message = "Simulated template rendering failure".to_string();
        let template_error = askama::Error::Custom(custom_error_message.into());

        let web_error = WebError::Template(template_error);
        let response = web_error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            "<h1>Internal Server Error</h1><p>An unexpected error occurred while processing your request. Please try again later.</p>"
        );
    }

    #[tokio::test]
    async fn invalid_input_renders_error_fragment_with_htmx_headers() {
        let web_error = WebError::from(ServiceError::invalid("title", "must not be blank"));
        let response = web_error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(HX_RETARGET),
            Some(&HeaderValue::from_static("#errors"))
        );
        assert_eq!(
            response.headers().get(HX_RESWAP),
            Some(&HeaderValue::from_static("innerHTML"))
        );
        assert!(body_text(response).await.contains("Invalid title: must not be blank"));
    }

    #[tokio::test]
    async fn unrenderable_error_fragment_still_answers_bad_request() {
        let render_error = askama::Error::Custom("Simulated fragment failure".into());

        let response = invalid_input_response(Err(render_error));

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(HX_RETARGET).is_none());
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn not_found_has_empty_body() {
        let response = WebError::from(ServiceError::not_found("User", 8)).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.is_empty());
    }

    #[test]
    fn rejects_origin_that_is_not_a_header_value() {
        let config = Config {
            allowed_origins: vec!["http://bad\norigin".to_string()],
            ..Config::default()
        };

        assert!(cors_layer(&config).is_err());
    }

    #[test]
    fn accepts_wildcard_origin() {
        let config = Config {
            allowed_origins: vec!["*".to_string()],
            ..Config::default()
        };

        assert!(cors_layer(&config).is_ok());
    }
}
