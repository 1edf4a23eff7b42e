//! # ChatBuddy HTTP API
//!
//! File: cli/src/commands/srv/routes.rs
//!
//! JSON endpoints over a shared [`SessionHandle`]:
//!
//! | Method & path            | Result                                        |
//! |--------------------------|-----------------------------------------------|
//! | `GET /api/messages`      | 200, transcript as a JSON array               |
//! | `POST /api/messages`     | 202 with the user message, 204 if text blank  |
//! | `DELETE /api/messages`   | 204, transcript cleared                       |
//! | `GET /api/theme`         | 200, `{"theme":"light"}`                      |
//! | `POST /api/theme/toggle` | 200, the new theme                            |
//!
use crate::bot::{Message, Theme};
use crate::session::SessionHandle;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ThemeBody {
    pub theme: Theme,
}

/// Failure talking to the session task.
pub struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("API request failed: {:#}", self.0);
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Builds the `/api` routes around `session`.
pub fn api_router(session: SessionHandle) -> Router {
    Router::new()
        .route(
            "/api/messages",
            get(list_messages).post(post_message).delete(clear_messages),
        )
        .route("/api/theme", get(get_theme))
        .route("/api/theme/toggle", post(toggle_theme))
        .with_state(session)
}

async fn list_messages(State(session): State<SessionHandle>) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(session.messages().await?))
}

async fn post_message(
    State(session): State<SessionHandle>,
    Json(body): Json<NewMessage>,
) -> Result<Response, ApiError> {
    Ok(match session.submit(body.text).await? {
        Some(message) => (StatusCode::ACCEPTED, Json(message)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

async fn clear_messages(State(session): State<SessionHandle>) -> Result<StatusCode, ApiError> {
    session.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_theme(State(session): State<SessionHandle>) -> Result<Json<ThemeBody>, ApiError> {
    Ok(Json(ThemeBody {
        theme: session.theme().await?,
    }))
}

async fn toggle_theme(State(session): State<SessionHandle>) -> Result<Json<ThemeBody>, ApiError> {
    Ok(Json(ThemeBody {
        theme: session.toggle_theme().await?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::{Responder, Sender};
    use crate::session::{spawn_session, Session};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(delay_ms: u64) -> Router {
        api_router(spawn_session(Session::new(
            Responder::default(),
            Duration::from_millis(delay_ms),
            Theme::Light,
        )))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test(start_paused = true)]
    async fn post_then_list_after_delay() {
        let app = app(500);

        let (status, body) = send(&app, "POST", "/api/messages", Some(r#"{"text":"hello"}"#)).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let user: Message = serde_json::from_slice(&body).unwrap();
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text, "hello");

        tokio::time::sleep(Duration::from_millis(600)).await;

        let (status, body) = send(&app, "GET", "/api/messages", None).await;
        assert_eq!(status, StatusCode::OK);
        let messages: Vec<Message> = serde_json::from_slice(&body).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "Hello! How are you today?");
    }

    #[tokio::test(start_paused = true)]
    async fn blank_post_is_no_content() {
        let app = app(500);
        let (status, body) = send(&app, "POST", "/api/messages", Some(r#"{"text":"   "}"#)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let (_, body) = send(&app, "GET", "/api/messages", None).await;
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn delete_clears_transcript() {
        let app = app(60_000);
        send(&app, "POST", "/api/messages", Some(r#"{"text":"hi"}"#)).await;
        let (status, _) = send(&app, "DELETE", "/api/messages", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", "/api/messages", None).await;
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn theme_toggles() {
        let app = app(0);
        let (_, body) = send(&app, "GET", "/api/theme", None).await;
        assert_eq!(body, br#"{"theme":"light"}"#);

        let (status, body) = send(&app, "POST", "/api/theme/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        let theme: ThemeBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(theme.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let app = app(0);
        let (status, _) = send(&app, "POST", "/api/messages", Some(r#"{"txt":"hi"}"#)).await;
        assert!(status.is_client_error());
    }
}
