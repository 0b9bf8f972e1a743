//! HTTP request handlers

use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, HistoryResponse, LocationInfo, LocationsResponse,
    SessionResponse,
};
use super::AppState;
use crate::db::DbError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;

pub const SESSION_COOKIE: &str = "session_id";

const EMPTY_MESSAGE_REPLY: &str = "Please ask a question about waste management.";
const MAX_SESSION_ID_LEN: usize = 128;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/api/locations", get(list_locations))
        .route("/api/session", get(get_session))
        .route("/api/session/history", get(get_history))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<ChatRequest>,
) -> Result<(CookieJar, Json<ChatResponse>), AppError> {
    let (jar, session_id) = ensure_session(jar);

    let message = req.message.trim();
    if message.is_empty() {
        return Ok((
            jar,
            Json(ChatResponse {
                reply: EMPTY_MESSAGE_REPLY.to_string(),
                timestamp: Utc::now(),
            }),
        ));
    }

    let reply = state
        .runtime
        .handle_message(&session_id, message)
        .await
        .map_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Chat turn failed");
            AppError::Internal("Internal error while handling the message".to_string())
        })?;

    Ok((
        jar,
        Json(ChatResponse {
            reply: reply.text,
            timestamp: reply.timestamp,
        }),
    ))
}

/// The caller's session id, if the cookie carries a well-formed one
fn session_from_cookie(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(Cookie::value)
        .filter(|id| is_valid_session_id(id))
        .map(String::from)
}

/// Reuse the caller's session cookie or issue a new one
fn ensure_session(jar: CookieJar) -> (CookieJar, String) {
    if let Some(id) = session_from_cookie(&jar) {
        return (jar, id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(session_id = %id, "Issuing new session");
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ============================================================
// Facility
// ============================================================

async fn list_locations(State(state): State<AppState>) -> Json<LocationsResponse> {
    let facility = state.runtime.facility();
    let locations = facility
        .waypoints()
        .iter()
        .map(|w| LocationInfo {
            name: w.name().to_string(),
            row: w.coord().row,
            col: w.coord().col,
        })
        .collect();

    Json(LocationsResponse {
        locations,
        grid: facility.grid().to_matrix(),
    })
}

// ============================================================
// Sessions (the caller's own only)
// ============================================================

fn require_session(jar: &CookieJar) -> Result<String, AppError> {
    session_from_cookie(jar).ok_or_else(|| AppError::NotFound("No session".to_string()))
}

async fn get_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SessionResponse>, AppError> {
    let id = require_session(&jar)?;
    let session = state.db.get_session(&id).map_err(|e| match e {
        DbError::SessionNotFound(id) => AppError::NotFound(format!("Session not found: {id}")),
        other => AppError::Internal(other.to_string()),
    })?;
    Ok(Json(SessionResponse { session }))
}

async fn get_history(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<HistoryResponse>, AppError> {
    let id = require_session(&jar)?;
    let entries = state
        .db
        .get_chat_log(&id)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(HistoryResponse {
        session_id: id,
        entries,
    }))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("facility-assistant ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
