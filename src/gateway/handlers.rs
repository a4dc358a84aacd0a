use super::cookie::{SessionCookie, read_cookie};
use super::{AppState, ChatBody, INTERNAL_ERROR_MESSAGE, RATE_LIMITED_MESSAGE};
use crate::config::AdmissionKeySource;
use crate::error::RelayError;
use crate::session::SessionToken;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
};
use chrono::Utc;
use std::net::SocketAddr;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET / - embedded chat page
pub(super) async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health - liveness plus engine slot usage
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.orchestrator.engine();
    Json(serde_json::json!({
        "status": "ok",
        "engine": {
            "capacity": engine.capacity(),
            "available": engine.available(),
        },
    }))
}

/// POST /chat and POST /api/chat - one conversational turn
pub(super) async fn handle_chat(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let Ok(bytes) = axum::body::to_bytes(body, usize::MAX).await else {
        return error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
    };
    let message = parse_message(&bytes);

    let (session, fresh) = resolve_session(&state, &parts.headers);
    let admission_key = match (state.admission_key, peer) {
        (AdmissionKeySource::Peer, Some(addr)) => addr.ip().to_string(),
        _ => session.client_id.to_string(),
    };

    let mut response = match state
        .orchestrator
        .handle_turn(&session, &admission_key, &message)
        .await
    {
        Ok(reply) => (StatusCode::OK, Json(serde_json::json!({ "reply": reply }))).into_response(),
        Err(err) => relay_error_response(&err),
    };

    if fresh {
        attach_session_cookie(&state, &session, &mut response);
    }
    response
}

/// Lenient body read: anything that is not `{"message": "<string>"}`
/// yields an empty message, rejected downstream as empty.
fn parse_message(bytes: &Bytes) -> String {
    serde_json::from_slice::<ChatBody>(bytes)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_default()
}

/// Session from the cookie, or a freshly issued one when the cookie is
/// missing, forged, malformed or expired. The flag is true for new sessions.
fn resolve_session(state: &AppState, headers: &HeaderMap) -> (SessionToken, bool) {
    let now = Utc::now();
    let existing = read_cookie(headers, &state.cookie_name)
        .and_then(|raw| state.signer.decode(raw))
        .filter(|token| !token.is_expired(now, state.session_lifetime));

    match existing {
        Some(token) => (token, false),
        None => {
            let token = state.signer.issue(now);
            tracing::debug!(client = %token.client_id, "issued new session");
            (token, true)
        }
    }
}

fn attach_session_cookie(state: &AppState, session: &SessionToken, response: &mut Response) {
    let encoded = match state.signer.encode(session) {
        Ok(encoded) => encoded,
        Err(error) => {
            tracing::error!(%error, "failed to sign session token");
            return;
        }
    };
    let cookie = SessionCookie {
        name: &state.cookie_name,
        value: &encoded,
        max_age: session.remaining(Utc::now(), state.session_lifetime),
        secure: state.secure_cookies,
    };
    match cookie.header_value() {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(error) => tracing::error!(%error, "invalid session cookie header"),
    }
}

fn relay_error_response(err: &RelayError) -> Response {
    match err {
        RelayError::Validation(reason) => {
            error_response(StatusCode::BAD_REQUEST, &reason.to_string())
        }
        RelayError::Admission(crate::error::AdmissionError::RateLimited { window_secs, .. }) => {
            let mut response = error_response(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE);
            if let Ok(value) = HeaderValue::from_str(&window_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
        // Logged with the client id where the engine call failed.
        RelayError::Engine(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
        RelayError::Internal(error) => {
            tracing::error!(error = ?error, "chat turn failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
