//! Proxy handlers.
//!
//! Each handler forwards the inbound request to the configured upstream and
//! relays the upstream's status code and JSON body verbatim. Transport-level
//! failures never reach the browser raw; they become a uniform 500 JSON
//! envelope. Upstream non-2xx responses are not failures here and relay
//! unchanged.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use taskdeck_api::envelope::{ErrorEnvelope, FailureMessage};

use crate::app::AppState;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// `POST /api/auth/login`. Credentials pass through untouched; the gateway
/// never attaches an `Authorization` header here.
pub async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    relay_plain(forward(&state, Method::POST, "/api/auth/login", None, Some(&body)).await)
}

/// `POST /api/task`.
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let auth = bearer(&headers);
    relay_plain(forward(&state, Method::POST, "/api/task", auth, Some(&body)).await)
}

/// `POST /api/task/byfilter`.
pub async fn filter_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let auth = bearer(&headers);
    relay_plain(forward(&state, Method::POST, "/api/task/byfilter", auth, Some(&body)).await)
}

/// `PUT /api/task/{id}`. Rejects bad identifiers before touching upstream.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(id) = parse_task_id(&id) else {
        return invalid_id();
    };
    let auth = bearer(&headers);
    relay_enveloped(forward(&state, Method::PUT, &format!("/api/task/{id}"), auth, Some(&body)).await)
}

/// `DELETE /api/task/{id}`. Same identifier validation as update; no body.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(id) = parse_task_id(&id) else {
        return invalid_id();
    };
    let auth = bearer(&headers);
    relay_enveloped(forward(&state, Method::DELETE, &format!("/api/task/{id}"), auth, None).await)
}

/// Accepts only a plain decimal identifier. The browser client can end up
/// interpolating the literal string "undefined" into the path, so that and
/// anything non-numeric is rejected without an upstream round trip.
pub fn parse_task_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || raw == "undefined" {
        return None;
    }
    raw.parse::<u64>().ok()
}

fn bearer(headers: &HeaderMap) -> Option<&HeaderValue> {
    headers.get(header::AUTHORIZATION)
}

async fn forward(
    state: &AppState,
    method: Method,
    path: &str,
    auth: Option<&HeaderValue>,
    body: Option<&Value>,
) -> Result<(StatusCode, Value), ProxyError> {
    let url = state.config.upstream_url(path);
    debug!(%method, %url, "proxying request");

    let mut request = state.http.request(method, &url);
    if let Some(auth) = auth {
        request = request.header(header::AUTHORIZATION, auth.clone());
    }
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request.send().await?;
    let status = response.status();
    let body: Value = response.json().await?;
    debug!(status = status.as_u16(), %url, "upstream responded");

    Ok((status, body))
}

fn invalid_id() -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorEnvelope::invalid_id())).into_response()
}

fn relay_plain(result: Result<(StatusCode, Value), ProxyError>) -> Response {
    match result {
        Ok((status, body)) => (status, Json(body)).into_response(),
        Err(err) => {
            error!(error = %err, "proxy failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FailureMessage::internal()),
            )
                .into_response()
        }
    }
}

fn relay_enveloped(result: Result<(StatusCode, Value), ProxyError>) -> Response {
    match result {
        Ok((status, body)) => (status, Json(body)).into_response(),
        Err(err) => {
            error!(error = %err, "proxy failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorEnvelope::internal(err.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numeric_identifiers_are_accepted() {
        assert_eq!(parse_task_id("1"), Some(1));
        assert_eq!(parse_task_id("42"), Some(42));
    }

    #[test]
    fn placeholder_and_garbage_identifiers_are_rejected() {
        assert_eq!(parse_task_id(""), None);
        assert_eq!(parse_task_id("undefined"), None);
        assert_eq!(parse_task_id("abc"), None);
        assert_eq!(parse_task_id("12abc"), None);
        assert_eq!(parse_task_id("1.5"), None);
        assert_eq!(parse_task_id("-3"), None);
    }
}
