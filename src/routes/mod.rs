use axum::{
    extract::rejection::JsonRejection,
    http::HeaderMap,
    Json, Router,
};
use serde_json::Value;

use crate::error::{invalid, AppResult};

pub mod messages;
pub mod participants;
pub mod status;

/// Header carrying the caller's participant name.
pub const USER_HEADER: &str = "user";

pub fn router() -> Router {
    Router::new()
        .merge(participants::router())
        .merge(messages::router())
        .merge(status::router())
}

/* ── 小助手 ── */

/// The `user` header, if present and non-blank.
pub(crate) fn user_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_string())
        .filter(|u| !u.is_empty())
}

/// Body-level JSON failures become 422 like field failures do.
pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> AppResult<Value> {
    body.map(|Json(v)| v).map_err(|rej| invalid(rej.body_text()))
}
