use axum::{http::StatusCode, response::IntoResponse, Json};

pub type AppResult<T> = Result<T, AppErr>;

pub const UNEXPECTED: &str = "Um erro inesperado aconteceu no servidor!";

#[derive(thiserror::Error, Debug)]
pub enum AppErr {
    /// Field-level validation failures, one message per problem.
    #[error("invalid payload: {0:?}")]
    Invalid(Vec<String>),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("DB: {0}")]
    Db(#[from] sqlx::Error),
}

impl IntoResponse for AppErr {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppErr::Invalid(list) => (StatusCode::UNPROCESSABLE_ENTITY, Json(list)).into_response(),
            AppErr::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            AppErr::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AppErr::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED).into_response()
            }
        }
    }
}

/* ── 小助手：單一訊息的 422 ── */
pub fn invalid<M: Into<String>>(msg: M) -> AppErr {
    AppErr::Invalid(vec![msg.into()])
}

/// Unique-constraint violations surface as sqlx database errors.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
