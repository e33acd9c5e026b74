use axum::{extract::Extension, http::HeaderMap, routing::post, Router};

use crate::{
    error::{invalid, AppErr, AppResult},
    store::Store,
    utils::clock,
};

use super::user_of;

pub fn router() -> Router {
    Router::new().route("/status", post(heartbeat))
}

async fn heartbeat(
    Extension(store): Extension<Store>,
    headers: HeaderMap,
) -> AppResult<&'static str> {
    let user = user_of(&headers).ok_or_else(|| invalid("\"user\" header is required"))?;

    if store.participant(&user).await?.is_none() {
        return Err(AppErr::NotFound("O usuário informado não existe!".into()));
    }

    // evicted between lookup and update
    if store.touch(&user, clock::now_ms()).await? == 0 {
        return Err(AppErr::NotFound("Um erro inesperado aconteceu!".into()));
    }

    tracing::debug!(%user, "heartbeat");
    Ok("Status atualizado!")
}
