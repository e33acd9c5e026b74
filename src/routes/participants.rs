use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use serde_json::Value;

use crate::{
    error::{is_unique_violation, AppErr, AppResult},
    models::Participant,
    store::Store,
    utils::{
        clock,
        validate::{Field, Rule, Schema},
    },
};

use super::json_body;

const SIGN_UP: Schema = Schema(&[Field { name: "name", rule: Rule::Text }]);
const TAKEN: &str = "Esse usuário já está cadastrado!";

pub fn router() -> Router {
    Router::new().route("/participants", post(register).get(list))
}

/* ---------------- Register ---------------- */
async fn register(
    Extension(store): Extension<Store>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let name = SIGN_UP.check(&json_body(body)?)?.take("name")?;

    if store.participant(&name).await?.is_some() {
        return Err(AppErr::Conflict(TAKEN.into()));
    }

    // a concurrent sign-up can still win the race; the unique key catches it
    match store.register(&name, clock::now_ms(), clock::stamp()).await {
        Ok(()) => {}
        Err(e) if is_unique_violation(&e) => return Err(AppErr::Conflict(TAKEN.into())),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(%name, "participant joined");
    Ok((StatusCode::CREATED, "Cadastro efetuado!"))
}

/* ---------------- List ---------------- */
async fn list(Extension(store): Extension<Store>) -> AppResult<Json<Vec<Participant>>> {
    Ok(Json(store.participants().await?))
}
