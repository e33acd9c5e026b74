use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Json, Path, Query,
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{invalid, AppErr, AppResult},
    models::{Message, MessageEdit, MessageKind, NewMessage},
    store::Store,
    utils::{
        clock,
        validate::{Field, Fields, Rule, Schema},
    },
};

use super::{json_body, user_of};

const MESSAGE: Schema = Schema(&[
    Field { name: "to", rule: Rule::Text },
    Field { name: "text", rule: Rule::Text },
    Field { name: "type", rule: Rule::OneOf(&MessageKind::USER) },
]);

const NO_USER: &str = "O cabeçalho \"user\" é obrigatório!";
const NOT_FOUND: &str = "Mensagem não encontrada!";
const NOT_AUTHOR: &str = "Você não é o autor desta mensagem!";

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/messages", get(list).post(send))
        .route("/messages/:id", put(edit).delete(remove))
}

/* ---------------- Send ---------------- */
async fn send(
    Extension(store): Extension<Store>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let from = user_of(&headers).ok_or_else(|| AppErr::Unauthorized(NO_USER.into()))?;
    let edit = parse_edit(MESSAGE.check(&json_body(body)?)?)?;

    if store.participant(&from).await?.is_none() {
        return Err(invalid("Mensagem inválida, o usuário não existe!"));
    }

    let msg = store
        .add_message(&NewMessage {
            from,
            to: edit.to,
            text: edit.text,
            kind: edit.kind,
            time: clock::stamp(),
        })
        .await?;

    tracing::debug!(id = %msg.id, from = %msg.from, to = %msg.to, "message sent");
    Ok((StatusCode::CREATED, "Mensagem enviada!"))
}

/* ---------------- List ---------------- */
async fn list(
    Extension(store): Extension<Store>,
    headers: HeaderMap,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Message>>> {
    let user = user_of(&headers).ok_or_else(|| AppErr::Unauthorized(NO_USER.into()))?;
    let Query(q) = query.map_err(|rej| invalid(rej.body_text()))?;
    let limit = q.limit.as_deref().map(parse_limit).transpose()?;
    Ok(Json(store.visible_to(&user, limit).await?))
}

/* ---------------- Edit ---------------- */
async fn edit(
    Extension(store): Extension<Store>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<&'static str> {
    let edit = parse_edit(MESSAGE.check(&json_body(body)?)?)?;
    authored(&store, &id, user_of(&headers)).await?;

    if store.edit_message(&id, &edit).await? == 0 {
        return Err(AppErr::NotFound(NOT_FOUND.into()));
    }
    tracing::debug!(%id, "message edited");
    Ok("Mensagem editada!")
}

/* ---------------- Delete ---------------- */
async fn remove(
    Extension(store): Extension<Store>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<&'static str> {
    authored(&store, &id, user_of(&headers)).await?;

    if store.delete_message(&id).await? == 0 {
        return Err(AppErr::NotFound(NOT_FOUND.into()));
    }
    tracing::debug!(%id, "message deleted");
    Ok("Mensagem apagada!")
}

/// Loads message `id` and checks that `user` wrote it.
async fn authored(store: &Store, id: &str, user: Option<String>) -> AppResult<()> {
    if uuid::Uuid::parse_str(id).is_err() {
        return Err(AppErr::NotFound(NOT_FOUND.into()));
    }
    let msg = store
        .message(id)
        .await?
        .ok_or_else(|| AppErr::NotFound(NOT_FOUND.into()))?;

    match user {
        Some(u) if u == msg.from => Ok(()),
        _ => Err(AppErr::Unauthorized(NOT_AUTHOR.into())),
    }
}

fn parse_edit(mut f: Fields) -> AppResult<MessageEdit> {
    let kind = f.take("type")?.parse().map_err(|_| invalid("\"type\" is invalid"))?;
    Ok(MessageEdit { to: f.take("to")?, text: f.take("text")?, kind })
}

fn parse_limit(raw: &str) -> AppResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid("\"limit\" must be a positive integer")),
    }
}
