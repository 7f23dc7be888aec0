//! Relationship endpoints, driven by the relation catalog.
//!
//! One set of handlers serves every relation: the `{kind}` and `{relation}`
//! path segments resolve to a catalog entry, and the store applies mirroring
//! from that entry.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get},
    Router,
};

use super::{
    parse_body, parse_entity_id, parse_kind, status_code, AppState, HttpError, Negotiated, Reply,
};
use crate::entity::{parse_id, EntityPayload, RelationKind};
use crate::error::TodoManagerError;
use crate::view::{Document, Record};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{kind}/{id}/{relation}",
            get(list_linked).head(head_linked).post(link),
        )
        .route("/{kind}/{id}/{relation}/{target}", delete(unlink))
}

fn resolve(kind: &str, relation: &str) -> crate::error::Result<RelationKind> {
    let owner = parse_kind(kind)?;
    RelationKind::lookup(owner, relation)
        .ok_or_else(|| TodoManagerError::UnknownRoute(format!("/{}/{{id}}/{}", kind, relation)))
}

/// Linked records as summaries, wrapped in the target kind's collection.
///
/// A missing owner still yields the (empty) collection alongside the error,
/// so the list field is never absent.
async fn list_linked(
    State(state): State<AppState>,
    Negotiated(format): Negotiated,
    Path((kind, id, relation)): Path<(String, String, String)>,
) -> Result<Reply, HttpError> {
    let relation = resolve(&kind, &relation).map_err(HttpError::in_format(format))?;
    let to_kind = relation.to_kind();

    let store = state.store.read().await;
    let linked = parse_entity_id(relation.from_kind(), &id)
        .and_then(|from| store.list_linked(relation, from));

    match linked {
        Ok(entities) => {
            let records = entities.into_iter().map(Record::summary).collect();
            Ok(Reply::ok(format, Document::collection(to_kind, records)))
        }
        Err(error @ TodoManagerError::EntityNotFound { .. }) => Ok(Reply::new(
            status_code(&error),
            format,
            Some(Document::Collection {
                name: to_kind.plural(),
                records: Vec::new(),
                errors: vec![error.to_string()],
            }),
        )),
        Err(error) => Err(HttpError::new(error, format)),
    }
}

async fn head_linked(
    State(state): State<AppState>,
    Negotiated(format): Negotiated,
    Path((kind, id, relation)): Path<(String, String, String)>,
) -> Result<Reply, HttpError> {
    let fail = HttpError::in_format(format);
    let relation = resolve(&kind, &relation).map_err(&fail)?;
    let from = parse_entity_id(relation.from_kind(), &id).map_err(&fail)?;

    state.store.read().await.has_any(relation, from).map_err(&fail)?;
    Ok(Reply::empty(StatusCode::OK, format))
}

/// Link an existing target named by `id` in the body, or create the target
/// from the body when it carries no `id`.
async fn link(
    State(state): State<AppState>,
    Negotiated(format): Negotiated,
    Path((kind, id, relation)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Reply, HttpError> {
    let fail = HttpError::in_format(format);
    let relation = resolve(&kind, &relation).map_err(&fail)?;
    let from = parse_entity_id(relation.from_kind(), &id).map_err(&fail)?;
    let body = parse_body(&headers, &body).map_err(&fail)?;

    let target_id = match body.get("id") {
        Some(value) if !value.is_null() => Some(parse_id(value).map_err(&fail)?),
        _ => None,
    };

    let mut store = state.store.write().await;
    match target_id {
        Some(to) => {
            store.link(relation, from, to).map_err(&fail)?;
            tracing::info!(relation = %relation, %from, %to, "relationship created");
            Ok(Reply::created(format, None))
        }
        None => {
            let payload = EntityPayload::from_value(&body).map_err(&fail)?;
            let target = store.link_new(relation, from, &payload).map_err(&fail)?;
            tracing::info!(relation = %relation, %from, to = %target.id(), "target created and linked");
            let record = Record::full(&target, store.links_of(&target));
            Ok(Reply::created(format, Some(Document::Record(record))))
        }
    }
}

async fn unlink(
    State(state): State<AppState>,
    Negotiated(format): Negotiated,
    Path((kind, id, relation, target)): Path<(String, String, String, String)>,
) -> Result<Reply, HttpError> {
    let fail = HttpError::in_format(format);
    let relation = resolve(&kind, &relation).map_err(&fail)?;
    let from = parse_entity_id(relation.from_kind(), &id).map_err(&fail)?;
    let to = parse_entity_id(relation.to_kind(), &target).map_err(&fail)?;

    state
        .store
        .write()
        .await
        .unlink(relation, from, to)
        .map_err(&fail)?;
    tracing::info!(relation = %relation, %from, %to, "relationship removed");

    Ok(Reply::empty(StatusCode::OK, format))
}
