//! Entity CRUD endpoints plus the liveness and shutdown probes.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};

use super::{parse_body, parse_entity_id, parse_kind, AppState, HttpError, Negotiated, Reply};
use crate::entity::EntityPayload;
use crate::view::{Document, Field, Record};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/shutdown", get(shutdown))
        .route(
            "/{kind}",
            get(list_entities).head(head_entities).post(create_entity),
        )
        .route(
            "/{kind}/{id}",
            get(get_entity)
                .head(head_entity)
                .put(amend_entity)
                .post(amend_entity)
                .delete(delete_entity),
        )
}

/// Liveness probe; answers as soon as the listener is accepting.
async fn liveness(Negotiated(format): Negotiated) -> Reply {
    Reply::ok(
        format,
        Document::Record(Record {
            element: "status",
            fields: vec![
                ("status", Field::Text("ok".to_string())),
                ("version", Field::Text(env!("CARGO_PKG_VERSION").to_string())),
            ],
        }),
    )
}

async fn shutdown(State(state): State<AppState>, Negotiated(format): Negotiated) -> Reply {
    tracing::info!("shutdown endpoint called");
    state.shutdown.cancel();
    Reply::empty(StatusCode::OK, format)
}

async fn list_entities(
    State(state): State<AppState>,
    Negotiated(format): Negotiated,
    Path(kind): Path<String>,
    Query(filter): Query<Vec<(String, String)>>,
) -> Result<Reply, HttpError> {
    let kind = parse_kind(&kind).map_err(HttpError::in_format(format))?;

    let store = state.store.read().await;
    let records = store
        .list(kind, &filter)
        .into_iter()
        .map(|entity| Record::full(entity, store.links_of(entity)))
        .collect();

    Ok(Reply::ok(format, Document::collection(kind, records)))
}

async fn head_entities(
    Negotiated(format): Negotiated,
    Path(kind): Path<String>,
) -> Result<Reply, HttpError> {
    parse_kind(&kind).map_err(HttpError::in_format(format))?;
    Ok(Reply::empty(StatusCode::OK, format))
}

async fn create_entity(
    State(state): State<AppState>,
    Negotiated(format): Negotiated,
    Path(kind): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Reply, HttpError> {
    let fail = HttpError::in_format(format);
    let kind = parse_kind(&kind).map_err(&fail)?;
    let payload = parse_body(&headers, &body)
        .and_then(|value| EntityPayload::from_value(&value))
        .map_err(&fail)?;

    let entity = state.store.write().await.create(kind, &payload).map_err(&fail)?;
    tracing::info!(kind = %kind, id = %entity.id(), "entity created");

    Ok(Reply::created(
        format,
        Some(Document::Record(Record::full(&entity, Vec::new()))),
    ))
}

async fn get_entity(
    State(state): State<AppState>,
    Negotiated(format): Negotiated,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Reply, HttpError> {
    let fail = HttpError::in_format(format);
    let kind = parse_kind(&kind).map_err(&fail)?;
    let id = parse_entity_id(kind, &id).map_err(&fail)?;

    let store = state.store.read().await;
    let entity = store.get(kind, id).map_err(&fail)?;
    let record = Record::full(entity, store.links_of(entity));

    Ok(Reply::ok(format, Document::collection(kind, vec![record])))
}

async fn head_entity(
    State(state): State<AppState>,
    Negotiated(format): Negotiated,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Reply, HttpError> {
    let fail = HttpError::in_format(format);
    let kind = parse_kind(&kind).map_err(&fail)?;
    let id = parse_entity_id(kind, &id).map_err(&fail)?;

    state.store.read().await.get(kind, id).map_err(&fail)?;
    Ok(Reply::empty(StatusCode::OK, format))
}

/// `PUT` and `POST` on a record both apply a partial update.
async fn amend_entity(
    State(state): State<AppState>,
    Negotiated(format): Negotiated,
    Path((kind, id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Reply, HttpError> {
    let fail = HttpError::in_format(format);
    let kind = parse_kind(&kind).map_err(&fail)?;
    let id = parse_entity_id(kind, &id).map_err(&fail)?;
    let payload = parse_body(&headers, &body)
        .and_then(|value| EntityPayload::from_value(&value))
        .map_err(&fail)?;

    let mut store = state.store.write().await;
    let entity = store.update(kind, id, &payload).map_err(&fail)?;
    let record = Record::full(&entity, store.links_of(&entity));

    Ok(Reply::ok(format, Document::Record(record)))
}

async fn delete_entity(
    State(state): State<AppState>,
    Negotiated(format): Negotiated,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Reply, HttpError> {
    let fail = HttpError::in_format(format);
    let kind = parse_kind(&kind).map_err(&fail)?;
    let id = parse_entity_id(kind, &id).map_err(&fail)?;

    state.store.write().await.delete(kind, id).map_err(&fail)?;
    tracing::info!(kind = %kind, id = %id, "entity deleted");

    Ok(Reply::empty(StatusCode::OK, format))
}
