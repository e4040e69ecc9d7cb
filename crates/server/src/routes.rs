use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use schema_chain::{load_chain, LogSink};

use crate::error::{codes, ErrorBody};
use crate::store::{Schema, SchemaStore};

/// Shared handler state.
#[derive(Clone, Default)]
pub struct AppState {
    store: Arc<SchemaStore>,
}

impl AppState {
    pub fn store(&self) -> &SchemaStore {
        &self.store
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/schema", post(create_schema).get(list_schemas))
        .route("/schema/:id", get(get_schema).delete(delete_schema))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CreateSchema {
    directory: PathBuf,
    #[serde(default)]
    empty: bool,
}

#[derive(Debug, Serialize)]
struct CreatedSchema {
    id: Uuid,
}

/// Admit a directory as a tracked schema. Non-empty directories are scanned
/// and chain-validated on the host the server runs on; anything invalid is
/// rejected before an ID is handed out.
async fn create_schema(
    State(state): State<AppState>,
    body: Result<Json<CreateSchema>, JsonRejection>,
) -> Response {
    let Json(create) = match body {
        Ok(body) => body,
        Err(_) => {
            return ErrorBody::user(
                codes::MALFORMED_REQUEST,
                "could not parse request body into expected JSON",
            )
            .into_response();
        }
    };

    if !create.empty {
        let mut sink = LogSink;
        if let Err(err) = load_chain(&create.directory, &mut sink) {
            return ErrorBody::from_chain(&err).into_response();
        }
    }

    let schema = Schema {
        id: Uuid::new_v4(),
        directory: create.directory,
        empty: create.empty,
    };
    let id = schema.id;
    state.store.insert(schema);

    (StatusCode::OK, Json(CreatedSchema { id })).into_response()
}

/// Dump all known schemas. Always succeeds, even if the list is empty.
async fn list_schemas(State(state): State<AppState>) -> Json<Vec<Schema>> {
    Json(state.store.list())
}

async fn get_schema(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.store.get(&id) {
        Some(schema) => Json(schema).into_response(),
        None => not_found(&id).with_status(StatusCode::NOT_FOUND),
    }
}

async fn delete_schema(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    if state.store.remove(&id) {
        StatusCode::OK.into_response()
    } else {
        not_found(&id).with_status(StatusCode::NOT_FOUND)
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn not_found(id: &Uuid) -> ErrorBody {
    ErrorBody::user(codes::NOT_FOUND, format!("schema with id '{id}' was not found"))
}
