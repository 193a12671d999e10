//! Top store curation handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use kanau::processor::Processor;

use olad_core::entities::stores::GetStoreById;
use olad_core::entities::top_stores::{
    AddTopStore, ListTopStores, RemoveTopStore, ReorderError, ReorderTopStores, TopStoreExists,
    TopStoreRow,
};
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::top_stores::{
    AddTopStoreRequest, ReorderRequest, TopStoreListData, TopStoreResponse,
};

use super::{created, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn to_response(r: &TopStoreRow) -> TopStoreResponse {
    TopStoreResponse {
        id: r.id,
        store_id: r.store_id,
        store_name: r.store_name.clone(),
        store_category: r.category.clone(),
        sequence_no: r.sequence_no,
        created_at: unix(r.created_at),
    }
}

/// `GET /api/top-stores` returns the whole curated list; the pagination block is
/// synthesized so the envelope shape matches every other list.
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.processor().process(ListTopStores).await?;
    let total = rows.len() as i64;
    let limit = total.max(1);

    Ok(Json(Envelope::ok(TopStoreListData {
        top_stores: rows.iter().map(to_response).collect(),
        pagination: Pagination::new(total, limit, 0),
    })))
}

/// `POST /api/top-stores`
pub async fn add(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<AddTopStoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    processor
        .process(GetStoreById { id: body.store_id })
        .await?
        .ok_or(ApiError::NotFound("Store"))?;

    let listed = processor
        .process(TopStoreExists {
            store_id: body.store_id,
        })
        .await?;
    if listed {
        return Err(ApiError::Conflict("store is already in the top list".into()));
    }

    processor
        .process(AddTopStore {
            store_id: body.store_id,
            sequence_no: body.sequence_no,
        })
        .await?;

    let rows = processor.process(ListTopStores).await?;
    let total = rows.len() as i64;
    let limit = total.max(1);
    Ok(created(TopStoreListData {
        top_stores: rows.iter().map(to_response).collect(),
        pagination: Pagination::new(total, limit, 0),
    }))
}

/// `PUT /api/top-stores/sequence`: all-or-nothing resequencing.
pub async fn reorder(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<ReorderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.entries.is_empty() {
        return Err(ApiError::Validation("entries must not be empty".into()));
    }

    let processor = state.processor();
    let entries = body
        .entries
        .iter()
        .map(|e| (e.id, e.sequence_no))
        .collect();
    processor
        .process(ReorderTopStores { entries })
        .await
        .map_err(|err| match err {
            ReorderError::UnknownId(id) => {
                ApiError::Validation(format!("unknown top store entry: {id}"))
            }
            ReorderError::Database(err) => ApiError::from(err),
        })?;

    let rows = processor.process(ListTopStores).await?;
    let total = rows.len() as i64;
    let limit = total.max(1);
    Ok(Json(Envelope::ok(TopStoreListData {
        top_stores: rows.iter().map(to_response).collect(),
        pagination: Pagination::new(total, limit, 0),
    })))
}

/// `DELETE /api/top-stores/{id}`
pub async fn remove(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let affected = state.processor().process(RemoveTopStore { id }).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Top store entry"));
    }
    Ok(Json(Envelope::ok(serde_json::json!({"deleted": true}))))
}
