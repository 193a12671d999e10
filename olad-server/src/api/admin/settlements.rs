//! Settlement resource handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;

use olad_core::entities::SettlementStatus;
use olad_core::entities::settlements::{
    DeleteSettlement, GetSettlementById, GetSettlementStats, ListSettlements,
    SETTLEMENT_FILTERS, SETTLEMENT_SORT, SetSettlementStatus, SettlementRow,
};
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::settlements::{
    SettlementDetailData, SettlementListData, SettlementResponse, SettlementStats,
    UpdateSettlementStatusRequest,
};

use super::{ListParams, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn to_response(r: &SettlementRow) -> SettlementResponse {
    SettlementResponse {
        id: r.id,
        store_id: r.store_id,
        store_name: r.store_name.clone(),
        amount: r.amount,
        status: r.status.into(),
        period_start: r.period_start.to_string(),
        period_end: r.period_end.to_string(),
        settled_at: r.settled_at.map(unix),
        created_at: unix(r.created_at),
        updated_at: unix(r.updated_at),
    }
}

/// `GET /api/settlements`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) =
        list_inputs(&state, &params, &SETTLEMENT_FILTERS, &SETTLEMENT_SORT).await?;
    let processor = state.processor();

    let result = processor
        .process(ListSettlements { filter, order, page })
        .await?;
    let stats = processor.process(GetSettlementStats).await?;

    Ok(Json(Envelope::ok(SettlementListData {
        settlements: result.rows.iter().map(to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
        stats: SettlementStats {
            pending_amount: stats.pending_amount,
            completed_amount: stats.completed_amount,
        },
    })))
}

/// `GET /api/settlements/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let settlement = state
        .processor()
        .process(GetSettlementById { id })
        .await?
        .ok_or(ApiError::NotFound("Settlement"))?;

    Ok(Json(Envelope::ok(SettlementDetailData {
        settlement: to_response(&settlement),
    })))
}

/// `PATCH /api/settlements/{id}`
///
/// With `strict_settlement_transitions` on, the requested status must be
/// reachable from the current one; otherwise any status can be set, which
/// is the historical behavior.
pub async fn update_status(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateSettlementStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let next: SettlementStatus = body.status.into();

    let strict = state.config.policy.read().await.strict_settlement_transitions;
    if strict {
        let current = processor
            .process(GetSettlementById { id })
            .await?
            .ok_or(ApiError::NotFound("Settlement"))?;
        if !current.status.can_transition_to(next) {
            return Err(ApiError::Validation(format!(
                "settlement cannot move from {:?} to {:?}",
                current.status, next
            )));
        }
    }

    let affected = processor
        .process(SetSettlementStatus { id, status: next })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Settlement"));
    }

    let settlement = processor
        .process(GetSettlementById { id })
        .await?
        .ok_or(ApiError::NotFound("Settlement"))?;
    Ok(Json(Envelope::ok(SettlementDetailData {
        settlement: to_response(&settlement),
    })))
}

/// `DELETE /api/settlements/{id}`, a hard delete. Completed settlements are
/// settled bookkeeping and cannot be removed.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    let current = processor
        .process(GetSettlementById { id })
        .await?
        .ok_or(ApiError::NotFound("Settlement"))?;
    if current.status.blocks_deletion() {
        return Err(ApiError::Dependency(
            "completed settlements cannot be deleted".into(),
        ));
    }

    let affected = processor.process(DeleteSettlement { id }).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Settlement"));
    }
    Ok(Json(Envelope::ok(serde_json::json!({"deleted": true}))))
}
