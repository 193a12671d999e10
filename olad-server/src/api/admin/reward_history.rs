//! Reward history handlers. The ledger is written by the consumer platform
//! and is read-only here.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;

use olad_core::entities::reward_history::{
    GetRewardHistoryById, GetRewardHistoryStats, ListRewardHistory, REWARD_HISTORY_FILTERS,
    REWARD_HISTORY_SORT, RewardHistoryRow,
};
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::rewards::{
    RewardHistoryDetailData, RewardHistoryListData, RewardHistoryResponse, RewardHistoryStats,
};

use super::{ListParams, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn to_response(r: &RewardHistoryRow) -> RewardHistoryResponse {
    RewardHistoryResponse {
        id: r.id,
        user_id: r.user_id,
        user_name: r.user_name.clone(),
        reward_type_id: r.reward_type_id,
        reward_name: r.reward_name.clone(),
        points: r.points,
        amount: r.amount,
        note: r.note.clone(),
        created_at: unix(r.created_at),
    }
}

/// `GET /api/reward-history`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) =
        list_inputs(&state, &params, &REWARD_HISTORY_FILTERS, &REWARD_HISTORY_SORT).await?;
    let processor = state.processor();

    let result = processor
        .process(ListRewardHistory { filter, order, page })
        .await?;
    let stats = processor.process(GetRewardHistoryStats).await?;

    Ok(Json(Envelope::ok(RewardHistoryListData {
        history: result.rows.iter().map(to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
        stats: RewardHistoryStats {
            total_points: stats.total_points,
            distinct_users: stats.distinct_users,
        },
    })))
}

/// `GET /api/reward-history/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .processor()
        .process(GetRewardHistoryById { id })
        .await?
        .ok_or(ApiError::NotFound("Reward history entry"))?;

    Ok(Json(Envelope::ok(RewardHistoryDetailData {
        entry: to_response(&entry),
    })))
}
