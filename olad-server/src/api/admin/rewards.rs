//! Reward type resource handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use rust_decimal::Decimal;

use olad_core::entities::rewards::{
    CreateReward, DeleteReward, GetRewardById, GetRewardStats, ListRewards, REWARD_FILTERS,
    REWARD_SORT, RewardRow, RewardTypeInUse, SetRewardActive, UpdateReward,
};
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::rewards::{
    CreateRewardRequest, RewardDetailData, RewardListData, RewardStats, RewardTypeResponse,
    UpdateRewardRequest,
};
use olad_sdk::objects::users::ToggleActiveRequest;

use super::{ListParams, created, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn to_response(r: &RewardRow) -> RewardTypeResponse {
    RewardTypeResponse {
        id: r.id,
        name: r.name.clone(),
        kind: r.kind.into(),
        description: r.description.clone(),
        points: r.points,
        value: r.value,
        is_active: r.is_active,
        usage_count: r.usage_count,
        points_awarded: r.points_awarded,
        created_at: unix(r.created_at),
        updated_at: unix(r.updated_at),
    }
}

/// `GET /api/rewards`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) =
        list_inputs(&state, &params, &REWARD_FILTERS, &REWARD_SORT).await?;
    let processor = state.processor();

    let result = processor.process(ListRewards { filter, order, page }).await?;
    let stats = processor.process(GetRewardStats).await?;

    Ok(Json(Envelope::ok(RewardListData {
        rewards: result.rows.iter().map(to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
        stats: RewardStats {
            total_rewards: stats.total_rewards,
            active_rewards: stats.active_rewards,
        },
    })))
}

/// `GET /api/rewards/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let reward = state
        .processor()
        .process(GetRewardById { id })
        .await?
        .ok_or(ApiError::NotFound("Reward type"))?;

    Ok(Json(Envelope::ok(RewardDetailData {
        reward: to_response(&reward),
    })))
}

/// `POST /api/rewards`
pub async fn create(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<CreateRewardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("reward name is required".into()));
    }
    let points = body.points.unwrap_or(0);
    if points < 0 {
        return Err(ApiError::Validation("points must not be negative".into()));
    }
    let value = body.value.unwrap_or(Decimal::ZERO);
    if value < Decimal::ZERO {
        return Err(ApiError::Validation("value must not be negative".into()));
    }

    let processor = state.processor();
    let id = processor
        .process(CreateReward {
            name: body.name,
            description: body.description,
            kind: body.kind.into(),
            points,
            value,
        })
        .await?;

    let reward = processor
        .process(GetRewardById { id })
        .await?
        .ok_or(ApiError::NotFound("Reward type"))?;
    Ok(created(to_response(&reward)))
}

/// `PUT /api/rewards/{id}`
pub async fn update(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateRewardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(points) = body.points
        && points < 0
    {
        return Err(ApiError::Validation("points must not be negative".into()));
    }
    if let Some(value) = body.value
        && value < Decimal::ZERO
    {
        return Err(ApiError::Validation("value must not be negative".into()));
    }

    let processor = state.processor();
    let affected = processor
        .process(UpdateReward {
            id,
            name: body.name,
            description: body.description,
            kind: body.kind.map(Into::into),
            points: body.points,
            value: body.value,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Reward type"));
    }

    let reward = processor
        .process(GetRewardById { id })
        .await?
        .ok_or(ApiError::NotFound("Reward type"))?;
    Ok(Json(Envelope::ok(to_response(&reward))))
}

/// `PATCH /api/rewards/{id}`
pub async fn toggle_active(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<ToggleActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(SetRewardActive {
            id,
            is_active: body.is_active,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Reward type"));
    }

    let reward = processor
        .process(GetRewardById { id })
        .await?
        .ok_or(ApiError::NotFound("Reward type"))?;
    Ok(Json(Envelope::ok(to_response(&reward))))
}

/// `DELETE /api/rewards/{id}`
///
/// Refused while history rows reference the type; deactivate instead.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    let in_use = processor
        .process(RewardTypeInUse { reward_type_id: id })
        .await?;
    if in_use {
        return Err(ApiError::Dependency(
            "reward type has history entries and cannot be deleted".into(),
        ));
    }

    let affected = processor.process(DeleteReward { id }).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Reward type"));
    }
    Ok(Json(Envelope::ok(serde_json::json!({"deleted": true}))))
}
