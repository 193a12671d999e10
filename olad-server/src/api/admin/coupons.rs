//! Coupon resource handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use rust_decimal::Decimal;

use olad_core::entities::coupons::{
    COUPON_FILTERS, COUPON_SORT, CouponCodeExists, CouponRow, CreateCoupon, DeleteCoupon,
    GetCouponById, GetCouponStats, ListCoupons, SetCouponActive, UpdateCoupon,
};
use olad_core::query::parse_date;
use olad_sdk::objects::coupons::{
    CouponDetailData, CouponListData, CouponResponse, CouponStats, CreateCouponRequest,
    UpdateCouponRequest,
};
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::users::ToggleActiveRequest;

use super::{ListParams, created, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn to_response(r: &CouponRow) -> CouponResponse {
    CouponResponse {
        id: r.id,
        code: r.code.clone(),
        title: r.title.clone(),
        description: r.description.clone(),
        discount_type: r.discount_type.into(),
        discount_value: r.discount_value,
        valid_from: r.valid_from.to_string(),
        valid_to: r.valid_to.to_string(),
        usage_limit: r.usage_limit,
        is_active: r.is_active,
        created_at: unix(r.created_at),
        updated_at: unix(r.updated_at),
    }
}

fn parse_body_date(raw: &str, field: &str) -> Result<time::Date, ApiError> {
    parse_date(raw).ok_or_else(|| ApiError::Validation(format!("{field} must be YYYY-MM-DD")))
}

/// `GET /api/coupons`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) =
        list_inputs(&state, &params, &COUPON_FILTERS, &COUPON_SORT).await?;
    let processor = state.processor();

    let result = processor.process(ListCoupons { filter, order, page }).await?;
    let stats = processor.process(GetCouponStats).await?;

    Ok(Json(Envelope::ok(CouponListData {
        coupons: result.rows.iter().map(to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
        stats: CouponStats {
            total_coupons: stats.total_coupons,
            active_coupons: stats.active_coupons,
            expired_coupons: stats.expired_coupons,
        },
    })))
}

/// `GET /api/coupons/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let coupon = state
        .processor()
        .process(GetCouponById { id })
        .await?
        .ok_or(ApiError::NotFound("Coupon"))?;

    Ok(Json(Envelope::ok(CouponDetailData {
        coupon: to_response(&coupon),
    })))
}

/// `POST /api/coupons`
pub async fn create(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<CreateCouponRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.code.trim().is_empty() || body.title.trim().is_empty() {
        return Err(ApiError::Validation("code and title are required".into()));
    }
    if body.discount_value <= Decimal::ZERO {
        return Err(ApiError::Validation("discount_value must be positive".into()));
    }
    let valid_from = parse_body_date(&body.valid_from, "valid_from")?;
    let valid_to = parse_body_date(&body.valid_to, "valid_to")?;
    if valid_to < valid_from {
        return Err(ApiError::Validation("valid_to precedes valid_from".into()));
    }

    let processor = state.processor();

    let duplicate = processor
        .process(CouponCodeExists {
            code: body.code.clone(),
            exclude_id: None,
        })
        .await?;
    if duplicate {
        return Err(ApiError::Conflict("a coupon with that code already exists".into()));
    }

    let id = processor
        .process(CreateCoupon {
            code: body.code,
            title: body.title,
            description: body.description,
            discount_type: body.discount_type.into(),
            discount_value: body.discount_value,
            valid_from,
            valid_to,
            usage_limit: body.usage_limit,
        })
        .await?;

    let coupon = processor
        .process(GetCouponById { id })
        .await?
        .ok_or(ApiError::NotFound("Coupon"))?;
    Ok(created(to_response(&coupon)))
}

/// `PUT /api/coupons/{id}`
pub async fn update(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCouponRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(value) = body.discount_value
        && value <= Decimal::ZERO
    {
        return Err(ApiError::Validation("discount_value must be positive".into()));
    }
    let valid_from = body
        .valid_from
        .as_deref()
        .map(|raw| parse_body_date(raw, "valid_from"))
        .transpose()?;
    let valid_to = body
        .valid_to
        .as_deref()
        .map(|raw| parse_body_date(raw, "valid_to"))
        .transpose()?;
    if let (Some(from), Some(to)) = (valid_from, valid_to)
        && to < from
    {
        return Err(ApiError::Validation("valid_to precedes valid_from".into()));
    }

    let processor = state.processor();
    let affected = processor
        .process(UpdateCoupon {
            id,
            title: body.title,
            description: body.description,
            discount_type: body.discount_type.map(Into::into),
            discount_value: body.discount_value,
            valid_from,
            valid_to,
            usage_limit: body.usage_limit,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Coupon"));
    }

    let coupon = processor
        .process(GetCouponById { id })
        .await?
        .ok_or(ApiError::NotFound("Coupon"))?;
    Ok(Json(Envelope::ok(to_response(&coupon))))
}

/// `PATCH /api/coupons/{id}`
pub async fn toggle_active(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<ToggleActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(SetCouponActive {
            id,
            is_active: body.is_active,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Coupon"));
    }

    let coupon = processor
        .process(GetCouponById { id })
        .await?
        .ok_or(ApiError::NotFound("Coupon"))?;
    Ok(Json(Envelope::ok(to_response(&coupon))))
}

/// `DELETE /api/coupons/{id}`, a hard delete.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let affected = state.processor().process(DeleteCoupon { id }).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Coupon"));
    }
    Ok(Json(Envelope::ok(serde_json::json!({"deleted": true}))))
}
