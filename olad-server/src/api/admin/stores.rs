//! Store resource handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use rust_decimal::Decimal;

use olad_core::entities::stores::{
    CreateStore, GetStoreById, GetStoreStats, ListStores, STORE_FILTERS, STORE_SORT,
    SetStoreActive, SoftDeleteStore, StoreHasTransactions, StoreNameExists, StoreRow,
    UpdateStore,
};
use olad_core::entities::transactions::ListRecentStoreTransactions;
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::stores::{
    CreateStoreRequest, StoreDetailData, StoreListData, StoreResponse, StoreStats,
    UpdateStoreRequest,
};
use olad_sdk::objects::users::ToggleActiveRequest;

use super::transactions::transaction_to_response;
use super::{ListParams, created, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

/// Transactions shown inline on the store detail page.
const RECENT_TRANSACTIONS: i64 = 10;

fn to_response(r: &StoreRow) -> StoreResponse {
    StoreResponse {
        id: r.id,
        name: r.name.clone(),
        email: r.email.clone(),
        phone: r.phone.clone(),
        address: r.address.clone(),
        category: r.category.clone(),
        commission_rate: r.commission_rate,
        is_active: r.is_active,
        transaction_count: r.transaction_count,
        revenue: r.revenue,
        created_at: unix(r.created_at),
        updated_at: unix(r.updated_at),
    }
}

/// `GET /api/stores`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) = list_inputs(&state, &params, &STORE_FILTERS, &STORE_SORT).await?;
    let processor = state.processor();

    let result = processor.process(ListStores { filter, order, page }).await?;
    let stats = processor.process(GetStoreStats).await?;

    Ok(Json(Envelope::ok(StoreListData {
        stores: result.rows.iter().map(to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
        stats: StoreStats {
            total_stores: stats.total_stores,
            active_stores: stats.active_stores,
        },
    })))
}

/// `GET /api/stores/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    let store = processor
        .process(GetStoreById { id })
        .await?
        .ok_or(ApiError::NotFound("Store"))?;
    let recent = processor
        .process(ListRecentStoreTransactions {
            store_id: id,
            limit: RECENT_TRANSACTIONS,
        })
        .await?;

    Ok(Json(Envelope::ok(StoreDetailData {
        store: to_response(&store),
        recent_transactions: recent.iter().map(transaction_to_response).collect(),
    })))
}

/// `POST /api/stores`
pub async fn create(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<CreateStoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("store name is required".into()));
    }
    let commission_rate = body.commission_rate.unwrap_or(Decimal::ZERO);
    if commission_rate < Decimal::ZERO || commission_rate > Decimal::from(100) {
        return Err(ApiError::Validation(
            "commission_rate must be between 0 and 100".into(),
        ));
    }

    let processor = state.processor();

    let duplicate = processor
        .process(StoreNameExists {
            name: body.name.clone(),
            exclude_id: None,
        })
        .await?;
    if duplicate {
        return Err(ApiError::Conflict("a store with that name already exists".into()));
    }

    let id = processor
        .process(CreateStore {
            name: body.name,
            email: body.email,
            phone: body.phone,
            address: body.address,
            category: body.category,
            commission_rate,
        })
        .await?;

    let store = processor
        .process(GetStoreById { id })
        .await?
        .ok_or(ApiError::NotFound("Store"))?;
    Ok(created(to_response(&store)))
}

/// `PUT /api/stores/{id}`
pub async fn update(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(rate) = body.commission_rate
        && (rate < Decimal::ZERO || rate > Decimal::from(100))
    {
        return Err(ApiError::Validation(
            "commission_rate must be between 0 and 100".into(),
        ));
    }

    let processor = state.processor();

    if let Some(name) = &body.name {
        let duplicate = processor
            .process(StoreNameExists {
                name: name.clone(),
                exclude_id: Some(id),
            })
            .await?;
        if duplicate {
            return Err(ApiError::Conflict("a store with that name already exists".into()));
        }
    }

    let affected = processor
        .process(UpdateStore {
            id,
            name: body.name,
            email: body.email,
            phone: body.phone,
            address: body.address,
            category: body.category,
            commission_rate: body.commission_rate,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Store"));
    }

    let store = processor
        .process(GetStoreById { id })
        .await?
        .ok_or(ApiError::NotFound("Store"))?;
    Ok(Json(Envelope::ok(to_response(&store))))
}

/// `PATCH /api/stores/{id}`
pub async fn toggle_active(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<ToggleActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(SetStoreActive {
            id,
            is_active: body.is_active,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Store"));
    }

    let store = processor
        .process(GetStoreById { id })
        .await?
        .ok_or(ApiError::NotFound("Store"))?;
    Ok(Json(Envelope::ok(to_response(&store))))
}

/// `DELETE /api/stores/{id}`. Refused while transactions reference the
/// store; soft delete otherwise.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    let has_transactions = processor
        .process(StoreHasTransactions { store_id: id })
        .await?;
    if has_transactions {
        return Err(ApiError::Dependency(
            "store has transactions and cannot be deleted".into(),
        ));
    }

    let affected = processor.process(SoftDeleteStore { id }).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Store"));
    }
    Ok(Json(Envelope::ok(serde_json::json!({"deleted": true}))))
}
