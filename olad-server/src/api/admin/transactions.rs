//! Transaction resource handlers.
//!
//! Transactions are written by the consumer platform; here they are listed
//! and their statuses adjusted.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;

use olad_core::entities::transactions::{
    GetTransactionById, GetTransactionStats, ListTransactions, SetTransactionStatus,
    TRANSACTION_FILTERS, TRANSACTION_SORT, TransactionRow,
};
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::transactions::{
    TransactionDetailData, TransactionListData, TransactionResponse, TransactionStats,
    UpdateTransactionStatusRequest,
};

use super::{ListParams, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

pub(crate) fn transaction_to_response(r: &TransactionRow) -> TransactionResponse {
    TransactionResponse {
        id: r.id,
        txn_ref: r.txn_ref.clone(),
        user_id: r.user_id,
        user_name: r.user_name.clone(),
        store_id: r.store_id,
        store_name: r.store_name.clone(),
        amount: r.amount,
        cashback_amount: r.cashback_amount,
        status: r.status.into(),
        payment_status: r.payment_status.into(),
        created_at: unix(r.created_at),
        updated_at: unix(r.updated_at),
    }
}

/// `GET /api/transactions`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) =
        list_inputs(&state, &params, &TRANSACTION_FILTERS, &TRANSACTION_SORT).await?;
    let processor = state.processor();

    let result = processor
        .process(ListTransactions { filter, order, page })
        .await?;
    let stats = processor.process(GetTransactionStats).await?;

    Ok(Json(Envelope::ok(TransactionListData {
        transactions: result.rows.iter().map(transaction_to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
        stats: TransactionStats {
            today_count: stats.today_count,
            today_amount: stats.today_amount,
            total_amount: stats.total_amount,
        },
    })))
}

/// `GET /api/transactions/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = state
        .processor()
        .process(GetTransactionById { id })
        .await?
        .ok_or(ApiError::NotFound("Transaction"))?;

    Ok(Json(Envelope::ok(TransactionDetailData {
        transaction: transaction_to_response(&transaction),
    })))
}

/// `PATCH /api/transactions/{id}`: set one or both status columns.
pub async fn update_status(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTransactionStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.status.is_none() && body.payment_status.is_none() {
        return Err(ApiError::Validation(
            "status or payment_status is required".into(),
        ));
    }

    let processor = state.processor();
    let affected = processor
        .process(SetTransactionStatus {
            id,
            status: body.status.map(Into::into),
            payment_status: body.payment_status.map(Into::into),
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Transaction"));
    }

    let transaction = processor
        .process(GetTransactionById { id })
        .await?
        .ok_or(ApiError::NotFound("Transaction"))?;
    Ok(Json(Envelope::ok(TransactionDetailData {
        transaction: transaction_to_response(&transaction),
    })))
}
