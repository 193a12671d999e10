//! Legal document handlers. Each create starts a new version of its kind;
//! older versions stay queryable.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;

use olad_core::entities::terms::{
    CreateTerms, DeleteTerms, GetTermsById, ListTerms, SetTermsActive, TERMS_FILTERS,
    TERMS_SORT, TermsRow, UpdateTerms,
};
use olad_sdk::objects::content::{
    CreateTermsRequest, TermsDetailData, TermsListData, TermsResponse, UpdateTermsRequest,
};
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::users::ToggleActiveRequest;

use super::{ListParams, created, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn to_response(r: &TermsRow) -> TermsResponse {
    TermsResponse {
        id: r.id,
        title: r.title.clone(),
        content: r.body.clone(),
        kind: r.kind.into(),
        is_active: r.is_active,
        created_at: unix(r.created_at),
        updated_at: unix(r.updated_at),
    }
}

/// `GET /api/terms`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) = list_inputs(&state, &params, &TERMS_FILTERS, &TERMS_SORT).await?;

    let result = state.processor().process(ListTerms { filter, order, page }).await?;

    Ok(Json(Envelope::ok(TermsListData {
        terms: result.rows.iter().map(to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
    })))
}

/// `GET /api/terms/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let terms = state
        .processor()
        .process(GetTermsById { id })
        .await?
        .ok_or(ApiError::NotFound("Terms document"))?;

    Ok(Json(Envelope::ok(TermsDetailData {
        terms: to_response(&terms),
    })))
}

/// `POST /api/terms`
pub async fn create(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<CreateTermsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title.trim().is_empty() || body.content.trim().is_empty() {
        return Err(ApiError::Validation("title and content are required".into()));
    }

    let processor = state.processor();
    let id = processor
        .process(CreateTerms {
            kind: body.kind.into(),
            title: body.title,
            body: body.content,
        })
        .await?;

    let terms = processor
        .process(GetTermsById { id })
        .await?
        .ok_or(ApiError::NotFound("Terms document"))?;
    Ok(created(to_response(&terms)))
}

/// `PUT /api/terms/{id}`
pub async fn update(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTermsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(UpdateTerms {
            id,
            kind: body.kind.map(Into::into),
            title: body.title,
            body: body.content,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Terms document"));
    }

    let terms = processor
        .process(GetTermsById { id })
        .await?
        .ok_or(ApiError::NotFound("Terms document"))?;
    Ok(Json(Envelope::ok(to_response(&terms))))
}

/// `PATCH /api/terms/{id}`
pub async fn toggle_active(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<ToggleActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(SetTermsActive {
            id,
            is_active: body.is_active,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Terms document"));
    }

    let terms = processor
        .process(GetTermsById { id })
        .await?
        .ok_or(ApiError::NotFound("Terms document"))?;
    Ok(Json(Envelope::ok(to_response(&terms))))
}

/// `DELETE /api/terms/{id}`, a hard delete.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let affected = state.processor().process(DeleteTerms { id }).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Terms document"));
    }
    Ok(Json(Envelope::ok(serde_json::json!({"deleted": true}))))
}
