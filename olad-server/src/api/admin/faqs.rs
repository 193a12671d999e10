//! FAQ resource handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;

use olad_core::entities::faqs::{
    CreateFaq, DeleteFaq, FAQ_FILTERS, FAQ_SORT, FaqRow, GetFaqById, ListFaqs, SetFaqActive,
    UpdateFaq,
};
use olad_sdk::objects::content::{
    CreateFaqRequest, FaqDetailData, FaqListData, FaqResponse, UpdateFaqRequest,
};
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::users::ToggleActiveRequest;

use super::{ListParams, created, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn to_response(r: &FaqRow) -> FaqResponse {
    FaqResponse {
        id: r.id,
        question: r.question.clone(),
        answer: r.answer.clone(),
        category: r.category.clone(),
        is_active: r.is_active,
        created_at: unix(r.created_at),
        updated_at: unix(r.updated_at),
    }
}

/// `GET /api/faqs`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) = list_inputs(&state, &params, &FAQ_FILTERS, &FAQ_SORT).await?;

    let result = state.processor().process(ListFaqs { filter, order, page }).await?;

    Ok(Json(Envelope::ok(FaqListData {
        faqs: result.rows.iter().map(to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
    })))
}

/// `GET /api/faqs/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let faq = state
        .processor()
        .process(GetFaqById { id })
        .await?
        .ok_or(ApiError::NotFound("FAQ"))?;

    Ok(Json(Envelope::ok(FaqDetailData {
        faq: to_response(&faq),
    })))
}

/// `POST /api/faqs`. New entries go to the end of the display order.
pub async fn create(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<CreateFaqRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.question.trim().is_empty() || body.answer.trim().is_empty() {
        return Err(ApiError::Validation("question and answer are required".into()));
    }

    let processor = state.processor();
    let id = processor
        .process(CreateFaq {
            question: body.question,
            answer: body.answer,
            category: body.category,
            display_order: None,
        })
        .await?;

    let faq = processor
        .process(GetFaqById { id })
        .await?
        .ok_or(ApiError::NotFound("FAQ"))?;
    Ok(created(to_response(&faq)))
}

/// `PUT /api/faqs/{id}`
pub async fn update(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateFaqRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(UpdateFaq {
            id,
            question: body.question,
            answer: body.answer,
            category: body.category,
            display_order: None,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("FAQ"));
    }

    let faq = processor
        .process(GetFaqById { id })
        .await?
        .ok_or(ApiError::NotFound("FAQ"))?;
    Ok(Json(Envelope::ok(to_response(&faq))))
}

/// `PATCH /api/faqs/{id}`
pub async fn toggle_active(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<ToggleActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(SetFaqActive {
            id,
            is_active: body.is_active,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("FAQ"));
    }

    let faq = processor
        .process(GetFaqById { id })
        .await?
        .ok_or(ApiError::NotFound("FAQ"))?;
    Ok(Json(Envelope::ok(to_response(&faq))))
}

/// `DELETE /api/faqs/{id}`, a hard delete.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let affected = state.processor().process(DeleteFaq { id }).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("FAQ"));
    }
    Ok(Json(Envelope::ok(serde_json::json!({"deleted": true}))))
}
