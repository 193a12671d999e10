//! Survey resource handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;

use olad_core::entities::surveys::{
    CreateSurvey, GetSurveyById, GetSurveyStats, ListSurveyQuestions, ListSurveys,
    QuestionInsert, SURVEY_FILTERS, SURVEY_SORT, SetSurveyActive, SoftDeleteSurvey,
    SurveyHasResponses, SurveyQuestionRow, SurveyRow, UpdateSurvey,
};
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::surveys::{
    CreateSurveyRequest, SurveyDetailData, SurveyListData, SurveyQuestionResponse,
    SurveyResponse, SurveyStats, UpdateSurveyRequest,
};
use olad_sdk::objects::users::ToggleActiveRequest;

use super::{ListParams, created, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn to_response(r: &SurveyRow) -> SurveyResponse {
    SurveyResponse {
        id: r.id,
        title: r.title.clone(),
        description: r.description.clone(),
        is_active: r.is_active,
        question_count: r.question_count,
        response_count: r.response_count,
        created_at: unix(r.created_at),
        updated_at: unix(r.updated_at),
    }
}

fn question_to_response(q: &SurveyQuestionRow) -> SurveyQuestionResponse {
    SurveyQuestionResponse {
        id: q.id,
        question: q.question.clone(),
        question_type: q.question_type.clone(),
        display_order: q.display_order,
    }
}

/// `GET /api/surveys`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) =
        list_inputs(&state, &params, &SURVEY_FILTERS, &SURVEY_SORT).await?;
    let processor = state.processor();

    let result = processor.process(ListSurveys { filter, order, page }).await?;
    let stats = processor.process(GetSurveyStats).await?;

    Ok(Json(Envelope::ok(SurveyListData {
        surveys: result.rows.iter().map(to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
        stats: SurveyStats {
            total_surveys: stats.total_surveys,
            active_surveys: stats.active_surveys,
        },
    })))
}

/// `GET /api/surveys/{id}` with the ordered question list.
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    let survey = processor
        .process(GetSurveyById { id })
        .await?
        .ok_or(ApiError::NotFound("Survey"))?;
    let questions = processor.process(ListSurveyQuestions { survey_id: id }).await?;

    Ok(Json(Envelope::ok(SurveyDetailData {
        survey: to_response(&survey),
        questions: questions.iter().map(question_to_response).collect(),
    })))
}

/// `POST /api/surveys`: survey plus questions in one transaction.
pub async fn create(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<CreateSurveyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::Validation("survey title is required".into()));
    }
    if body.questions.iter().any(|q| q.question.trim().is_empty()) {
        return Err(ApiError::Validation("question text must not be empty".into()));
    }

    let questions = body
        .questions
        .into_iter()
        .map(|q| QuestionInsert {
            question: q.question,
            question_type: q.question_type.unwrap_or_else(|| "text".into()),
            display_order: q.display_order,
        })
        .collect();

    let processor = state.processor();
    let id = processor
        .process(CreateSurvey {
            title: body.title,
            description: body.description,
            questions,
        })
        .await?;

    let survey = processor
        .process(GetSurveyById { id })
        .await?
        .ok_or(ApiError::NotFound("Survey"))?;
    Ok(created(to_response(&survey)))
}

/// `PUT /api/surveys/{id}`: title and description only; questions are
/// immutable once a survey exists.
pub async fn update(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateSurveyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(UpdateSurvey {
            id,
            title: body.title,
            description: body.description,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Survey"));
    }

    let survey = processor
        .process(GetSurveyById { id })
        .await?
        .ok_or(ApiError::NotFound("Survey"))?;
    Ok(Json(Envelope::ok(to_response(&survey))))
}

/// `PATCH /api/surveys/{id}`
pub async fn toggle_active(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<ToggleActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(SetSurveyActive {
            id,
            is_active: body.is_active,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Survey"));
    }

    let survey = processor
        .process(GetSurveyById { id })
        .await?
        .ok_or(ApiError::NotFound("Survey"))?;
    Ok(Json(Envelope::ok(to_response(&survey))))
}

/// `DELETE /api/surveys/{id}`. Refused while responses exist; soft delete
/// otherwise.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    let has_responses = processor.process(SurveyHasResponses { survey_id: id }).await?;
    if has_responses {
        return Err(ApiError::Dependency(
            "survey has responses and cannot be deleted".into(),
        ));
    }

    let affected = processor.process(SoftDeleteSurvey { id }).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Survey"));
    }
    Ok(Json(Envelope::ok(serde_json::json!({"deleted": true}))))
}
