//! Promotional video handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;

use olad_core::entities::videos::{
    CreateVideo, DeleteVideo, GetVideoById, ListVideos, SetVideoActive, UpdateVideo,
    VIDEO_FILTERS, VIDEO_SORT, VideoRow,
};
use olad_sdk::objects::content::{
    CreateVideoRequest, UpdateVideoRequest, VideoDetailData, VideoListData, VideoResponse,
};
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::users::ToggleActiveRequest;

use super::{ListParams, created, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn to_response(r: &VideoRow) -> VideoResponse {
    VideoResponse {
        id: r.id,
        title: r.title.clone(),
        url: r.video_url.clone(),
        thumbnail_url: r.thumbnail_url.clone(),
        is_active: r.is_active,
        created_at: unix(r.created_at),
        updated_at: unix(r.updated_at),
    }
}

/// `GET /api/videos`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) = list_inputs(&state, &params, &VIDEO_FILTERS, &VIDEO_SORT).await?;

    let result = state.processor().process(ListVideos { filter, order, page }).await?;

    Ok(Json(Envelope::ok(VideoListData {
        videos: result.rows.iter().map(to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
    })))
}

/// `GET /api/videos/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let video = state
        .processor()
        .process(GetVideoById { id })
        .await?
        .ok_or(ApiError::NotFound("Video"))?;

    Ok(Json(Envelope::ok(VideoDetailData {
        video: to_response(&video),
    })))
}

/// `POST /api/videos`. New videos go to the end of the display order.
pub async fn create(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<CreateVideoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title.trim().is_empty() || body.url.trim().is_empty() {
        return Err(ApiError::Validation("title and url are required".into()));
    }

    let processor = state.processor();
    let id = processor
        .process(CreateVideo {
            title: body.title,
            description: None,
            video_url: body.url,
            thumbnail_url: body.thumbnail_url,
            display_order: None,
        })
        .await?;

    let video = processor
        .process(GetVideoById { id })
        .await?
        .ok_or(ApiError::NotFound("Video"))?;
    Ok(created(to_response(&video)))
}

/// `PUT /api/videos/{id}`
pub async fn update(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateVideoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(UpdateVideo {
            id,
            title: body.title,
            description: None,
            video_url: body.url,
            thumbnail_url: body.thumbnail_url,
            display_order: None,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Video"));
    }

    let video = processor
        .process(GetVideoById { id })
        .await?
        .ok_or(ApiError::NotFound("Video"))?;
    Ok(Json(Envelope::ok(to_response(&video))))
}

/// `PATCH /api/videos/{id}`
pub async fn toggle_active(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<ToggleActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(SetVideoActive {
            id,
            is_active: body.is_active,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Video"));
    }

    let video = processor
        .process(GetVideoById { id })
        .await?
        .ok_or(ApiError::NotFound("Video"))?;
    Ok(Json(Envelope::ok(to_response(&video))))
}

/// `DELETE /api/videos/{id}`, a hard delete.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let affected = state.processor().process(DeleteVideo { id }).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Video"));
    }
    Ok(Json(Envelope::ok(serde_json::json!({"deleted": true}))))
}
