//! User resource handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;

use olad_core::entities::users::{
    CreateUser, GetUserById, GetUserProfile, GetUserStats, GetUserWallet, ListUsers,
    ProfileInsert, SetUserActive, SoftDeleteUser, USER_FILTERS, USER_SORT, UpdateUser,
    UserEmailOrPhoneExists, UserProfileRow, UserRow, WalletRow, generate_referral_code,
};
use olad_core::query::parse_date;
use olad_sdk::objects::envelope::{Envelope, Pagination};
use olad_sdk::objects::users::{
    CreateUserRequest, ToggleActiveRequest, UpdateUserRequest, UserDetailData, UserListData,
    UserProfileResponse, UserResponse, UserStats, WalletResponse,
};

use super::{ListParams, created, list_inputs, unix};
use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn to_response(r: &UserRow) -> UserResponse {
    UserResponse {
        id: r.id,
        first_name: r.first_name.clone(),
        last_name: r.last_name.clone(),
        email: r.email.clone(),
        phone: r.phone.clone(),
        referral_code: r.referral_code.clone(),
        is_active: r.is_active,
        wallet_balance: r.wallet_balance,
        points_earned: r.points_earned,
        created_at: unix(r.created_at),
        updated_at: unix(r.updated_at),
    }
}

fn profile_to_response(p: &UserProfileRow) -> UserProfileResponse {
    UserProfileResponse {
        address: p.address.clone(),
        city: p.city.clone(),
        date_of_birth: p.date_of_birth.map(|d| d.to_string()),
        gender: p.gender.clone(),
    }
}

fn wallet_to_response(w: &WalletRow) -> WalletResponse {
    WalletResponse {
        balance: w.balance,
        lifetime_cashback: w.lifetime_cashback,
    }
}

/// `GET /api/users`
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, order, page) = list_inputs(&state, &params, &USER_FILTERS, &USER_SORT).await?;
    let processor = state.processor();

    let result = processor.process(ListUsers { filter, order, page }).await?;
    // Stats are unfiltered on purpose: the dashboard shows headline numbers
    // next to whatever slice is on screen.
    let stats = processor.process(GetUserStats).await?;

    Ok(Json(Envelope::ok(UserListData {
        users: result.rows.iter().map(to_response).collect(),
        pagination: Pagination::new(result.total, page.limit, page.offset),
        stats: UserStats {
            total_users: stats.total_users,
            active_users: stats.active_users,
            new_this_month: stats.new_this_month,
        },
    })))
}

/// `GET /api/users/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    let user = processor
        .process(GetUserById { id })
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    let profile = processor.process(GetUserProfile { user_id: id }).await?;
    let wallet = processor.process(GetUserWallet { user_id: id }).await?;

    Ok(Json(Envelope::ok(UserDetailData {
        user: to_response(&user),
        profile: profile.as_ref().map(profile_to_response),
        wallet: wallet.as_ref().map(wallet_to_response),
    })))
}

/// `POST /api/users`
pub async fn create(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.first_name.trim().is_empty() || body.last_name.trim().is_empty() {
        return Err(ApiError::Validation("first and last name are required".into()));
    }
    if body.email.trim().is_empty() || body.phone.trim().is_empty() {
        return Err(ApiError::Validation("email and phone are required".into()));
    }
    let date_of_birth = match &body.date_of_birth {
        Some(raw) => Some(
            parse_date(raw)
                .ok_or_else(|| ApiError::Validation("date_of_birth must be YYYY-MM-DD".into()))?,
        ),
        None => None,
    };

    let processor = state.processor();

    let duplicate = processor
        .process(UserEmailOrPhoneExists {
            email: body.email.clone(),
            phone: body.phone.clone(),
            exclude_id: None,
        })
        .await?;
    if duplicate {
        return Err(ApiError::Conflict(
            "a user with that email or phone already exists".into(),
        ));
    }

    let id = processor
        .process(CreateUser {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone: body.phone,
            referral_code: generate_referral_code(),
            profile: Some(ProfileInsert {
                address: body.address,
                city: body.city,
                date_of_birth,
                gender: body.gender,
            }),
        })
        .await?;

    let user = processor
        .process(GetUserById { id })
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(created(to_response(&user)))
}

/// `PUT /api/users/{id}`
pub async fn update(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    let current = processor
        .process(GetUserById { id })
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    // Uniqueness re-check with the row's own values filled in for absent
    // fields, excluding the row itself.
    let duplicate = processor
        .process(UserEmailOrPhoneExists {
            email: body.email.clone().unwrap_or(current.email),
            phone: body.phone.clone().unwrap_or(current.phone),
            exclude_id: Some(id),
        })
        .await?;
    if duplicate {
        return Err(ApiError::Conflict(
            "a user with that email or phone already exists".into(),
        ));
    }

    let affected = processor
        .process(UpdateUser {
            id,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone: body.phone,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("User"));
    }

    let user = processor
        .process(GetUserById { id })
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(Envelope::ok(to_response(&user))))
}

/// `PATCH /api/users/{id}`
pub async fn toggle_active(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<ToggleActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    let affected = processor
        .process(SetUserActive {
            id,
            is_active: body.is_active,
        })
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("User"));
    }

    let user = processor
        .process(GetUserById { id })
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(Envelope::ok(to_response(&user))))
}

/// `DELETE /api/users/{id}`: soft delete; the row stays for history joins.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let affected = state.processor().process(SoftDeleteUser { id }).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("User"));
    }
    Ok(Json(Envelope::ok(serde_json::json!({"deleted": true}))))
}
