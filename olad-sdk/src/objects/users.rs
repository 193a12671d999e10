//! User resource objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::envelope::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub referral_code: String,
    pub is_active: bool,
    pub wallet_balance: Decimal,
    pub points_earned: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileResponse {
    pub address: Option<String>,
    pub city: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletResponse {
    pub balance: Decimal,
    pub lifetime_cashback: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total_users: i64,
    pub active_users: i64,
    pub new_this_month: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListData {
    pub users: Vec<UserResponse>,
    pub pagination: Pagination,
    pub stats: UserStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailData {
    pub user: UserResponse,
    pub profile: Option<UserProfileResponse>,
    pub wallet: Option<WalletResponse>,
}

/// Body for `POST /api/users`.
///
/// Profile fields are optional; a profile row is only created when at least
/// one of them is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Body for `PUT /api/users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body for `PATCH /api/<resource>/{id}` on any soft-toggled resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToggleActiveRequest {
    pub is_active: bool,
}
