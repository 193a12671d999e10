//! Reward-type and reward-history resource objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::envelope::Pagination;
use super::statuses::RewardKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardTypeResponse {
    pub id: i64,
    pub name: String,
    pub kind: RewardKind,
    pub description: Option<String>,
    pub points: i32,
    pub value: Decimal,
    pub is_active: bool,
    /// Derived: times this reward has been granted.
    pub usage_count: i64,
    /// Derived: total points granted through this reward.
    pub points_awarded: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardStats {
    pub total_rewards: i64,
    pub active_rewards: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardListData {
    pub rewards: Vec<RewardTypeResponse>,
    pub pagination: Pagination,
    pub stats: RewardStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardDetailData {
    pub reward: RewardTypeResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRewardRequest {
    pub name: String,
    pub kind: RewardKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub points: Option<i32>,
    #[serde(default)]
    pub value: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRewardRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<RewardKind>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub points: Option<i32>,
    #[serde(default)]
    pub value: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Reward history (read-only)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardHistoryResponse {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub reward_type_id: i64,
    pub reward_name: String,
    pub points: i32,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardHistoryStats {
    pub total_points: i64,
    pub distinct_users: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardHistoryListData {
    pub history: Vec<RewardHistoryResponse>,
    pub pagination: Pagination,
    pub stats: RewardHistoryStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardHistoryDetailData {
    pub entry: RewardHistoryResponse,
}
