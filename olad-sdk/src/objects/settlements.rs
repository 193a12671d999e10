//! Settlement resource objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::envelope::Pagination;
use super::statuses::SettlementStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResponse {
    pub id: i64,
    pub store_id: i64,
    pub store_name: String,
    pub amount: Decimal,
    pub status: SettlementStatus,
    /// `YYYY-MM-DD` period bounds.
    pub period_start: String,
    pub period_end: String,
    pub settled_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementStats {
    pub pending_amount: Decimal,
    pub completed_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementListData {
    pub settlements: Vec<SettlementResponse>,
    pub pagination: Pagination,
    pub stats: SettlementStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementDetailData {
    pub settlement: SettlementResponse,
}

/// Body for `PATCH /api/settlements/{id}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateSettlementStatusRequest {
    pub status: SettlementStatus,
}
