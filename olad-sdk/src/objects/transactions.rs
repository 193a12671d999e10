//! Transaction resource objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::envelope::Pagination;
use super::statuses::{PaymentStatus, TransactionStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub txn_ref: String,
    pub user_id: i64,
    pub user_name: String,
    pub store_id: i64,
    pub store_name: String,
    pub amount: Decimal,
    pub cashback_amount: Decimal,
    pub status: TransactionStatus,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStats {
    pub today_count: i64,
    pub today_amount: Decimal,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionListData {
    pub transactions: Vec<TransactionResponse>,
    pub pagination: Pagination,
    pub stats: TransactionStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetailData {
    pub transaction: TransactionResponse,
}

/// Body for `PATCH /api/transactions/{id}`.
///
/// At least one of the two fields must be present.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UpdateTransactionStatusRequest {
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}
