//! Store resource objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::envelope::Pagination;
use super::transactions::TransactionResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResponse {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub commission_rate: Decimal,
    pub is_active: bool,
    /// Derived: number of transactions recorded against this store.
    pub transaction_count: i64,
    /// Derived: gross transaction volume for this store.
    pub revenue: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_stores: i64,
    pub active_stores: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreListData {
    pub stores: Vec<StoreResponse>,
    pub pagination: Pagination,
    pub stats: StoreStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDetailData {
    pub store: StoreResponse,
    pub recent_transactions: Vec<TransactionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStoreRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub commission_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStoreRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub commission_rate: Option<Decimal>,
}
