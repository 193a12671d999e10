//! Top-store ordering objects.

use serde::{Deserialize, Serialize};

use super::envelope::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopStoreResponse {
    pub id: i64,
    pub store_id: i64,
    pub store_name: String,
    pub store_category: Option<String>,
    pub sequence_no: i32,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopStoreListData {
    pub top_stores: Vec<TopStoreResponse>,
    pub pagination: Pagination,
}

/// Body for `POST /api/top-stores`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AddTopStoreRequest {
    pub store_id: i64,
    /// When absent the entry is appended after the current highest sequence.
    #[serde(default)]
    pub sequence_no: Option<i32>,
}

/// One `{id, sequence_no}` pair of a bulk reorder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SequenceEntry {
    pub id: i64,
    pub sequence_no: i32,
}

/// Body for `PUT /api/top-stores/sequence`. Applied all-or-nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub entries: Vec<SequenceEntry>,
}
