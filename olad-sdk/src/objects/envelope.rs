//! The uniform response envelope and pagination block.
//!
//! Every endpoint answers with the same wrapper:
//!
//! ```json
//! {"success": true,  "data": { "users": [...], "pagination": {...}, "stats": {...} }}
//! {"success": false, "message": "User not found"}
//! ```
//!
//! An empty list is a success with `total: 0`, never an error.

use serde::{Deserialize, Serialize};

/// The `{success, data|message}` wrapper returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Wrap a successful payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl Envelope<()> {
    /// Wrap a failure message. `data` is omitted entirely.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Pagination block attached to every list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Rows matching the filter, ignoring limit/offset.
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub items_per_page: i64,
}

impl Pagination {
    /// Derive the page numbers from a resolved `(limit, offset)` pair and the
    /// filtered total. `limit` is assumed already clamped to `>= 1`.
    pub fn new(total: i64, limit: i64, offset: i64) -> Self {
        Self {
            total,
            total_pages: (total + limit - 1) / limit,
            current_page: offset / limit + 1,
            items_per_page: limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_math() {
        let p = Pagination::new(12, 5, 0);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.current_page, 1);

        let p = Pagination::new(12, 5, 10);
        assert_eq!(p.current_page, 3);

        let p = Pagination::new(0, 20, 0);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.current_page, 1);

        // exact multiple must not round up to an extra page
        let p = Pagination::new(40, 20, 20);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.current_page, 2);
    }

    #[test]
    fn success_envelope_shape() {
        let json = serde_json::to_value(Envelope::ok(serde_json::json!({"users": []}))).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("message").is_none());
        assert!(json["data"]["users"].as_array().unwrap().is_empty());
    }

    #[test]
    fn failure_envelope_shape() {
        let json = serde_json::to_value(Envelope::fail("User not found")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "User not found");
        assert!(json.get("data").is_none());
    }
}
