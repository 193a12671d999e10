//! Pagination limits.

/// Clamping bounds applied by every list endpoint.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    /// Page size used when the caller sends none.
    pub default_limit: i64,
    /// Upper clamp for caller-supplied page sizes.
    pub max_limit: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}
