//! Limit/offset normalization.

use std::collections::HashMap;

/// Hard ceiling on offsets, matching the rest of the clamping policy.
pub const MAX_OFFSET: i64 = 100_000;

/// A resolved `LIMIT ? OFFSET ?` pair. Always bound as parameters.
///
/// All listing is offset-based; deep pages over a table that is being
/// written to concurrently can show duplicate or skipped rows. That is an
/// accepted property of offset pagination, not something this layer hides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    /// Clamp `limit` to `[1, max_limit]` and `offset` to `[0, MAX_OFFSET]`.
    pub fn resolve(limit: i64, offset: i64, max_limit: i64) -> Self {
        Self {
            limit: limit.clamp(1, max_limit.max(1)),
            offset: offset.clamp(0, MAX_OFFSET),
        }
    }

    /// Read `limit`/`offset` from raw query parameters. Unparseable values
    /// fall back to the defaults rather than failing the request.
    pub fn from_params(
        params: &HashMap<String, String>,
        default_limit: i64,
        max_limit: i64,
    ) -> Self {
        let limit = params
            .get("limit")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default_limit);
        let offset = params
            .get("offset")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        Self::resolve(limit, offset, max_limit)
    }

    pub fn current_page(&self) -> i64 {
        self.offset / self.limit + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_limit_and_offset() {
        assert_eq!(PageRequest::resolve(0, 0, 100), PageRequest { limit: 1, offset: 0 });
        assert_eq!(PageRequest::resolve(-5, -3, 100), PageRequest { limit: 1, offset: 0 });
        assert_eq!(
            PageRequest::resolve(500, 10, 100),
            PageRequest { limit: 100, offset: 10 }
        );
        assert_eq!(PageRequest::resolve(20, 9_999_999, 100).offset, MAX_OFFSET);
    }

    #[test]
    fn unparseable_params_fall_back_to_defaults() {
        let params: HashMap<String, String> = [("limit", "abc"), ("offset", "-")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(
            PageRequest::from_params(&params, 20, 100),
            PageRequest { limit: 20, offset: 0 }
        );
    }

    #[test]
    fn current_page_math() {
        assert_eq!(PageRequest { limit: 5, offset: 0 }.current_page(), 1);
        assert_eq!(PageRequest { limit: 5, offset: 5 }.current_page(), 2);
        assert_eq!(PageRequest { limit: 5, offset: 7 }.current_page(), 2);
    }
}
