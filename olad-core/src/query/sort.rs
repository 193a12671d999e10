//! Sort-key resolution against a per-resource whitelist.
//!
//! `sort_by` values map to column expressions through a fixed table, so no
//! caller-supplied text ever reaches the ORDER BY clause.

use super::filter::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Whitelisted sort keys for one resource, plus the default ordering used
/// when the caller does not sort explicitly.
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    /// `(query-string key, column expression)` pairs.
    pub allowed: &'static [(&'static str, &'static str)],
    /// Full default clause, e.g. `"u.created_at DESC"`.
    pub default: &'static str,
}

/// A validated ORDER BY clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy(String);

impl OrderBy {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SortSpec {
    /// Resolve `sort_by`/`order`. An absent or empty `sort_by` yields the
    /// default clause; an explicit key defaults to ascending.
    pub fn resolve(
        &self,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> Result<OrderBy, FilterError> {
        let key = sort_by.map(str::trim).filter(|s| !s.is_empty());
        let Some(key) = key else {
            return Ok(OrderBy(self.default.to_owned()));
        };

        let column = self
            .allowed
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, column)| *column)
            .ok_or_else(|| FilterError::UnknownSortKey(key.to_owned()))?;

        let dir = match order.map(str::trim).filter(|s| !s.is_empty()) {
            None => SortDir::Asc,
            Some(o) if o.eq_ignore_ascii_case("asc") => SortDir::Asc,
            Some(o) if o.eq_ignore_ascii_case("desc") => SortDir::Desc,
            Some(o) => return Err(FilterError::InvalidSortOrder(o.to_owned())),
        };

        Ok(OrderBy(format!("{column} {}", dir.as_sql())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: SortSpec = SortSpec {
        allowed: &[("name", "u.first_name"), ("created_at", "u.created_at")],
        default: "u.created_at DESC",
    };

    #[test]
    fn default_when_unspecified() {
        assert_eq!(SPEC.resolve(None, None).unwrap().as_str(), "u.created_at DESC");
        assert_eq!(SPEC.resolve(Some(""), Some("desc")).unwrap().as_str(), "u.created_at DESC");
    }

    #[test]
    fn explicit_key_and_direction() {
        assert_eq!(
            SPEC.resolve(Some("name"), Some("DESC")).unwrap().as_str(),
            "u.first_name DESC"
        );
        assert_eq!(SPEC.resolve(Some("name"), None).unwrap().as_str(), "u.first_name ASC");
    }

    #[test]
    fn rejects_unknown_key_and_direction() {
        assert_eq!(
            SPEC.resolve(Some("password"), None).unwrap_err(),
            FilterError::UnknownSortKey("password".to_owned())
        );
        assert_eq!(
            SPEC.resolve(Some("name"), Some("sideways")).unwrap_err(),
            FilterError::InvalidSortOrder("sideways".to_owned())
        );
    }
}
