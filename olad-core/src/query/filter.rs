//! Filter compilation: raw query-string values → WHERE fragment + binds.
//!
//! Each resource declares a [`FilterSpec`] mapping accepted parameters to
//! predicate operators. [`compile`] walks the spec in order, so a given
//! parameter set always produces the same SQL text and the same bind order,
//! and the resulting [`WhereClause`] is applied verbatim to both the count
//! query and the data query.
//!
//! An absent parameter and an empty-string parameter both mean "no filter";
//! `status=''` must never become a filter for the empty string.

use std::collections::HashMap;

use sqlx::{Postgres, QueryBuilder};

/// How a raw string value is turned into a typed bind.
#[derive(Debug, Clone, Copy)]
pub enum Coercion {
    Text,
    Int,
    /// Accepts `1`/`0`, `true`/`false`, `active`/`inactive`.
    Bool,
    /// Closed set of allowed values; anything else is a validation error.
    /// The column is compared as `column::text`.
    Enum(&'static [&'static str]),
}

/// Predicate operator for one accepted parameter.
#[derive(Debug, Clone, Copy)]
pub enum FilterOp {
    /// `(c1 ILIKE $n OR c2 ILIKE $n+1 ...)`; the escaped `%term%` pattern
    /// is bound once per column.
    Search { columns: &'static [&'static str] },
    Equals {
        column: &'static str,
        coerce: Coercion,
    },
    /// `DATE(column) >= $n`, value parsed as `YYYY-MM-DD`.
    DateFrom { column: &'static str },
    /// `DATE(column) <= $n`, value parsed as `YYYY-MM-DD`.
    DateTo { column: &'static str },
}

/// One accepted query-string parameter.
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub param: &'static str,
    pub op: FilterOp,
}

/// Ordered, table-specific set of accepted parameters.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub fields: &'static [FilterField],
}

/// Rejected filter input. Detected before any query executes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("invalid value for '{param}': expected an integer")]
    InvalidInt { param: &'static str },
    #[error("invalid value for '{param}': expected a boolean")]
    InvalidBool { param: &'static str },
    #[error("invalid value for '{param}': expected a date in YYYY-MM-DD form")]
    InvalidDate { param: &'static str },
    #[error("invalid value for '{param}': must be one of {allowed:?}")]
    InvalidEnum {
        param: &'static str,
        allowed: &'static [&'static str],
    },
    #[error("unknown sort key '{0}'")]
    UnknownSortKey(String),
    #[error("invalid sort order '{0}': expected 'asc' or 'desc'")]
    InvalidSortOrder(String),
}

/// A typed positional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bind {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(time::Date),
}

impl Bind {
    fn push_to(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Bind::Text(v) => qb.push_bind(v.clone()),
            Bind::Int(v) => qb.push_bind(*v),
            Bind::Bool(v) => qb.push_bind(*v),
            Bind::Date(v) => qb.push_bind(*v),
        };
    }
}

#[derive(Debug, Clone)]
enum Piece {
    Sql(String),
    Bind(Bind),
}

/// A compiled WHERE fragment: predicate SQL interleaved with ordered binds.
///
/// Applying it to two different builders yields byte-identical predicate
/// text and the same bind sequence, which is what keeps pagination totals
/// consistent with the fetched page.
#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    predicates: Vec<Vec<Piece>>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Append a fixed predicate with no binds (scoping like
    /// `u.is_deleted = FALSE`).
    pub fn and_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.predicates.push(vec![Piece::Sql(sql.into())]);
        self
    }

    /// Append `column = $n` with an integer bind (id scoping).
    pub fn and_eq_i64(&mut self, column: &str, value: i64) -> &mut Self {
        self.predicates.push(vec![
            Piece::Sql(format!("{column} = ")),
            Piece::Bind(Bind::Int(value)),
        ]);
        self
    }

    /// Push ` WHERE p1 AND p2 ...` onto the builder. No-op when empty.
    pub fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            for piece in predicate {
                match piece {
                    Piece::Sql(sql) => {
                        qb.push(sql.as_str());
                    }
                    Piece::Bind(bind) => bind.push_to(qb),
                }
            }
        }
    }

    fn push_predicate(&mut self, pieces: Vec<Piece>) {
        self.predicates.push(pieces);
    }
}

/// Compile raw query-string values against a spec.
///
/// Parameters the spec does not name are ignored (`limit`, `sort_by`, ...
/// are handled elsewhere); named parameters with unusable values fail.
pub fn compile(
    spec: &FilterSpec,
    params: &HashMap<String, String>,
) -> Result<WhereClause, FilterError> {
    let mut clause = WhereClause::new();

    for field in spec.fields {
        let Some(raw) = params.get(field.param) else {
            continue;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        match field.op {
            FilterOp::Search { columns } => {
                let pattern = format!("%{}%", escape_like(raw));
                let mut pieces = Vec::with_capacity(columns.len() * 2 + 1);
                for (i, column) in columns.iter().enumerate() {
                    let lead = if i == 0 { "(" } else { " OR " };
                    pieces.push(Piece::Sql(format!("{lead}{column} ILIKE ")));
                    pieces.push(Piece::Bind(Bind::Text(pattern.clone())));
                }
                pieces.push(Piece::Sql(")".to_owned()));
                clause.push_predicate(pieces);
            }
            FilterOp::Equals { column, coerce } => {
                let (lhs, bind) = coerce_value(field.param, column, coerce, raw)?;
                clause.push_predicate(vec![Piece::Sql(lhs), Piece::Bind(bind)]);
            }
            FilterOp::DateFrom { column } => {
                let date = parse_date(raw).ok_or(FilterError::InvalidDate { param: field.param })?;
                clause.push_predicate(vec![
                    Piece::Sql(format!("DATE({column}) >= ")),
                    Piece::Bind(Bind::Date(date)),
                ]);
            }
            FilterOp::DateTo { column } => {
                let date = parse_date(raw).ok_or(FilterError::InvalidDate { param: field.param })?;
                clause.push_predicate(vec![
                    Piece::Sql(format!("DATE({column}) <= ")),
                    Piece::Bind(Bind::Date(date)),
                ]);
            }
        }
    }

    Ok(clause)
}

fn coerce_value(
    param: &'static str,
    column: &str,
    coerce: Coercion,
    raw: &str,
) -> Result<(String, Bind), FilterError> {
    match coerce {
        Coercion::Text => Ok((format!("{column} = "), Bind::Text(raw.to_owned()))),
        Coercion::Int => {
            let value: i64 = raw
                .parse()
                .map_err(|_| FilterError::InvalidInt { param })?;
            Ok((format!("{column} = "), Bind::Int(value)))
        }
        Coercion::Bool => {
            let value = match raw {
                "1" | "true" | "active" => true,
                "0" | "false" | "inactive" => false,
                _ => return Err(FilterError::InvalidBool { param }),
            };
            Ok((format!("{column} = "), Bind::Bool(value)))
        }
        Coercion::Enum(allowed) => {
            if !allowed.contains(&raw) {
                return Err(FilterError::InvalidEnum { param, allowed });
            }
            // Enum columns are Postgres enums; compare their text form so the
            // bind can stay a plain TEXT parameter.
            Ok((format!("{column}::text = "), Bind::Text(raw.to_owned())))
        }
    }
}

/// Escape `LIKE` wildcards so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Strict `YYYY-MM-DD`. Also used by handlers that take calendar dates in
/// request bodies.
pub fn parse_date(raw: &str) -> Option<time::Date> {
    let mut parts = raw.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;
    let month = time::Month::try_from(month).ok()?;
    time::Date::from_calendar_date(year, month, day).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: FilterSpec = FilterSpec {
        fields: &[
            FilterField {
                param: "search",
                op: FilterOp::Search {
                    columns: &["u.first_name", "u.email"],
                },
            },
            FilterField {
                param: "status",
                op: FilterOp::Equals {
                    column: "u.is_active",
                    coerce: Coercion::Bool,
                },
            },
            FilterField {
                param: "store_id",
                op: FilterOp::Equals {
                    column: "t.store_id",
                    coerce: Coercion::Int,
                },
            },
            FilterField {
                param: "settlement_status",
                op: FilterOp::Equals {
                    column: "s.status",
                    coerce: Coercion::Enum(&["pending", "completed"]),
                },
            },
            FilterField {
                param: "date_from",
                op: FilterOp::DateFrom {
                    column: "u.created_at",
                },
            },
            FilterField {
                param: "date_to",
                op: FilterOp::DateTo {
                    column: "u.created_at",
                },
            },
        ],
    };

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn rendered(clause: &WhereClause) -> String {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM users u");
        clause.apply(&mut qb);
        qb.sql().to_owned()
    }

    #[test]
    fn no_params_compiles_to_no_where() {
        let clause = compile(&SPEC, &params(&[])).unwrap();
        assert!(clause.is_empty());
        assert_eq!(rendered(&clause), "SELECT COUNT(*) FROM users u");
    }

    #[test]
    fn search_binds_once_per_column() {
        let clause = compile(&SPEC, &params(&[("search", "coffee")])).unwrap();
        assert_eq!(
            rendered(&clause),
            "SELECT COUNT(*) FROM users u WHERE (u.first_name ILIKE $1 OR u.email ILIKE $2)"
        );
    }

    #[test]
    fn empty_string_means_no_filter() {
        let clause = compile(&SPEC, &params(&[("status", ""), ("search", "  ")])).unwrap();
        assert!(clause.is_empty());
    }

    #[test]
    fn bool_coercion_accepts_active_inactive() {
        let clause = compile(&SPEC, &params(&[("status", "active")])).unwrap();
        assert_eq!(
            rendered(&clause),
            "SELECT COUNT(*) FROM users u WHERE u.is_active = $1"
        );

        let err = compile(&SPEC, &params(&[("status", "yes")])).unwrap_err();
        assert_eq!(err, FilterError::InvalidBool { param: "status" });
    }

    #[test]
    fn int_coercion_rejects_garbage() {
        let err = compile(&SPEC, &params(&[("store_id", "abc")])).unwrap_err();
        assert_eq!(err, FilterError::InvalidInt { param: "store_id" });
    }

    #[test]
    fn enum_validates_against_closed_set() {
        let clause = compile(&SPEC, &params(&[("settlement_status", "pending")])).unwrap();
        assert_eq!(
            rendered(&clause),
            "SELECT COUNT(*) FROM users u WHERE s.status::text = $1"
        );

        let err = compile(&SPEC, &params(&[("settlement_status", "done")])).unwrap_err();
        assert!(matches!(err, FilterError::InvalidEnum { param: "settlement_status", .. }));
    }

    #[test]
    fn date_bounds_combine_independently() {
        let clause = compile(
            &SPEC,
            &params(&[("date_from", "2024-01-01"), ("date_to", "2024-02-29")]),
        )
        .unwrap();
        assert_eq!(
            rendered(&clause),
            "SELECT COUNT(*) FROM users u WHERE DATE(u.created_at) >= $1 AND DATE(u.created_at) <= $2"
        );

        let err = compile(&SPEC, &params(&[("date_from", "2023-02-29")])).unwrap_err();
        assert_eq!(err, FilterError::InvalidDate { param: "date_from" });
    }

    #[test]
    fn fragment_is_identical_for_count_and_data_queries() {
        let clause = compile(
            &SPEC,
            &params(&[("search", "a"), ("status", "1"), ("date_from", "2024-06-01")]),
        )
        .unwrap();

        let count = rendered(&clause);
        let mut data_qb = QueryBuilder::new("SELECT u.id FROM users u");
        clause.apply(&mut data_qb);

        let count_where = count.split_once(" WHERE ").unwrap().1.to_owned();
        let data_where = data_qb.sql().split_once(" WHERE ").unwrap().1.to_owned();
        assert_eq!(count_where, data_where);
    }

    #[test]
    fn raw_and_id_predicates_compose() {
        let mut clause = compile(&SPEC, &params(&[("status", "1")])).unwrap();
        clause.and_raw("u.is_deleted = FALSE");
        clause.and_eq_i64("u.id", 7);
        assert_eq!(
            rendered(&clause),
            "SELECT COUNT(*) FROM users u WHERE u.is_active = $1 AND u.is_deleted = FALSE AND u.id = $2"
        );
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn spec_order_fixes_bind_order() {
        // Same params in a different HashMap insertion order compile to the
        // same SQL because the spec drives iteration.
        let a = compile(&SPEC, &params(&[("status", "1"), ("search", "x")])).unwrap();
        let b = compile(&SPEC, &params(&[("search", "x"), ("status", "1")])).unwrap();
        assert_eq!(rendered(&a), rendered(&b));
    }
}
