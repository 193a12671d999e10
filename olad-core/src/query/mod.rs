//! The generic list-query engine.
//!
//! Every list endpoint follows the same path: raw query-string values are
//! compiled against a per-resource [`FilterSpec`](filter::FilterSpec) into a
//! [`WhereClause`](filter::WhereClause), limit/offset are clamped into a
//! [`PageRequest`](page::PageRequest), the sort key is resolved against a
//! whitelist, and [`ListQuery::fetch`](list::ListQuery::fetch) runs a count
//! query and a data query sharing the identical WHERE fragment.
//!
//! Derived per-entity metrics are attached through pre-aggregated `LEFT JOIN`
//! subqueries declared on the [`ListQuery`](list::ListQuery), so the join
//! fan-out can never duplicate base rows.

pub mod filter;
pub mod list;
pub mod page;
pub mod sort;

pub use filter::{
    Coercion, FilterError, FilterField, FilterOp, FilterSpec, WhereClause, compile, parse_date,
};
pub use list::{ListQuery, PageResult};
pub use page::PageRequest;
pub use sort::{OrderBy, SortDir, SortSpec};
