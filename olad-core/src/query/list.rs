//! The list runner: count + page fetch over one shared WHERE fragment.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::filter::WhereClause;
use super::page::PageRequest;
use super::sort::OrderBy;

/// Declarative SELECT source for one resource's list endpoint.
///
/// Joins must not change the cardinality of the base table: derived metrics
/// are attached either through 1:1 joins or through subqueries that are
/// pre-aggregated (`GROUP BY fk`) before joining. Aggregate columns are
/// expected to be `COALESCE`d so non-matching entities report `0`.
#[derive(Debug, Clone, Copy)]
pub struct ListQuery {
    /// The select list, including derived columns.
    pub columns: &'static str,
    /// Base table with alias, e.g. `"users u"`.
    pub from: &'static str,
    /// Full join clauses, applied to the count query as well so filter
    /// predicates may reference joined columns.
    pub joins: &'static [&'static str],
}

/// One fetched page plus the filtered (but unpaginated) total.
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    pub rows: Vec<T>,
    pub total: i64,
}

impl ListQuery {
    fn push_source(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(self.from);
        for join in self.joins {
            qb.push(" ");
            qb.push(*join);
        }
    }

    fn count_builder(&self, filter: &WhereClause) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM ");
        self.push_source(&mut qb);
        filter.apply(&mut qb);
        qb
    }

    /// `SELECT {columns} FROM {from} {joins}` with nothing else attached.
    /// Detail (`GET /{id}`) queries start from this so a single entity is
    /// shaped exactly like a list row.
    pub fn select_builder(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(self.columns);
        qb.push(" FROM ");
        self.push_source(&mut qb);
        qb
    }

    fn data_builder(
        &self,
        filter: &WhereClause,
        order: &OrderBy,
        page: PageRequest,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = self.select_builder();
        filter.apply(&mut qb);
        qb.push(" ORDER BY ");
        qb.push(order.as_str());
        qb.push(" LIMIT ");
        qb.push_bind(page.limit);
        qb.push(" OFFSET ");
        qb.push_bind(page.offset);
        qb
    }

    /// Run the count query and the data query. Both share the identical
    /// WHERE text and bind order, so `total` always describes the same set
    /// the page was cut from.
    pub async fn fetch<T>(
        &self,
        pool: &PgPool,
        filter: &WhereClause,
        order: &OrderBy,
        page: PageRequest,
    ) -> Result<PageResult<T>, sqlx::Error>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let total = self
            .count_builder(filter)
            .build_query_scalar::<i64>()
            .fetch_one(pool)
            .await?;

        let rows = self
            .data_builder(filter, order, page)
            .build_query_as::<T>()
            .fetch_all(pool)
            .await?;

        Ok(PageResult { rows, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filter::{Coercion, FilterField, FilterOp, FilterSpec, compile};
    use crate::query::sort::SortSpec;
    use std::collections::HashMap;

    const LIST: ListQuery = ListQuery {
        columns: "s.id, s.name, COALESCE(t.cnt, 0) AS transaction_count",
        from: "stores s",
        joins: &[
            "LEFT JOIN (SELECT store_id, COUNT(*) AS cnt FROM transactions GROUP BY store_id) t ON t.store_id = s.id",
        ],
    };

    const FILTERS: FilterSpec = FilterSpec {
        fields: &[FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "s.is_active",
                coerce: Coercion::Bool,
            },
        }],
    };

    const SORT: SortSpec = SortSpec {
        allowed: &[("name", "s.name")],
        default: "s.created_at DESC",
    };

    #[test]
    fn count_and_data_share_where_fragment() {
        let params: HashMap<String, String> =
            [("status".to_string(), "active".to_string())].into();
        let filter = compile(&FILTERS, &params).unwrap();
        let order = SORT.resolve(None, None).unwrap();
        let page = PageRequest::resolve(5, 0, 100);

        let count_sql = LIST.count_builder(&filter).sql().to_owned();
        let data_sql = LIST.data_builder(&filter, &order, page).sql().to_owned();

        assert_eq!(
            count_sql,
            "SELECT COUNT(*) FROM stores s \
             LEFT JOIN (SELECT store_id, COUNT(*) AS cnt FROM transactions GROUP BY store_id) t ON t.store_id = s.id \
             WHERE s.is_active = $1"
        );
        let count_where = count_sql.split_once(" WHERE ").unwrap().1;
        let data_where = data_sql.split_once(" WHERE ").unwrap().1;
        assert!(data_where.starts_with(count_where));
        assert!(data_sql.ends_with(" ORDER BY s.created_at DESC LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn no_filter_renders_without_where() {
        let filter = compile(&FILTERS, &HashMap::new()).unwrap();
        let order = SORT.resolve(Some("name"), Some("asc")).unwrap();
        let page = PageRequest::resolve(20, 40, 100);
        let sql = LIST.data_builder(&filter, &order, page).sql().to_owned();
        assert!(!sql.contains(" WHERE "));
        assert!(sql.ends_with(" ORDER BY s.name ASC LIMIT $1 OFFSET $2"));
    }
}
