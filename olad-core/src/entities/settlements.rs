//! Settlement entity: list/detail with store join, status PATCH, delete guard.

use kanau::processor::Processor;
use rust_decimal::Decimal;

use crate::entities::{SETTLEMENT_STATUS_VALUES, SettlementStatus};
use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettlementRow {
    pub id: i64,
    pub store_id: i64,
    pub store_name: String,
    pub amount: Decimal,
    pub status: SettlementStatus,
    pub period_start: time::Date,
    pub period_end: time::Date,
    pub settled_at: Option<time::PrimitiveDateTime>,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettlementStatsRow {
    pub pending_amount: Decimal,
    pub completed_amount: Decimal,
}

pub const SETTLEMENT_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["st.name"],
            },
        },
        FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "s.status",
                coerce: Coercion::Enum(SETTLEMENT_STATUS_VALUES),
            },
        },
        FilterField {
            param: "store_id",
            op: FilterOp::Equals {
                column: "s.store_id",
                coerce: Coercion::Int,
            },
        },
        FilterField {
            param: "date_from",
            op: FilterOp::DateFrom {
                column: "s.created_at",
            },
        },
        FilterField {
            param: "date_to",
            op: FilterOp::DateTo {
                column: "s.created_at",
            },
        },
    ],
};

pub const SETTLEMENT_SORT: SortSpec = SortSpec {
    allowed: &[("amount", "s.amount"), ("created_at", "s.created_at")],
    default: "s.created_at DESC",
};

const SETTLEMENT_LIST: ListQuery = ListQuery {
    columns: "s.id, s.store_id, st.name AS store_name, s.amount, s.status, \
              s.period_start, s.period_end, s.settled_at, s.created_at, s.updated_at",
    from: "settlements s",
    joins: &["JOIN stores st ON st.id = s.store_id"],
};

#[derive(Debug, Clone)]
pub struct ListSettlements {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListSettlements> for DatabaseProcessor {
    type Output = PageResult<SettlementRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListSettlements")]
    async fn process(&self, msg: ListSettlements) -> Result<PageResult<SettlementRow>, sqlx::Error> {
        SETTLEMENT_LIST
            .fetch(&self.pool, &msg.filter, &msg.order, msg.page)
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetSettlementStats;

impl Processor<GetSettlementStats> for DatabaseProcessor {
    type Output = SettlementStatsRow;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetSettlementStats")]
    async fn process(&self, _msg: GetSettlementStats) -> Result<SettlementStatsRow, sqlx::Error> {
        sqlx::query_as::<_, SettlementStatsRow>(
            "SELECT COALESCE(SUM(amount) FILTER (WHERE status = 'pending'), 0) AS pending_amount, \
                    COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0) AS completed_amount \
             FROM settlements",
        )
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetSettlementById {
    pub id: i64,
}

impl Processor<GetSettlementById> for DatabaseProcessor {
    type Output = Option<SettlementRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetSettlementById")]
    async fn process(&self, msg: GetSettlementById) -> Result<Option<SettlementRow>, sqlx::Error> {
        let mut qb = SETTLEMENT_LIST.select_builder();
        qb.push(" WHERE s.id = ");
        qb.push_bind(msg.id);
        qb.build_query_as::<SettlementRow>()
            .fetch_optional(&self.pool)
            .await
    }
}

/// Set the settlement status. `settled_at` is stamped when the status
/// becomes `completed` and cleared otherwise.
#[derive(Debug, Clone, Copy)]
pub struct SetSettlementStatus {
    pub id: i64,
    pub status: SettlementStatus,
}

impl Processor<SetSettlementStatus> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetSettlementStatus")]
    async fn process(&self, msg: SetSettlementStatus) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE settlements SET status = $1, \
             settled_at = CASE WHEN $1 = 'completed'::settlement_status \
                               THEN NOW() ELSE NULL END, \
             updated_at = NOW() WHERE id = $2",
        )
        .bind(msg.status)
        .bind(msg.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteSettlement {
    pub id: i64,
}

impl Processor<DeleteSettlement> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteSettlement")]
    async fn process(&self, msg: DeleteSettlement) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM settlements WHERE id = $1")
            .bind(msg.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
