//! Transaction entity: list/detail with user and store joins, status PATCH.
//!
//! Transactions are written by the consumer-facing platform; the admin
//! surface only lists them and adjusts their statuses.

use kanau::processor::Processor;
use rust_decimal::Decimal;

use crate::entities::{
    PAYMENT_STATUS_VALUES, PaymentStatus, TRANSACTION_STATUS_VALUES, TransactionStatus,
};
use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub txn_ref: String,
    pub user_id: i64,
    pub user_name: String,
    pub store_id: i64,
    pub store_name: String,
    pub amount: Decimal,
    pub cashback_amount: Decimal,
    pub status: TransactionStatus,
    pub payment_status: PaymentStatus,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionStatsRow {
    pub today_count: i64,
    pub today_amount: Decimal,
    pub total_amount: Decimal,
}

pub const TRANSACTION_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["t.txn_ref", "u.first_name", "u.last_name", "s.name"],
            },
        },
        FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "t.status",
                coerce: Coercion::Enum(TRANSACTION_STATUS_VALUES),
            },
        },
        FilterField {
            param: "payment_status",
            op: FilterOp::Equals {
                column: "t.payment_status",
                coerce: Coercion::Enum(PAYMENT_STATUS_VALUES),
            },
        },
        FilterField {
            param: "user_id",
            op: FilterOp::Equals {
                column: "t.user_id",
                coerce: Coercion::Int,
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
            param: "date_from",
            op: FilterOp::DateFrom {
                column: "t.created_at",
            },
        },
        FilterField {
            param: "date_to",
            op: FilterOp::DateTo {
                column: "t.created_at",
            },
        },
    ],
};

pub const TRANSACTION_SORT: SortSpec = SortSpec {
    allowed: &[("amount", "t.amount"), ("created_at", "t.created_at")],
    default: "t.created_at DESC",
};

// Both joins are 1:1 from the transaction side; cardinality is unchanged.
// The search filter references the joined columns, which is why the count
// query carries the joins too.
const TRANSACTION_LIST: ListQuery = ListQuery {
    columns: "t.id, t.txn_ref, t.user_id, \
              u.first_name || ' ' || u.last_name AS user_name, \
              t.store_id, s.name AS store_name, \
              t.amount, t.cashback_amount, t.status, t.payment_status, \
              t.created_at, t.updated_at",
    from: "transactions t",
    joins: &[
        "JOIN users u ON u.id = t.user_id",
        "JOIN stores s ON s.id = t.store_id",
    ],
};

#[derive(Debug, Clone)]
pub struct ListTransactions {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListTransactions> for DatabaseProcessor {
    type Output = PageResult<TransactionRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListTransactions")]
    async fn process(
        &self,
        msg: ListTransactions,
    ) -> Result<PageResult<TransactionRow>, sqlx::Error> {
        TRANSACTION_LIST
            .fetch(&self.pool, &msg.filter, &msg.order, msg.page)
            .await
    }
}

/// Most recent transactions for one store's detail view.
#[derive(Debug, Clone, Copy)]
pub struct ListRecentStoreTransactions {
    pub store_id: i64,
    pub limit: i64,
}

impl Processor<ListRecentStoreTransactions> for DatabaseProcessor {
    type Output = Vec<TransactionRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListRecentStoreTransactions")]
    async fn process(
        &self,
        msg: ListRecentStoreTransactions,
    ) -> Result<Vec<TransactionRow>, sqlx::Error> {
        let mut qb = TRANSACTION_LIST.select_builder();
        qb.push(" WHERE t.store_id = ");
        qb.push_bind(msg.store_id);
        qb.push(" ORDER BY t.created_at DESC LIMIT ");
        qb.push_bind(msg.limit);
        qb.build_query_as::<TransactionRow>().fetch_all(&self.pool).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetTransactionStats;

impl Processor<GetTransactionStats> for DatabaseProcessor {
    type Output = TransactionStatsRow;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetTransactionStats")]
    async fn process(&self, _msg: GetTransactionStats) -> Result<TransactionStatsRow, sqlx::Error> {
        sqlx::query_as::<_, TransactionStatsRow>(
            "SELECT COUNT(*) FILTER (WHERE DATE(created_at) = CURRENT_DATE) AS today_count, \
                    COALESCE(SUM(amount) FILTER (WHERE DATE(created_at) = CURRENT_DATE), 0) \
                        AS today_amount, \
                    COALESCE(SUM(amount), 0) AS total_amount \
             FROM transactions",
        )
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetTransactionById {
    pub id: i64,
}

impl Processor<GetTransactionById> for DatabaseProcessor {
    type Output = Option<TransactionRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetTransactionById")]
    async fn process(&self, msg: GetTransactionById) -> Result<Option<TransactionRow>, sqlx::Error> {
        let mut qb = TRANSACTION_LIST.select_builder();
        qb.push(" WHERE t.id = ");
        qb.push_bind(msg.id);
        qb.build_query_as::<TransactionRow>()
            .fetch_optional(&self.pool)
            .await
    }
}

/// Patch one or both status columns. `None` leaves a column untouched.
#[derive(Debug, Clone, Copy)]
pub struct SetTransactionStatus {
    pub id: i64,
    pub status: Option<TransactionStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl Processor<SetTransactionStatus> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetTransactionStatus")]
    async fn process(&self, msg: SetTransactionStatus) -> Result<u64, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE transactions SET updated_at = NOW()");
        if let Some(status) = msg.status {
            qb.push(", status = ");
            qb.push_bind(status);
        }
        if let Some(payment_status) = msg.payment_status {
            qb.push(", payment_status = ");
            qb.push_bind(payment_status);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(msg.id);
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
