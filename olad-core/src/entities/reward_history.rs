//! Reward history: read-only award ledger with user and reward joins.

use kanau::processor::Processor;
use rust_decimal::Decimal;

use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RewardHistoryRow {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub reward_type_id: i64,
    pub reward_name: String,
    pub points: i32,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RewardHistoryStatsRow {
    pub total_points: i64,
    pub distinct_users: i64,
}

pub const REWARD_HISTORY_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["u.first_name", "u.last_name", "r.name"],
            },
        },
        FilterField {
            param: "user_id",
            op: FilterOp::Equals {
                column: "h.user_id",
                coerce: Coercion::Int,
            },
        },
        FilterField {
            param: "reward_type_id",
            op: FilterOp::Equals {
                column: "h.reward_type_id",
                coerce: Coercion::Int,
            },
        },
        FilterField {
            param: "date_from",
            op: FilterOp::DateFrom {
                column: "h.created_at",
            },
        },
        FilterField {
            param: "date_to",
            op: FilterOp::DateTo {
                column: "h.created_at",
            },
        },
    ],
};

pub const REWARD_HISTORY_SORT: SortSpec = SortSpec {
    allowed: &[("points", "h.points"), ("created_at", "h.created_at")],
    default: "h.created_at DESC",
};

// Both joins are 1:1 from the history side; cardinality is unchanged.
const REWARD_HISTORY_LIST: ListQuery = ListQuery {
    columns: "h.id, h.user_id, u.first_name || ' ' || u.last_name AS user_name, \
              h.reward_type_id, r.name AS reward_name, h.points, h.amount, h.note, h.created_at",
    from: "reward_history h",
    joins: &[
        "JOIN users u ON u.id = h.user_id",
        "JOIN reward_types r ON r.id = h.reward_type_id",
    ],
};

#[derive(Debug, Clone)]
pub struct ListRewardHistory {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListRewardHistory> for DatabaseProcessor {
    type Output = PageResult<RewardHistoryRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListRewardHistory")]
    async fn process(
        &self,
        msg: ListRewardHistory,
    ) -> Result<PageResult<RewardHistoryRow>, sqlx::Error> {
        REWARD_HISTORY_LIST
            .fetch(&self.pool, &msg.filter, &msg.order, msg.page)
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetRewardHistoryStats;

impl Processor<GetRewardHistoryStats> for DatabaseProcessor {
    type Output = RewardHistoryStatsRow;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetRewardHistoryStats")]
    async fn process(
        &self,
        _msg: GetRewardHistoryStats,
    ) -> Result<RewardHistoryStatsRow, sqlx::Error> {
        sqlx::query_as::<_, RewardHistoryStatsRow>(
            "SELECT COALESCE(SUM(points), 0) AS total_points, \
                    COUNT(DISTINCT user_id) AS distinct_users \
             FROM reward_history",
        )
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetRewardHistoryById {
    pub id: i64,
}

impl Processor<GetRewardHistoryById> for DatabaseProcessor {
    type Output = Option<RewardHistoryRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetRewardHistoryById")]
    async fn process(
        &self,
        msg: GetRewardHistoryById,
    ) -> Result<Option<RewardHistoryRow>, sqlx::Error> {
        let mut qb = REWARD_HISTORY_LIST.select_builder();
        qb.push(" WHERE h.id = ");
        qb.push_bind(msg.id);
        qb.build_query_as::<RewardHistoryRow>()
            .fetch_optional(&self.pool)
            .await
    }
}
