//! Reward type entity: list with usage aggregates, CRUD, delete guard.

use kanau::processor::Processor;
use rust_decimal::Decimal;

use crate::entities::{REWARD_KIND_VALUES, RewardKind};
use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RewardRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub kind: RewardKind,
    pub points: i32,
    pub value: Decimal,
    pub is_active: bool,
    pub usage_count: i64,
    pub points_awarded: i64,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RewardStatsRow {
    pub total_rewards: i64,
    pub active_rewards: i64,
}

pub const REWARD_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["r.name", "r.description"],
            },
        },
        FilterField {
            param: "kind",
            op: FilterOp::Equals {
                column: "r.kind",
                coerce: Coercion::Enum(REWARD_KIND_VALUES),
            },
        },
        FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "r.is_active",
                coerce: Coercion::Bool,
            },
        },
        FilterField {
            param: "date_from",
            op: FilterOp::DateFrom {
                column: "r.created_at",
            },
        },
        FilterField {
            param: "date_to",
            op: FilterOp::DateTo {
                column: "r.created_at",
            },
        },
    ],
};

pub const REWARD_SORT: SortSpec = SortSpec {
    allowed: &[
        ("name", "r.name"),
        ("usage_count", "usage_count"),
        ("created_at", "r.created_at"),
    ],
    default: "r.created_at DESC",
};

// Usage metrics are pre-aggregated per reward type before the join so the
// fan-out cannot duplicate reward rows.
const REWARD_LIST: ListQuery = ListQuery {
    columns: "r.id, r.name, r.description, r.kind, r.points, r.value, \
              r.is_active, r.created_at, r.updated_at, \
              COALESCE(h.cnt, 0) AS usage_count, \
              COALESCE(h.points, 0) AS points_awarded",
    from: "reward_types r",
    joins: &[
        "LEFT JOIN (SELECT reward_type_id, COUNT(*) AS cnt, SUM(points) AS points \
         FROM reward_history GROUP BY reward_type_id) h ON h.reward_type_id = r.id",
    ],
};

#[derive(Debug, Clone)]
pub struct ListRewards {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListRewards> for DatabaseProcessor {
    type Output = PageResult<RewardRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListRewards")]
    async fn process(&self, msg: ListRewards) -> Result<PageResult<RewardRow>, sqlx::Error> {
        REWARD_LIST.fetch(&self.pool, &msg.filter, &msg.order, msg.page).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetRewardStats;

impl Processor<GetRewardStats> for DatabaseProcessor {
    type Output = RewardStatsRow;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetRewardStats")]
    async fn process(&self, _msg: GetRewardStats) -> Result<RewardStatsRow, sqlx::Error> {
        sqlx::query_as::<_, RewardStatsRow>(
            "SELECT COUNT(*) AS total_rewards, \
                    COUNT(*) FILTER (WHERE is_active) AS active_rewards \
             FROM reward_types",
        )
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetRewardById {
    pub id: i64,
}

impl Processor<GetRewardById> for DatabaseProcessor {
    type Output = Option<RewardRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetRewardById")]
    async fn process(&self, msg: GetRewardById) -> Result<Option<RewardRow>, sqlx::Error> {
        let mut qb = REWARD_LIST.select_builder();
        qb.push(" WHERE r.id = ");
        qb.push_bind(msg.id);
        qb.build_query_as::<RewardRow>().fetch_optional(&self.pool).await
    }
}

/// Delete guard: a reward type referenced by history rows must stay.
#[derive(Debug, Clone, Copy)]
pub struct RewardTypeInUse {
    pub reward_type_id: i64,
}

impl Processor<RewardTypeInUse> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:RewardTypeInUse")]
    async fn process(&self, msg: RewardTypeInUse) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reward_history WHERE reward_type_id = $1)")
            .bind(msg.reward_type_id)
            .fetch_one(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct CreateReward {
    pub name: String,
    pub description: Option<String>,
    pub kind: RewardKind,
    pub points: i32,
    pub value: Decimal,
}

impl Processor<CreateReward> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateReward")]
    async fn process(&self, msg: CreateReward) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO reward_types (name, description, kind, points, value) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&msg.name)
        .bind(&msg.description)
        .bind(msg.kind)
        .bind(msg.points)
        .bind(msg.value)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReward {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<RewardKind>,
    pub points: Option<i32>,
    pub value: Option<Decimal>,
}

impl Processor<UpdateReward> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateReward")]
    async fn process(&self, msg: UpdateReward) -> Result<u64, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE reward_types SET updated_at = NOW()");
        if let Some(v) = msg.name {
            qb.push(", name = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.description {
            qb.push(", description = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.kind {
            qb.push(", kind = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.points {
            qb.push(", points = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.value {
            qb.push(", value = ");
            qb.push_bind(v);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(msg.id);
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetRewardActive {
    pub id: i64,
    pub is_active: bool,
}

impl Processor<SetRewardActive> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetRewardActive")]
    async fn process(&self, msg: SetRewardActive) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reward_types SET is_active = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(msg.is_active)
        .bind(msg.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteReward {
    pub id: i64,
}

impl Processor<DeleteReward> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteReward")]
    async fn process(&self, msg: DeleteReward) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reward_types WHERE id = $1")
            .bind(msg.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
