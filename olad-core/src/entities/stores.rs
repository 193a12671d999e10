//! Store entity: list with transaction aggregates, CRUD, delete guard.

use kanau::processor::Processor;
use rust_decimal::Decimal;

use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub commission_rate: Decimal,
    pub is_active: bool,
    pub transaction_count: i64,
    pub revenue: Decimal,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreStatsRow {
    pub total_stores: i64,
    pub active_stores: i64,
}

pub const STORE_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["s.name", "s.address", "s.category"],
            },
        },
        FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "s.is_active",
                coerce: Coercion::Bool,
            },
        },
        FilterField {
            param: "category",
            op: FilterOp::Equals {
                column: "s.category",
                coerce: Coercion::Text,
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

pub const STORE_SORT: SortSpec = SortSpec {
    allowed: &[
        ("name", "s.name"),
        ("revenue", "revenue"),
        ("transaction_count", "transaction_count"),
        ("created_at", "s.created_at"),
    ],
    default: "s.created_at DESC",
};

// Transaction metrics are pre-aggregated per store before the join so the
// fan-out cannot duplicate store rows.
const STORE_LIST: ListQuery = ListQuery {
    columns: "s.id, s.name, s.email, s.phone, s.address, s.category, s.commission_rate, \
              s.is_active, s.created_at, s.updated_at, \
              COALESCE(t.cnt, 0) AS transaction_count, \
              COALESCE(t.revenue, 0) AS revenue",
    from: "stores s",
    joins: &[
        "LEFT JOIN (SELECT store_id, COUNT(*) AS cnt, SUM(amount) AS revenue \
         FROM transactions GROUP BY store_id) t ON t.store_id = s.id",
    ],
};

#[derive(Debug, Clone)]
pub struct ListStores {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListStores> for DatabaseProcessor {
    type Output = PageResult<StoreRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListStores")]
    async fn process(&self, msg: ListStores) -> Result<PageResult<StoreRow>, sqlx::Error> {
        let mut filter = msg.filter;
        filter.and_raw("s.is_deleted = FALSE");
        STORE_LIST.fetch(&self.pool, &filter, &msg.order, msg.page).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetStoreStats;

impl Processor<GetStoreStats> for DatabaseProcessor {
    type Output = StoreStatsRow;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetStoreStats")]
    async fn process(&self, _msg: GetStoreStats) -> Result<StoreStatsRow, sqlx::Error> {
        sqlx::query_as::<_, StoreStatsRow>(
            "SELECT COUNT(*) AS total_stores, \
                    COUNT(*) FILTER (WHERE is_active) AS active_stores \
             FROM stores WHERE is_deleted = FALSE",
        )
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetStoreById {
    pub id: i64,
}

impl Processor<GetStoreById> for DatabaseProcessor {
    type Output = Option<StoreRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetStoreById")]
    async fn process(&self, msg: GetStoreById) -> Result<Option<StoreRow>, sqlx::Error> {
        let mut qb = STORE_LIST.select_builder();
        qb.push(" WHERE s.id = ");
        qb.push_bind(msg.id);
        qb.push(" AND s.is_deleted = FALSE");
        qb.build_query_as::<StoreRow>().fetch_optional(&self.pool).await
    }
}

#[derive(Debug, Clone)]
pub struct StoreNameExists {
    pub name: String,
    pub exclude_id: Option<i64>,
}

impl Processor<StoreNameExists> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:StoreNameExists")]
    async fn process(&self, msg: StoreNameExists) -> Result<bool, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new(
            "SELECT EXISTS(SELECT 1 FROM stores WHERE is_deleted = FALSE AND name = ",
        );
        qb.push_bind(msg.name);
        if let Some(id) = msg.exclude_id {
            qb.push(" AND id <> ");
            qb.push_bind(id);
        }
        qb.push(")");
        qb.build_query_scalar::<bool>().fetch_one(&self.pool).await
    }
}

/// Delete guard: a store with recorded transactions must not disappear.
#[derive(Debug, Clone, Copy)]
pub struct StoreHasTransactions {
    pub store_id: i64,
}

impl Processor<StoreHasTransactions> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:StoreHasTransactions")]
    async fn process(&self, msg: StoreHasTransactions) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM transactions WHERE store_id = $1)")
            .bind(msg.store_id)
            .fetch_one(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct CreateStore {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub commission_rate: Decimal,
}

impl Processor<CreateStore> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateStore")]
    async fn process(&self, msg: CreateStore) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO stores (name, email, phone, address, category, commission_rate) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.phone)
        .bind(&msg.address)
        .bind(&msg.category)
        .bind(msg.commission_rate)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStore {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub commission_rate: Option<Decimal>,
}

impl Processor<UpdateStore> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateStore")]
    async fn process(&self, msg: UpdateStore) -> Result<u64, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE stores SET updated_at = NOW()");
        if let Some(v) = msg.name {
            qb.push(", name = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.email {
            qb.push(", email = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.phone {
            qb.push(", phone = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.address {
            qb.push(", address = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.category {
            qb.push(", category = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.commission_rate {
            qb.push(", commission_rate = ");
            qb.push_bind(v);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(msg.id);
        qb.push(" AND is_deleted = FALSE");
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetStoreActive {
    pub id: i64,
    pub is_active: bool,
}

impl Processor<SetStoreActive> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetStoreActive")]
    async fn process(&self, msg: SetStoreActive) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE stores SET is_active = $1, updated_at = NOW() \
             WHERE id = $2 AND is_deleted = FALSE",
        )
        .bind(msg.is_active)
        .bind(msg.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SoftDeleteStore {
    pub id: i64,
}

impl Processor<SoftDeleteStore> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SoftDeleteStore")]
    async fn process(&self, msg: SoftDeleteStore) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE stores SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(msg.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
