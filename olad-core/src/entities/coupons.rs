//! Coupon entity: list, CRUD, hard delete.

use kanau::processor::Processor;
use rust_decimal::Decimal;

use crate::entities::{DISCOUNT_TYPE_VALUES, DiscountType};
use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CouponRow {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub valid_from: time::Date,
    pub valid_to: time::Date,
    pub usage_limit: Option<i32>,
    pub is_active: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CouponStatsRow {
    pub total_coupons: i64,
    pub active_coupons: i64,
    pub expired_coupons: i64,
}

pub const COUPON_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["c.code", "c.title"],
            },
        },
        FilterField {
            param: "discount_type",
            op: FilterOp::Equals {
                column: "c.discount_type",
                coerce: Coercion::Enum(DISCOUNT_TYPE_VALUES),
            },
        },
        FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "c.is_active",
                coerce: Coercion::Bool,
            },
        },
        FilterField {
            param: "date_from",
            op: FilterOp::DateFrom {
                column: "c.created_at",
            },
        },
        FilterField {
            param: "date_to",
            op: FilterOp::DateTo {
                column: "c.created_at",
            },
        },
    ],
};

pub const COUPON_SORT: SortSpec = SortSpec {
    allowed: &[
        ("code", "c.code"),
        ("valid_to", "c.valid_to"),
        ("created_at", "c.created_at"),
    ],
    default: "c.created_at DESC",
};

const COUPON_LIST: ListQuery = ListQuery {
    columns: "c.id, c.code, c.title, c.description, c.discount_type, c.discount_value, \
              c.valid_from, c.valid_to, c.usage_limit, c.is_active, c.created_at, c.updated_at",
    from: "coupons c",
    joins: &[],
};

#[derive(Debug, Clone)]
pub struct ListCoupons {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListCoupons> for DatabaseProcessor {
    type Output = PageResult<CouponRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListCoupons")]
    async fn process(&self, msg: ListCoupons) -> Result<PageResult<CouponRow>, sqlx::Error> {
        COUPON_LIST.fetch(&self.pool, &msg.filter, &msg.order, msg.page).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetCouponStats;

impl Processor<GetCouponStats> for DatabaseProcessor {
    type Output = CouponStatsRow;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCouponStats")]
    async fn process(&self, _msg: GetCouponStats) -> Result<CouponStatsRow, sqlx::Error> {
        sqlx::query_as::<_, CouponStatsRow>(
            "SELECT COUNT(*) AS total_coupons, \
                    COUNT(*) FILTER (WHERE is_active AND valid_to >= CURRENT_DATE) \
                        AS active_coupons, \
                    COUNT(*) FILTER (WHERE valid_to < CURRENT_DATE) AS expired_coupons \
             FROM coupons",
        )
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetCouponById {
    pub id: i64,
}

impl Processor<GetCouponById> for DatabaseProcessor {
    type Output = Option<CouponRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCouponById")]
    async fn process(&self, msg: GetCouponById) -> Result<Option<CouponRow>, sqlx::Error> {
        let mut qb = COUPON_LIST.select_builder();
        qb.push(" WHERE c.id = ");
        qb.push_bind(msg.id);
        qb.build_query_as::<CouponRow>().fetch_optional(&self.pool).await
    }
}

#[derive(Debug, Clone)]
pub struct CouponCodeExists {
    pub code: String,
    pub exclude_id: Option<i64>,
}

impl Processor<CouponCodeExists> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CouponCodeExists")]
    async fn process(&self, msg: CouponCodeExists) -> Result<bool, sqlx::Error> {
        let mut qb =
            sqlx::QueryBuilder::new("SELECT EXISTS(SELECT 1 FROM coupons WHERE code = ");
        qb.push_bind(msg.code);
        if let Some(id) = msg.exclude_id {
            qb.push(" AND id <> ");
            qb.push_bind(id);
        }
        qb.push(")");
        qb.build_query_scalar::<bool>().fetch_one(&self.pool).await
    }
}

#[derive(Debug, Clone)]
pub struct CreateCoupon {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub valid_from: time::Date,
    pub valid_to: time::Date,
    pub usage_limit: Option<i32>,
}

impl Processor<CreateCoupon> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateCoupon")]
    async fn process(&self, msg: CreateCoupon) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO coupons \
             (code, title, description, discount_type, discount_value, valid_from, valid_to, \
              usage_limit) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
        )
        .bind(&msg.code)
        .bind(&msg.title)
        .bind(&msg.description)
        .bind(msg.discount_type)
        .bind(msg.discount_value)
        .bind(msg.valid_from)
        .bind(msg.valid_to)
        .bind(msg.usage_limit)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCoupon {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub valid_from: Option<time::Date>,
    pub valid_to: Option<time::Date>,
    pub usage_limit: Option<i32>,
}

impl Processor<UpdateCoupon> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateCoupon")]
    async fn process(&self, msg: UpdateCoupon) -> Result<u64, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE coupons SET updated_at = NOW()");
        if let Some(v) = msg.title {
            qb.push(", title = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.description {
            qb.push(", description = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.discount_type {
            qb.push(", discount_type = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.discount_value {
            qb.push(", discount_value = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.valid_from {
            qb.push(", valid_from = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.valid_to {
            qb.push(", valid_to = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.usage_limit {
            qb.push(", usage_limit = ");
            qb.push_bind(v);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(msg.id);
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetCouponActive {
    pub id: i64,
    pub is_active: bool,
}

impl Processor<SetCouponActive> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetCouponActive")]
    async fn process(&self, msg: SetCouponActive) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE coupons SET is_active = $1, updated_at = NOW() WHERE id = $2")
                .bind(msg.is_active)
                .bind(msg.id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteCoupon {
    pub id: i64,
}

impl Processor<DeleteCoupon> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteCoupon")]
    async fn process(&self, msg: DeleteCoupon) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
            .bind(msg.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
