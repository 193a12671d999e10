//! FAQ entity: plain CRUD with display ordering.

use kanau::processor::Processor;

use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FaqRow {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub const FAQ_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["f.question", "f.answer"],
            },
        },
        FilterField {
            param: "category",
            op: FilterOp::Equals {
                column: "f.category",
                coerce: Coercion::Text,
            },
        },
        FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "f.is_active",
                coerce: Coercion::Bool,
            },
        },
    ],
};

pub const FAQ_SORT: SortSpec = SortSpec {
    allowed: &[
        ("display_order", "f.display_order"),
        ("created_at", "f.created_at"),
    ],
    default: "f.display_order ASC",
};

const FAQ_LIST: ListQuery = ListQuery {
    columns: "f.id, f.question, f.answer, f.category, f.display_order, f.is_active, \
              f.created_at, f.updated_at",
    from: "faqs f",
    joins: &[],
};

#[derive(Debug, Clone)]
pub struct ListFaqs {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListFaqs> for DatabaseProcessor {
    type Output = PageResult<FaqRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListFaqs")]
    async fn process(&self, msg: ListFaqs) -> Result<PageResult<FaqRow>, sqlx::Error> {
        FAQ_LIST.fetch(&self.pool, &msg.filter, &msg.order, msg.page).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetFaqById {
    pub id: i64,
}

impl Processor<GetFaqById> for DatabaseProcessor {
    type Output = Option<FaqRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetFaqById")]
    async fn process(&self, msg: GetFaqById) -> Result<Option<FaqRow>, sqlx::Error> {
        let mut qb = FAQ_LIST.select_builder();
        qb.push(" WHERE f.id = ");
        qb.push_bind(msg.id);
        qb.build_query_as::<FaqRow>().fetch_optional(&self.pool).await
    }
}

#[derive(Debug, Clone)]
pub struct CreateFaq {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub display_order: Option<i32>,
}

impl Processor<CreateFaq> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateFaq")]
    async fn process(&self, msg: CreateFaq) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO faqs (question, answer, category, display_order) \
             VALUES ($1, $2, $3, COALESCE($4, \
                 (SELECT COALESCE(MAX(display_order), 0) + 1 FROM faqs))) \
             RETURNING id",
        )
        .bind(&msg.question)
        .bind(&msg.answer)
        .bind(&msg.category)
        .bind(msg.display_order)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFaq {
    pub id: i64,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub display_order: Option<i32>,
}

impl Processor<UpdateFaq> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateFaq")]
    async fn process(&self, msg: UpdateFaq) -> Result<u64, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE faqs SET updated_at = NOW()");
        if let Some(v) = msg.question {
            qb.push(", question = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.answer {
            qb.push(", answer = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.category {
            qb.push(", category = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.display_order {
            qb.push(", display_order = ");
            qb.push_bind(v);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(msg.id);
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetFaqActive {
    pub id: i64,
    pub is_active: bool,
}

impl Processor<SetFaqActive> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetFaqActive")]
    async fn process(&self, msg: SetFaqActive) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE faqs SET is_active = $1, updated_at = NOW() WHERE id = $2")
                .bind(msg.is_active)
                .bind(msg.id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteFaq {
    pub id: i64,
}

impl Processor<DeleteFaq> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteFaq")]
    async fn process(&self, msg: DeleteFaq) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM faqs WHERE id = $1")
            .bind(msg.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
