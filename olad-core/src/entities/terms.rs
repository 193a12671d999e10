//! Legal document entity: one versioned body per document kind.

use kanau::processor::Processor;

use crate::entities::{TERMS_KIND_VALUES, TermsKind};
use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TermsRow {
    pub id: i64,
    pub kind: TermsKind,
    pub title: String,
    pub body: String,
    pub version: i32,
    pub is_active: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub const TERMS_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["t.title", "t.body"],
            },
        },
        FilterField {
            param: "kind",
            op: FilterOp::Equals {
                column: "t.kind",
                coerce: Coercion::Enum(TERMS_KIND_VALUES),
            },
        },
        FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "t.is_active",
                coerce: Coercion::Bool,
            },
        },
    ],
};

pub const TERMS_SORT: SortSpec = SortSpec {
    allowed: &[("version", "t.version"), ("created_at", "t.created_at")],
    default: "t.created_at DESC",
};

const TERMS_LIST: ListQuery = ListQuery {
    columns: "t.id, t.kind, t.title, t.body, t.version, t.is_active, \
              t.created_at, t.updated_at",
    from: "terms t",
    joins: &[],
};

#[derive(Debug, Clone)]
pub struct ListTerms {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListTerms> for DatabaseProcessor {
    type Output = PageResult<TermsRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListTerms")]
    async fn process(&self, msg: ListTerms) -> Result<PageResult<TermsRow>, sqlx::Error> {
        TERMS_LIST.fetch(&self.pool, &msg.filter, &msg.order, msg.page).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetTermsById {
    pub id: i64,
}

impl Processor<GetTermsById> for DatabaseProcessor {
    type Output = Option<TermsRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetTermsById")]
    async fn process(&self, msg: GetTermsById) -> Result<Option<TermsRow>, sqlx::Error> {
        let mut qb = TERMS_LIST.select_builder();
        qb.push(" WHERE t.id = ");
        qb.push_bind(msg.id);
        qb.build_query_as::<TermsRow>().fetch_optional(&self.pool).await
    }
}

/// New documents start at version 1 plus the highest existing version of
/// the same kind.
#[derive(Debug, Clone)]
pub struct CreateTerms {
    pub kind: TermsKind,
    pub title: String,
    pub body: String,
}

impl Processor<CreateTerms> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateTerms")]
    async fn process(&self, msg: CreateTerms) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO terms (kind, title, body, version) \
             VALUES ($1, $2, $3, \
                 (SELECT COALESCE(MAX(version), 0) + 1 FROM terms WHERE kind = $1)) \
             RETURNING id",
        )
        .bind(msg.kind)
        .bind(&msg.title)
        .bind(&msg.body)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTerms {
    pub id: i64,
    pub kind: Option<TermsKind>,
    pub title: Option<String>,
    pub body: Option<String>,
}

impl Processor<UpdateTerms> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateTerms")]
    async fn process(&self, msg: UpdateTerms) -> Result<u64, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE terms SET updated_at = NOW()");
        if let Some(v) = msg.kind {
            qb.push(", kind = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.title {
            qb.push(", title = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.body {
            qb.push(", body = ");
            qb.push_bind(v);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(msg.id);
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetTermsActive {
    pub id: i64,
    pub is_active: bool,
}

impl Processor<SetTermsActive> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetTermsActive")]
    async fn process(&self, msg: SetTermsActive) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE terms SET is_active = $1, updated_at = NOW() WHERE id = $2")
                .bind(msg.is_active)
                .bind(msg.id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteTerms {
    pub id: i64,
}

impl Processor<DeleteTerms> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteTerms")]
    async fn process(&self, msg: DeleteTerms) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM terms WHERE id = $1")
            .bind(msg.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
