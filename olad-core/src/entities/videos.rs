//! Promotional video entity: plain CRUD with display ordering.

use kanau::processor::Processor;

use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub const VIDEO_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["v.title", "v.description"],
            },
        },
        FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "v.is_active",
                coerce: Coercion::Bool,
            },
        },
    ],
};

pub const VIDEO_SORT: SortSpec = SortSpec {
    allowed: &[
        ("display_order", "v.display_order"),
        ("created_at", "v.created_at"),
    ],
    default: "v.display_order ASC",
};

const VIDEO_LIST: ListQuery = ListQuery {
    columns: "v.id, v.title, v.description, v.video_url, v.thumbnail_url, \
              v.display_order, v.is_active, v.created_at, v.updated_at",
    from: "promo_videos v",
    joins: &[],
};

#[derive(Debug, Clone)]
pub struct ListVideos {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListVideos> for DatabaseProcessor {
    type Output = PageResult<VideoRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListVideos")]
    async fn process(&self, msg: ListVideos) -> Result<PageResult<VideoRow>, sqlx::Error> {
        VIDEO_LIST.fetch(&self.pool, &msg.filter, &msg.order, msg.page).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetVideoById {
    pub id: i64,
}

impl Processor<GetVideoById> for DatabaseProcessor {
    type Output = Option<VideoRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetVideoById")]
    async fn process(&self, msg: GetVideoById) -> Result<Option<VideoRow>, sqlx::Error> {
        let mut qb = VIDEO_LIST.select_builder();
        qb.push(" WHERE v.id = ");
        qb.push_bind(msg.id);
        qb.build_query_as::<VideoRow>().fetch_optional(&self.pool).await
    }
}

#[derive(Debug, Clone)]
pub struct CreateVideo {
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub display_order: Option<i32>,
}

impl Processor<CreateVideo> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateVideo")]
    async fn process(&self, msg: CreateVideo) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO promo_videos (title, description, video_url, thumbnail_url, \
             display_order) \
             VALUES ($1, $2, $3, $4, COALESCE($5, \
                 (SELECT COALESCE(MAX(display_order), 0) + 1 FROM promo_videos))) \
             RETURNING id",
        )
        .bind(&msg.title)
        .bind(&msg.description)
        .bind(&msg.video_url)
        .bind(&msg.thumbnail_url)
        .bind(msg.display_order)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVideo {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub display_order: Option<i32>,
}

impl Processor<UpdateVideo> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateVideo")]
    async fn process(&self, msg: UpdateVideo) -> Result<u64, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE promo_videos SET updated_at = NOW()");
        if let Some(v) = msg.title {
            qb.push(", title = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.description {
            qb.push(", description = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.video_url {
            qb.push(", video_url = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.thumbnail_url {
            qb.push(", thumbnail_url = ");
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
pub struct SetVideoActive {
    pub id: i64,
    pub is_active: bool,
}

impl Processor<SetVideoActive> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetVideoActive")]
    async fn process(&self, msg: SetVideoActive) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE promo_videos SET is_active = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(msg.is_active)
        .bind(msg.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteVideo {
    pub id: i64,
}

impl Processor<DeleteVideo> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteVideo")]
    async fn process(&self, msg: DeleteVideo) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM promo_videos WHERE id = $1")
            .bind(msg.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
