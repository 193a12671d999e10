//! Survey entity: list with question/response aggregates, create with
//! questions in one transaction, delete guard, soft delete.

use kanau::processor::Processor;

use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SurveyRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub question_count: i64,
    pub response_count: i64,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SurveyQuestionRow {
    pub id: i64,
    pub survey_id: i64,
    pub question: String,
    pub question_type: String,
    pub display_order: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SurveyStatsRow {
    pub total_surveys: i64,
    pub active_surveys: i64,
}

pub const SURVEY_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["sv.title", "sv.description"],
            },
        },
        FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "sv.is_active",
                coerce: Coercion::Bool,
            },
        },
        FilterField {
            param: "date_from",
            op: FilterOp::DateFrom {
                column: "sv.created_at",
            },
        },
        FilterField {
            param: "date_to",
            op: FilterOp::DateTo {
                column: "sv.created_at",
            },
        },
    ],
};

pub const SURVEY_SORT: SortSpec = SortSpec {
    allowed: &[
        ("title", "sv.title"),
        ("response_count", "response_count"),
        ("created_at", "sv.created_at"),
    ],
    default: "sv.created_at DESC",
};

// Question and response counts are pre-aggregated per survey before the
// joins so the fan-out cannot duplicate survey rows.
const SURVEY_LIST: ListQuery = ListQuery {
    columns: "sv.id, sv.title, sv.description, sv.is_active, \
              sv.created_at, sv.updated_at, \
              COALESCE(q.cnt, 0) AS question_count, \
              COALESCE(rp.cnt, 0) AS response_count",
    from: "surveys sv",
    joins: &[
        "LEFT JOIN (SELECT survey_id, COUNT(*) AS cnt \
         FROM survey_questions GROUP BY survey_id) q ON q.survey_id = sv.id",
        "LEFT JOIN (SELECT survey_id, COUNT(*) AS cnt \
         FROM survey_responses GROUP BY survey_id) rp ON rp.survey_id = sv.id",
    ],
};

#[derive(Debug, Clone)]
pub struct ListSurveys {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListSurveys> for DatabaseProcessor {
    type Output = PageResult<SurveyRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListSurveys")]
    async fn process(&self, msg: ListSurveys) -> Result<PageResult<SurveyRow>, sqlx::Error> {
        let mut filter = msg.filter;
        filter.and_raw("sv.is_deleted = FALSE");
        SURVEY_LIST.fetch(&self.pool, &filter, &msg.order, msg.page).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetSurveyStats;

impl Processor<GetSurveyStats> for DatabaseProcessor {
    type Output = SurveyStatsRow;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetSurveyStats")]
    async fn process(&self, _msg: GetSurveyStats) -> Result<SurveyStatsRow, sqlx::Error> {
        sqlx::query_as::<_, SurveyStatsRow>(
            "SELECT COUNT(*) AS total_surveys, \
                    COUNT(*) FILTER (WHERE is_active) AS active_surveys \
             FROM surveys WHERE is_deleted = FALSE",
        )
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetSurveyById {
    pub id: i64,
}

impl Processor<GetSurveyById> for DatabaseProcessor {
    type Output = Option<SurveyRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetSurveyById")]
    async fn process(&self, msg: GetSurveyById) -> Result<Option<SurveyRow>, sqlx::Error> {
        let mut qb = SURVEY_LIST.select_builder();
        qb.push(" WHERE sv.id = ");
        qb.push_bind(msg.id);
        qb.push(" AND sv.is_deleted = FALSE");
        qb.build_query_as::<SurveyRow>().fetch_optional(&self.pool).await
    }
}

/// Questions for one survey's detail view, in display order.
#[derive(Debug, Clone, Copy)]
pub struct ListSurveyQuestions {
    pub survey_id: i64,
}

impl Processor<ListSurveyQuestions> for DatabaseProcessor {
    type Output = Vec<SurveyQuestionRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListSurveyQuestions")]
    async fn process(
        &self,
        msg: ListSurveyQuestions,
    ) -> Result<Vec<SurveyQuestionRow>, sqlx::Error> {
        sqlx::query_as::<_, SurveyQuestionRow>(
            "SELECT id, survey_id, question, question_type, display_order \
             FROM survey_questions WHERE survey_id = $1 ORDER BY display_order ASC, id ASC",
        )
        .bind(msg.survey_id)
        .fetch_all(&self.pool)
        .await
    }
}

/// Delete guard: a survey with recorded responses must not disappear.
#[derive(Debug, Clone, Copy)]
pub struct SurveyHasResponses {
    pub survey_id: i64,
}

impl Processor<SurveyHasResponses> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SurveyHasResponses")]
    async fn process(&self, msg: SurveyHasResponses) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM survey_responses WHERE survey_id = $1)")
            .bind(msg.survey_id)
            .fetch_one(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct QuestionInsert {
    pub question: String,
    pub question_type: String,
    pub display_order: Option<i32>,
}

/// Inserts the survey and its questions atomically. A question without an
/// explicit display order takes its position in the submitted list.
#[derive(Debug, Clone)]
pub struct CreateSurvey {
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<QuestionInsert>,
}

impl Processor<CreateSurvey> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateSurvey")]
    async fn process(&self, msg: CreateSurvey) -> Result<i64, sqlx::Error> {
        self.run_in_transaction(move |tx| Box::pin(async move {
            let survey_id: i64 = sqlx::query_scalar(
                "INSERT INTO surveys (title, description) VALUES ($1, $2) RETURNING id",
            )
            .bind(&msg.title)
            .bind(&msg.description)
            .fetch_one(&mut **tx)
            .await?;

            for (idx, q) in msg.questions.into_iter().enumerate() {
                let display_order = q.display_order.unwrap_or(idx as i32 + 1);
                sqlx::query(
                    "INSERT INTO survey_questions \
                     (survey_id, question, question_type, display_order) \
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(survey_id)
                .bind(&q.question)
                .bind(&q.question_type)
                .bind(display_order)
                .execute(&mut **tx)
                .await?;
            }

            Ok(survey_id)
        }))
        .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSurvey {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Processor<UpdateSurvey> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateSurvey")]
    async fn process(&self, msg: UpdateSurvey) -> Result<u64, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE surveys SET updated_at = NOW()");
        if let Some(v) = msg.title {
            qb.push(", title = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.description {
            qb.push(", description = ");
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
pub struct SetSurveyActive {
    pub id: i64,
    pub is_active: bool,
}

impl Processor<SetSurveyActive> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetSurveyActive")]
    async fn process(&self, msg: SetSurveyActive) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE surveys SET is_active = $1, updated_at = NOW() \
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
pub struct SoftDeleteSurvey {
    pub id: i64,
}

impl Processor<SoftDeleteSurvey> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SoftDeleteSurvey")]
    async fn process(&self, msg: SoftDeleteSurvey) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE surveys SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(msg.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_order_defaults_to_position() {
        let questions = vec![
            QuestionInsert {
                question: "How often do you shop?".into(),
                question_type: "single_choice".into(),
                display_order: None,
            },
            QuestionInsert {
                question: "Any feedback?".into(),
                question_type: "text".into(),
                display_order: Some(10),
            },
        ];
        let orders: Vec<i32> = questions
            .iter()
            .enumerate()
            .map(|(idx, q)| q.display_order.unwrap_or(idx as i32 + 1))
            .collect();
        assert_eq!(orders, vec![1, 10]);
    }
}
