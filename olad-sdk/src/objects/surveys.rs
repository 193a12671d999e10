//! Survey resource objects.

use serde::{Deserialize, Serialize};

use super::envelope::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// Derived counts, never null.
    pub question_count: i64,
    pub response_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyQuestionResponse {
    pub id: i64,
    pub question: String,
    pub question_type: String,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyStats {
    pub total_surveys: i64,
    pub active_surveys: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyListData {
    pub surveys: Vec<SurveyResponse>,
    pub pagination: Pagination,
    pub stats: SurveyStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyDetailData {
    pub survey: SurveyResponse,
    /// Ordered by `display_order`.
    pub questions: Vec<SurveyQuestionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSurveyQuestion {
    pub question: String,
    /// Free-form type tag (`text`, `rating`, `single_choice`, ...).
    #[serde(default)]
    pub question_type: Option<String>,
    /// When absent, questions are numbered in the order supplied.
    #[serde(default)]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSurveyRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<CreateSurveyQuestion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSurveyRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
