//! Content resources: FAQs, terms pages and promotional videos.

use serde::{Deserialize, Serialize};

use super::envelope::Pagination;
use super::statuses::TermsKind;

// ---------------------------------------------------------------------------
// FAQs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqResponse {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqListData {
    pub faqs: Vec<FaqResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqDetailData {
    pub faq: FaqResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFaqRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFaqRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

// ---------------------------------------------------------------------------
// Terms pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermsResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub kind: TermsKind,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermsListData {
    pub terms: Vec<TermsResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermsDetailData {
    pub terms: TermsResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTermsRequest {
    pub title: String,
    pub content: String,
    pub kind: TermsKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTermsRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub kind: Option<TermsKind>,
}

// ---------------------------------------------------------------------------
// Promotional videos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoListData {
    pub videos: Vec<VideoResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetailData {
    pub video: VideoResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVideoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}
