//! Coupon resource objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::envelope::Pagination;
use super::statuses::DiscountType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponResponse {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    /// `YYYY-MM-DD` validity bounds.
    pub valid_from: String,
    pub valid_to: String,
    pub usage_limit: Option<i32>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponStats {
    pub total_coupons: i64,
    pub active_coupons: i64,
    pub expired_coupons: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponListData {
    pub coupons: Vec<CouponResponse>,
    pub pagination: Pagination,
    pub stats: CouponStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponDetailData {
    pub coupon: CouponResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCouponRequest {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    /// `YYYY-MM-DD`.
    pub valid_from: String,
    /// `YYYY-MM-DD`.
    pub valid_to: String,
    #[serde(default)]
    pub usage_limit: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCouponRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub discount_type: Option<DiscountType>,
    #[serde(default)]
    pub discount_value: Option<Decimal>,
    #[serde(default)]
    pub valid_from: Option<String>,
    #[serde(default)]
    pub valid_to: Option<String>,
    #[serde(default)]
    pub usage_limit: Option<i32>,
}
