pub mod coupons;
pub mod faqs;
pub mod reward_history;
pub mod rewards;
pub mod settlements;
pub mod stores;
pub mod surveys;
pub mod terms;
pub mod top_stores;
pub mod transactions;
pub mod users;
pub mod videos;

use olad_sdk::objects::statuses::{
    DiscountType as SdkDiscountType, PaymentStatus as SdkPaymentStatus,
    RewardKind as SdkRewardKind, SettlementStatus as SdkSettlementStatus,
    TermsKind as SdkTermsKind, TransactionStatus as SdkTransactionStatus,
};

/// Transaction status for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see
/// `olad_sdk::objects::statuses::TransactionStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "transaction_status")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
    Refunded,
}

/// Allowed wire values, used by the transaction filter spec.
pub const TRANSACTION_STATUS_VALUES: &[&str] =
    &["pending", "completed", "cancelled", "refunded"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "payment_status")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

pub const PAYMENT_STATUS_VALUES: &[&str] = &["pending", "paid", "failed", "refunded"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "settlement_status")]
pub enum SettlementStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

pub const SETTLEMENT_STATUS_VALUES: &[&str] =
    &["pending", "processing", "completed", "failed", "cancelled"];

impl SettlementStatus {
    /// The strict transition graph, enforced only when the
    /// `strict_settlement_transitions` policy is on:
    /// pending → processing, processing → completed | failed | cancelled,
    /// pending → cancelled. Completed, failed and cancelled are terminal.
    pub fn can_transition_to(self, next: Self) -> bool {
        use SettlementStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Pending, Cancelled)
                | (Processing, Completed)
                | (Processing, Failed)
                | (Processing, Cancelled)
        )
    }

    /// Completed settlements represent money that already moved; deletion
    /// is refused regardless of policy.
    pub fn blocks_deletion(self) -> bool {
        matches!(self, SettlementStatus::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "discount_type")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

pub const DISCOUNT_TYPE_VALUES: &[&str] = &["percentage", "fixed"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "reward_kind")]
pub enum RewardKind {
    Cashback,
    Points,
    Coupon,
}

pub const REWARD_KIND_VALUES: &[&str] = &["cashback", "points", "coupon"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "terms_kind")]
pub enum TermsKind {
    PrivacyPolicy,
    TermsOfService,
    RefundPolicy,
}

pub const TERMS_KIND_VALUES: &[&str] =
    &["privacy_policy", "terms_of_service", "refund_policy"];

impl From<TransactionStatus> for SdkTransactionStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Pending => SdkTransactionStatus::Pending,
            TransactionStatus::Completed => SdkTransactionStatus::Completed,
            TransactionStatus::Cancelled => SdkTransactionStatus::Cancelled,
            TransactionStatus::Refunded => SdkTransactionStatus::Refunded,
        }
    }
}

impl From<SdkTransactionStatus> for TransactionStatus {
    fn from(value: SdkTransactionStatus) -> Self {
        match value {
            SdkTransactionStatus::Pending => TransactionStatus::Pending,
            SdkTransactionStatus::Completed => TransactionStatus::Completed,
            SdkTransactionStatus::Cancelled => TransactionStatus::Cancelled,
            SdkTransactionStatus::Refunded => TransactionStatus::Refunded,
        }
    }
}

impl From<PaymentStatus> for SdkPaymentStatus {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Pending => SdkPaymentStatus::Pending,
            PaymentStatus::Paid => SdkPaymentStatus::Paid,
            PaymentStatus::Failed => SdkPaymentStatus::Failed,
            PaymentStatus::Refunded => SdkPaymentStatus::Refunded,
        }
    }
}

impl From<SdkPaymentStatus> for PaymentStatus {
    fn from(value: SdkPaymentStatus) -> Self {
        match value {
            SdkPaymentStatus::Pending => PaymentStatus::Pending,
            SdkPaymentStatus::Paid => PaymentStatus::Paid,
            SdkPaymentStatus::Failed => PaymentStatus::Failed,
            SdkPaymentStatus::Refunded => PaymentStatus::Refunded,
        }
    }
}

impl From<SettlementStatus> for SdkSettlementStatus {
    fn from(value: SettlementStatus) -> Self {
        match value {
            SettlementStatus::Pending => SdkSettlementStatus::Pending,
            SettlementStatus::Processing => SdkSettlementStatus::Processing,
            SettlementStatus::Completed => SdkSettlementStatus::Completed,
            SettlementStatus::Failed => SdkSettlementStatus::Failed,
            SettlementStatus::Cancelled => SdkSettlementStatus::Cancelled,
        }
    }
}

impl From<SdkSettlementStatus> for SettlementStatus {
    fn from(value: SdkSettlementStatus) -> Self {
        match value {
            SdkSettlementStatus::Pending => SettlementStatus::Pending,
            SdkSettlementStatus::Processing => SettlementStatus::Processing,
            SdkSettlementStatus::Completed => SettlementStatus::Completed,
            SdkSettlementStatus::Failed => SettlementStatus::Failed,
            SdkSettlementStatus::Cancelled => SettlementStatus::Cancelled,
        }
    }
}

impl From<DiscountType> for SdkDiscountType {
    fn from(value: DiscountType) -> Self {
        match value {
            DiscountType::Percentage => SdkDiscountType::Percentage,
            DiscountType::Fixed => SdkDiscountType::Fixed,
        }
    }
}

impl From<SdkDiscountType> for DiscountType {
    fn from(value: SdkDiscountType) -> Self {
        match value {
            SdkDiscountType::Percentage => DiscountType::Percentage,
            SdkDiscountType::Fixed => DiscountType::Fixed,
        }
    }
}

impl From<RewardKind> for SdkRewardKind {
    fn from(value: RewardKind) -> Self {
        match value {
            RewardKind::Cashback => SdkRewardKind::Cashback,
            RewardKind::Points => SdkRewardKind::Points,
            RewardKind::Coupon => SdkRewardKind::Coupon,
        }
    }
}

impl From<SdkRewardKind> for RewardKind {
    fn from(value: SdkRewardKind) -> Self {
        match value {
            SdkRewardKind::Cashback => RewardKind::Cashback,
            SdkRewardKind::Points => RewardKind::Points,
            SdkRewardKind::Coupon => RewardKind::Coupon,
        }
    }
}

impl From<TermsKind> for SdkTermsKind {
    fn from(value: TermsKind) -> Self {
        match value {
            TermsKind::PrivacyPolicy => SdkTermsKind::PrivacyPolicy,
            TermsKind::TermsOfService => SdkTermsKind::TermsOfService,
            TermsKind::RefundPolicy => SdkTermsKind::RefundPolicy,
        }
    }
}

impl From<SdkTermsKind> for TermsKind {
    fn from(value: SdkTermsKind) -> Self {
        match value {
            SdkTermsKind::PrivacyPolicy => TermsKind::PrivacyPolicy,
            SdkTermsKind::TermsOfService => TermsKind::TermsOfService,
            SdkTermsKind::RefundPolicy => TermsKind::RefundPolicy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_transition_graph() {
        use SettlementStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));

        // No reverse transitions and terminal states stay terminal.
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Cancelled.can_transition_to(Processing));
        assert!(!Pending.can_transition_to(Completed));
    }

    #[test]
    fn only_completed_settlements_block_deletion() {
        use SettlementStatus::*;
        assert!(Completed.blocks_deletion());
        for status in [Pending, Processing, Failed, Cancelled] {
            assert!(!status.blocks_deletion());
        }
    }
}
