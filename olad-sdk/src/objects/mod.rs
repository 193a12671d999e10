//! Request and response objects for the Admin API.

pub mod content;
pub mod coupons;
pub mod envelope;
pub mod rewards;
pub mod settlements;
pub mod statuses;
pub mod stores;
pub mod surveys;
pub mod top_stores;
pub mod transactions;
pub mod users;

pub use envelope::{Envelope, Pagination};
pub use statuses::{DiscountType, PaymentStatus, SettlementStatus, TermsKind, TransactionStatus};
