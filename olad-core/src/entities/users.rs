//! User entity: list/detail queries, creation transaction, updates.

use kanau::processor::Processor;
use rust_decimal::Decimal;

use crate::framework::DatabaseProcessor;
use crate::query::{
    Coercion, FilterField, FilterOp, FilterSpec, ListQuery, OrderBy, PageRequest, PageResult,
    SortSpec, WhereClause,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub referral_code: String,
    pub is_active: bool,
    pub wallet_balance: Decimal,
    pub points_earned: i64,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfileRow {
    pub address: Option<String>,
    pub city: Option<String>,
    pub date_of_birth: Option<time::Date>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WalletRow {
    pub balance: Decimal,
    pub lifetime_cashback: Decimal,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserStatsRow {
    pub total_users: i64,
    pub active_users: i64,
    pub new_this_month: i64,
}

pub const USER_FILTERS: FilterSpec = FilterSpec {
    fields: &[
        FilterField {
            param: "search",
            op: FilterOp::Search {
                columns: &["u.first_name", "u.last_name", "u.email", "u.phone"],
            },
        },
        FilterField {
            param: "status",
            op: FilterOp::Equals {
                column: "u.is_active",
                coerce: Coercion::Bool,
            },
        },
        FilterField {
            param: "date_from",
            op: FilterOp::DateFrom {
                column: "u.created_at",
            },
        },
        FilterField {
            param: "date_to",
            op: FilterOp::DateTo {
                column: "u.created_at",
            },
        },
    ],
};

pub const USER_SORT: SortSpec = SortSpec {
    allowed: &[
        ("name", "u.first_name"),
        ("email", "u.email"),
        ("created_at", "u.created_at"),
    ],
    default: "u.created_at DESC",
};

const USER_LIST: ListQuery = ListQuery {
    columns: "u.id, u.first_name, u.last_name, u.email, u.phone, u.referral_code, \
              u.is_active, u.created_at, u.updated_at, \
              COALESCE(w.balance, 0) AS wallet_balance, \
              COALESCE(rh.points, 0) AS points_earned",
    from: "users u",
    joins: &[
        "LEFT JOIN wallets w ON w.user_id = u.id",
        "LEFT JOIN (SELECT user_id, SUM(points) AS points FROM reward_history \
         GROUP BY user_id) rh ON rh.user_id = u.id",
    ],
};

#[derive(Debug, Clone)]
pub struct ListUsers {
    pub filter: WhereClause,
    pub order: OrderBy,
    pub page: PageRequest,
}

impl Processor<ListUsers> for DatabaseProcessor {
    type Output = PageResult<UserRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListUsers")]
    async fn process(&self, msg: ListUsers) -> Result<PageResult<UserRow>, sqlx::Error> {
        let mut filter = msg.filter;
        filter.and_raw("u.is_deleted = FALSE");
        USER_LIST.fetch(&self.pool, &filter, &msg.order, msg.page).await
    }
}

/// Dashboard stats. Computed over the whole table, not the current filter.
#[derive(Debug, Clone, Copy)]
pub struct GetUserStats;

impl Processor<GetUserStats> for DatabaseProcessor {
    type Output = UserStatsRow;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserStats")]
    async fn process(&self, _msg: GetUserStats) -> Result<UserStatsRow, sqlx::Error> {
        sqlx::query_as::<_, UserStatsRow>(
            "SELECT COUNT(*) AS total_users, \
                    COUNT(*) FILTER (WHERE is_active) AS active_users, \
                    COUNT(*) FILTER (WHERE created_at >= date_trunc('month', LOCALTIMESTAMP)) \
                        AS new_this_month \
             FROM users WHERE is_deleted = FALSE",
        )
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetUserById {
    pub id: i64,
}

impl Processor<GetUserById> for DatabaseProcessor {
    type Output = Option<UserRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserById")]
    async fn process(&self, msg: GetUserById) -> Result<Option<UserRow>, sqlx::Error> {
        let mut qb = USER_LIST.select_builder();
        qb.push(" WHERE u.id = ");
        qb.push_bind(msg.id);
        qb.push(" AND u.is_deleted = FALSE");
        qb.build_query_as::<UserRow>().fetch_optional(&self.pool).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetUserProfile {
    pub user_id: i64,
}

impl Processor<GetUserProfile> for DatabaseProcessor {
    type Output = Option<UserProfileRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserProfile")]
    async fn process(&self, msg: GetUserProfile) -> Result<Option<UserProfileRow>, sqlx::Error> {
        sqlx::query_as::<_, UserProfileRow>(
            "SELECT address, city, date_of_birth, gender FROM user_profiles WHERE user_id = $1",
        )
        .bind(msg.user_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetUserWallet {
    pub user_id: i64,
}

impl Processor<GetUserWallet> for DatabaseProcessor {
    type Output = Option<WalletRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserWallet")]
    async fn process(&self, msg: GetUserWallet) -> Result<Option<WalletRow>, sqlx::Error> {
        sqlx::query_as::<_, WalletRow>(
            "SELECT balance, lifetime_cashback FROM wallets WHERE user_id = $1",
        )
        .bind(msg.user_id)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Duplicate pre-check for create/update.
#[derive(Debug, Clone)]
pub struct UserEmailOrPhoneExists {
    pub email: String,
    pub phone: String,
    pub exclude_id: Option<i64>,
}

impl Processor<UserEmailOrPhoneExists> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UserEmailOrPhoneExists")]
    async fn process(&self, msg: UserEmailOrPhoneExists) -> Result<bool, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new(
            "SELECT EXISTS(SELECT 1 FROM users WHERE is_deleted = FALSE AND (email = ",
        );
        qb.push_bind(msg.email);
        qb.push(" OR phone = ");
        qb.push_bind(msg.phone);
        qb.push(")");
        if let Some(id) = msg.exclude_id {
            qb.push(" AND id <> ");
            qb.push_bind(id);
        }
        qb.push(")");
        qb.build_query_scalar::<bool>().fetch_one(&self.pool).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileInsert {
    pub address: Option<String>,
    pub city: Option<String>,
    pub date_of_birth: Option<time::Date>,
    pub gender: Option<String>,
}

impl ProfileInsert {
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.city.is_none()
            && self.date_of_birth.is_none()
            && self.gender.is_none()
    }
}

/// Create a user atomically: the user row, a profile row when any profile
/// field is present, and a wallet row unless one already exists (the wallet
/// guard keeps retried creations from inserting twice).
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub referral_code: String,
    pub profile: Option<ProfileInsert>,
}

impl Processor<CreateUser> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateUser")]
    async fn process(&self, msg: CreateUser) -> Result<i64, sqlx::Error> {
        self.run_in_transaction(move |tx| Box::pin(async move {
            let user_id: i64 = sqlx::query_scalar(
                "INSERT INTO users (first_name, last_name, email, phone, referral_code) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING id",
            )
            .bind(&msg.first_name)
            .bind(&msg.last_name)
            .bind(&msg.email)
            .bind(&msg.phone)
            .bind(&msg.referral_code)
            .fetch_one(&mut **tx)
            .await?;

            if let Some(profile) = &msg.profile
                && !profile.is_empty()
            {
                sqlx::query(
                    "INSERT INTO user_profiles (user_id, address, city, date_of_birth, gender) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(user_id)
                .bind(&profile.address)
                .bind(&profile.city)
                .bind(profile.date_of_birth)
                .bind(&profile.gender)
                .execute(&mut **tx)
                .await?;
            }

            let has_wallet: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM wallets WHERE user_id = $1)")
                    .bind(user_id)
                    .fetch_one(&mut **tx)
                    .await?;
            if !has_wallet {
                sqlx::query("INSERT INTO wallets (user_id) VALUES ($1)")
                    .bind(user_id)
                    .execute(&mut **tx)
                    .await?;
            }

            Ok(user_id)
        }))
        .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Processor<UpdateUser> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateUser")]
    async fn process(&self, msg: UpdateUser) -> Result<u64, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE users SET updated_at = NOW()");
        if let Some(v) = msg.first_name {
            qb.push(", first_name = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.last_name {
            qb.push(", last_name = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.email {
            qb.push(", email = ");
            qb.push_bind(v);
        }
        if let Some(v) = msg.phone {
            qb.push(", phone = ");
            qb.push_bind(v);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(msg.id);
        qb.push(" AND is_deleted = FALSE");
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// Status toggle. Setting the current value again is a no-op that still
/// reports one affected row.
#[derive(Debug, Clone, Copy)]
pub struct SetUserActive {
    pub id: i64,
    pub is_active: bool,
}

impl Processor<SetUserActive> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetUserActive")]
    async fn process(&self, msg: SetUserActive) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET is_active = $1, updated_at = NOW() \
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
pub struct SoftDeleteUser {
    pub id: i64,
}

impl Processor<SoftDeleteUser> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SoftDeleteUser")]
    async fn process(&self, msg: SoftDeleteUser) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(msg.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

const REFERRAL_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Eight characters from `[A-Z0-9]`.
pub fn generate_referral_code() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..8)
        .map(|_| REFERRAL_ALPHABET[rng.random_range(0..REFERRAL_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referral_code_shape() {
        for _ in 0..64 {
            let code = generate_referral_code();
            assert_eq!(code.len(), 8);
            assert!(
                code.bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            );
        }
    }

    #[test]
    fn empty_profile_detection() {
        assert!(ProfileInsert::default().is_empty());
        let p = ProfileInsert {
            city: Some("Pune".to_owned()),
            ..Default::default()
        };
        assert!(!p.is_empty());
    }
}
