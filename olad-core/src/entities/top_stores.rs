//! Top store curation: a small ordered list of featured stores.
//!
//! Ordering is a dense `sequence_no` column. Reordering rewrites every
//! submitted entry in one transaction so a concurrent reader never sees a
//! half-applied sequence.

use kanau::processor::Processor;
use rust_decimal::Decimal;

use crate::framework::DatabaseProcessor;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TopStoreRow {
    pub id: i64,
    pub store_id: i64,
    pub store_name: String,
    pub category: Option<String>,
    pub is_active: bool,
    pub commission_rate: Decimal,
    pub sequence_no: i32,
    pub created_at: time::PrimitiveDateTime,
}

#[derive(Debug, thiserror::Error)]
pub enum ReorderError {
    #[error("unknown top store entry: {0}")]
    UnknownId(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// The whole curated list, smallest sequence first. No pagination; the
/// list is capped well below a page.
#[derive(Debug, Clone, Copy)]
pub struct ListTopStores;

impl Processor<ListTopStores> for DatabaseProcessor {
    type Output = Vec<TopStoreRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListTopStores")]
    async fn process(&self, _msg: ListTopStores) -> Result<Vec<TopStoreRow>, sqlx::Error> {
        sqlx::query_as::<_, TopStoreRow>(
            "SELECT ts.id, ts.store_id, s.name AS store_name, s.category, s.is_active, \
                    s.commission_rate, ts.sequence_no, ts.created_at \
             FROM top_stores ts \
             JOIN stores s ON s.id = ts.store_id \
             WHERE s.is_deleted = FALSE \
             ORDER BY ts.sequence_no ASC",
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TopStoreExists {
    pub store_id: i64,
}

impl Processor<TopStoreExists> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:TopStoreExists")]
    async fn process(&self, msg: TopStoreExists) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM top_stores WHERE store_id = $1)")
            .bind(msg.store_id)
            .fetch_one(&self.pool)
            .await
    }
}

/// Adds a store to the list. Without an explicit sequence the entry is
/// appended after the current highest.
#[derive(Debug, Clone, Copy)]
pub struct AddTopStore {
    pub store_id: i64,
    pub sequence_no: Option<i32>,
}

impl Processor<AddTopStore> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:AddTopStore")]
    async fn process(&self, msg: AddTopStore) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO top_stores (store_id, sequence_no) \
             VALUES ($1, COALESCE($2, \
                 (SELECT COALESCE(MAX(sequence_no), 0) + 1 FROM top_stores))) \
             RETURNING id",
        )
        .bind(msg.store_id)
        .bind(msg.sequence_no)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RemoveTopStore {
    pub id: i64,
}

impl Processor<RemoveTopStore> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:RemoveTopStore")]
    async fn process(&self, msg: RemoveTopStore) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM top_stores WHERE id = $1")
            .bind(msg.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Rewrites the sequence numbers of the submitted entries atomically. An
/// entry id that matches no row aborts the whole batch.
#[derive(Debug, Clone)]
pub struct ReorderTopStores {
    pub entries: Vec<(i64, i32)>,
}

impl Processor<ReorderTopStores> for DatabaseProcessor {
    type Output = ();
    type Error = ReorderError;
    #[tracing::instrument(skip_all, err, name = "SQL:ReorderTopStores")]
    async fn process(&self, msg: ReorderTopStores) -> Result<(), ReorderError> {
        self.run_in_transaction(move |tx| Box::pin(async move {
            for (id, sequence_no) in msg.entries {
                let affected =
                    sqlx::query("UPDATE top_stores SET sequence_no = $1 WHERE id = $2")
                        .bind(sequence_no)
                        .bind(id)
                        .execute(&mut **tx)
                        .await?
                        .rows_affected();
                if affected == 0 {
                    return Err(ReorderError::UnknownId(id));
                }
            }
            Ok(())
        }))
        .await
    }
}
