//! Database access plumbing shared by all entity processors.

use std::future::Future;
use std::pin::Pin;

use sqlx::PgPool;

/// A transaction bound to one pooled connection, held for the whole unit.
pub type PgTransaction = sqlx::Transaction<'static, sqlx::Postgres>;

/// Future produced by one transactional unit of work. The borrow of the
/// live transaction stays tied to the future's lifetime.
pub type TxFuture<'t, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 't>>;

/// Executes entity messages against the connection pool.
///
/// Single-statement queries borrow the pool directly; multi-statement
/// mutations go through [`DatabaseProcessor::run_in_transaction`].
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    /// Run `work` inside one transaction: BEGIN, the statements in order,
    /// COMMIT on success, ROLLBACK on the first error. The connection is
    /// released back to the pool on every path.
    ///
    /// Callers pass `move |tx| Box::pin(async move { ... })`.
    pub async fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        E: From<sqlx::Error>,
        F: for<'t> FnOnce(&'t mut PgTransaction) -> TxFuture<'t, T, E>,
    {
        let mut tx = self.pool.begin().await.map_err(E::from)?;
        match work(&mut tx).await {
            Ok(value) => {
                tx.commit().await.map_err(E::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn takes_unit_of_work<F>(_work: F)
    where
        F: for<'t> FnOnce(&'t mut PgTransaction) -> TxFuture<'t, i64, sqlx::Error>,
    {
    }

    // The closure shape used at every call site must satisfy the runner's
    // bound on stable Rust, including captures moved into the future.
    #[test]
    fn boxed_unit_of_work_satisfies_runner_bound() {
        let ids = vec![1_i64, 2, 3];
        takes_unit_of_work(move |tx| {
            Box::pin(async move {
                let _ = &mut **tx;
                Ok(ids.len() as i64)
            })
        });
    }
}
