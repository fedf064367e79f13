//! `SeaORM` transaction scopes.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{DbHandle, Result};

/// What to do with a unit of work that finished without error.
///
/// A unit of work that returns an error is always rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxPolicy {
    #[default]
    Commit,
    /// Run the work, keep its result, discard its writes.
    Rollback,
}

impl DbHandle {
    /// Open a `SeaORM` transaction on this handle.
    ///
    /// Dropping the returned transaction without committing rolls it back.
    ///
    /// # Errors
    /// Returns an error if the transaction cannot be started.
    pub async fn begin(&self) -> Result<DatabaseTransaction> {
        Ok(self.conn().begin().await?)
    }

    /// Execute a closure within a `SeaORM` transaction and settle it per `policy`.
    ///
    /// # Errors
    /// Returns the closure error (after rolling back), or an error from begin/commit/rollback.
    pub async fn with_sea_tx<F, T>(&self, policy: TxPolicy, f: F) -> Result<T>
    where
        F: for<'a> FnOnce(
            &'a DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>,
    {
        let tx = self.begin().await?;
        match f(&tx).await {
            Ok(v) => {
                match policy {
                    TxPolicy::Commit => tx.commit().await?,
                    TxPolicy::Rollback => tx.rollback().await?,
                }
                tracing::trace!(?policy, "Transaction settled");
                Ok(v)
            }
            Err(e) => {
                // Best-effort rollback; keep the original error.
                if let Err(rb) = tx.rollback().await {
                    tracing::warn!(error = %rb, "Rollback after failed unit of work also failed");
                }
                Err(e)
            }
        }
    }
}
