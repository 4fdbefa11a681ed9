//! Swap settlement collaborator.

use crate::errors::{AppError, Result};
use crate::models::{Confirmation, PoolDescriptor, TransactionHandle};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::info;

/// Builds, submits and confirms swaps. `min_amount_out` is the execution-time
/// floor the settlement layer must enforce.
pub trait SwapExecutor: Send + Sync {
    fn submit_swap(
        &self,
        pool: &PoolDescriptor,
        amount_in: u128,
        min_amount_out: u128,
        input_asset: &str,
    ) -> impl Future<Output = Result<TransactionHandle>> + Send;

    fn confirm_transaction(
        &self,
        handle: &TransactionHandle,
    ) -> impl Future<Output = Result<Confirmation>> + Send;
}

/// A swap as handed to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedSwap {
    pub handle: TransactionHandle,
    pub pool_id: String,
    pub input_asset: String,
    pub amount_in: u128,
    pub min_amount_out: u128,
}

/// Records swaps instead of sending them anywhere.
#[derive(Clone, Default)]
pub struct DryRunExecutor {
    submitted: Arc<Mutex<Vec<SubmittedSwap>>>,
    counter: Arc<AtomicU64>,
    reject_with: Option<String>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every confirmation fails with `AppError::Rejected(reason)`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject_with: Some(reason.into()),
            ..Self::default()
        }
    }

    pub async fn submitted(&self) -> Vec<SubmittedSwap> {
        self.submitted.lock().await.clone()
    }
}

impl SwapExecutor for DryRunExecutor {
    async fn submit_swap(
        &self,
        pool: &PoolDescriptor,
        amount_in: u128,
        min_amount_out: u128,
        input_asset: &str,
    ) -> Result<TransactionHandle> {
        if amount_in == 0 {
            return Err(AppError::Construction("nothing to swap".into()));
        }
        if pool.asset_a.address != input_asset && pool.asset_b.address != input_asset {
            return Err(AppError::Construction(format!(
                "input asset {input_asset} not in pool {}",
                pool.pool_id
            )));
        }

        let seq = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = TransactionHandle {
            id: format!("dry-run-{seq}"),
        };
        info!(
            tx = %handle.id,
            pool = %pool.pool_id,
            input_asset,
            amount_in,
            min_amount_out,
            "[EXEC] dry-run swap recorded"
        );
        self.submitted.lock().await.push(SubmittedSwap {
            handle: handle.clone(),
            pool_id: pool.pool_id.clone(),
            input_asset: input_asset.to_string(),
            amount_in,
            min_amount_out,
        });
        Ok(handle)
    }

    async fn confirm_transaction(&self, handle: &TransactionHandle) -> Result<Confirmation> {
        if let Some(reason) = &self.reject_with {
            return Err(AppError::Rejected(format!("{}: {reason}", handle.id)));
        }
        Ok(Confirmation {
            handle: handle.clone(),
            block: None,
        })
    }
}
