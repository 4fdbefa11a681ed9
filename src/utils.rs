//! Miscellaneous helper utilities.

use crate::errors::{AppError, Result};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::future::Future;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Render a base-unit amount as `"<decimal> <label>"` for logs and reports.
///
/// Display only: the result is never parsed back into a settlement amount.
pub fn format_human_readable(amount: u128, decimals: u8, label: &str) -> String {
    let value = BigDecimal::new(BigInt::from(amount), i64::from(decimals)).normalized();
    format!("{} {}", value.to_plain_string(), label)
}

/// Await `fut` for at most `limit`, mapping expiry to `AppError::Timeout`.
pub async fn with_deadline<T, F>(limit: Duration, operation: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(AppError::Timeout {
            operation: operation.to_string(),
            secs: limit.as_secs(),
        }),
    }
}
