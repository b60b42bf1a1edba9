//! Retry helper for collaborator HTTP calls.

use std::fmt::Display;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

/// Retry an async operation, sleeping `delays` seconds between attempts.
///
/// Makes `delays.len() + 1` attempts in total and returns the last
/// error when all of them fail.
pub async fn with_retries<F, Fut, T, E>(mut operation: F, delays: &[u64]) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let total = delays.len() + 1;
    for (i, delay_secs) in delays.iter().enumerate() {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                warn!(
                    "Request failed (attempt {}/{total}): {e}. Retrying after {delay_secs}s...",
                    i + 1
                );
                sleep(Duration::from_secs(*delay_secs)).await;
            }
        }
    }
    operation().await
}
