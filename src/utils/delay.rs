//! Simulated latency
//!
//! Mock generation and export wait a random time before answering so the CLI
//! feels like the web app did. A zero range returns at once.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

/// Pick a delay in `[min_ms, max_ms]`; inverted bounds use `min_ms`
pub fn pick_delay(min_ms: u64, max_ms: u64) -> Duration {
    if max_ms <= min_ms {
        return Duration::from_millis(min_ms);
    }
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
}

/// Sleep for a random time in `[min_ms, max_ms]`
pub async fn simulate_latency(min_ms: u64, max_ms: u64) {
    let delay = pick_delay(min_ms, max_ms);
    if delay.is_zero() {
        return;
    }
    debug!("⏳ attesa simulata di {} ms", delay.as_millis());
    tokio::time::sleep(delay).await;
}
