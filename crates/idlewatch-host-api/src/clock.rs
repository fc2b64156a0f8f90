//! Clock abstraction for every wait the watchdog performs

use async_trait::async_trait;
use std::time::Duration;

/// Source of delays.
///
/// The watchdog never sleeps directly; tests substitute a clock that records
/// requested waits and returns immediately.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_advances_virtual_time() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::from_secs(900)).await;
        assert!(start.elapsed() >= Duration::from_secs(900));
    }
}
