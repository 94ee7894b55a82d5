//! Run metrics collection for the simulation.
//!
//! Structured logging and counters for monitoring a response run:
//! ticks completed, victims rescued, cells marked safe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Metrics collector for one simulation run.
pub struct Metrics {
    tick_count: AtomicU64,
    rescued_count: AtomicU64,
    explored_count: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            rescued_count: AtomicU64::new(0),
            explored_count: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with the grid's running totals.
    pub fn record_tick(&self, duration: Duration, rescued: u64, explored: u64) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.rescued_count.store(rescued, Ordering::Relaxed);
        self.explored_count.store(explored, Ordering::Relaxed);

        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick % 100 == 0 {
            tracing::info!(
                tick = tick,
                rescued = rescued,
                explored = explored,
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rescued_count(&self) -> u64 {
        self.rescued_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn explored_count(&self) -> u64 {
        self.explored_count.load(Ordering::Relaxed)
    }

    /// Elapsed wall-clock time since the collector was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.tick_count(), 0);
        assert_eq!(metrics.rescued_count(), 0);
    }

    #[test]
    fn test_record_tick() {
        let metrics = Metrics::new();
        metrics.record_tick(Duration::from_millis(1), 3, 40);
        assert_eq!(metrics.tick_count(), 1);
        assert_eq!(metrics.rescued_count(), 3);
        assert_eq!(metrics.explored_count(), 40);
    }
}
