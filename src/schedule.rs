//! Fixed-period cadence with drift compensation.
//!
//! Each cycle sleeps [`Cadence::lead_wait`] first so the slow departures call
//! has time to finish, then sleeps up to the next multiple of the period
//! measured from when the [`Ticker`] started. Processing time therefore never
//! accumulates across cycles.

use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(300);
pub const DEFAULT_LEAD: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    period: Duration,
    lead: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            lead: DEFAULT_LEAD,
        }
    }
}

impl Cadence {
    /// Returns `None` for a zero period or a lead longer than the period.
    pub fn new(period: Duration, lead: Duration) -> Option<Self> {
        if period.is_zero() || lead > period {
            return None;
        }
        Some(Self { period, lead })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time to wait before fetching, counted from the previous boundary.
    pub fn lead_wait(&self) -> Duration {
        self.period - self.lead
    }

    /// Time left until the next period boundary after `elapsed` since start.
    ///
    /// Exactly on a boundary this is a full period, never zero.
    pub fn remainder(&self, elapsed: Duration) -> Duration {
        let period = self.period.as_nanos();
        let into_cycle = elapsed.as_nanos() % period;
        Duration::from_nanos((period - into_cycle) as u64)
    }
}

/// A [`Cadence`] anchored to the instant streaming started.
pub struct Ticker {
    cadence: Cadence,
    started: Instant,
}

impl Ticker {
    pub fn start(cadence: Cadence) -> Self {
        Self {
            cadence,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub async fn wait_lead(&self) {
        let wait = self.cadence.lead_wait();
        debug!(wait_secs = wait.as_secs_f64(), "Waiting before fetch");
        sleep(wait).await;
    }

    pub async fn wait_boundary(&self) {
        let wait = self.cadence.remainder(self.elapsed());
        debug!(wait_secs = wait.as_secs_f64(), "Waiting for period boundary");
        sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_default_lead_wait_is_270() {
        assert_eq!(Cadence::default().lead_wait(), secs(270));
    }

    #[test]
    fn test_remainder_on_boundary_is_full_period() {
        let c = Cadence::default();
        assert_eq!(c.remainder(secs(0)), secs(300));
        assert_eq!(c.remainder(secs(600)), secs(300));
    }

    #[test]
    fn test_remainder_compensates_drift() {
        let c = Cadence::default();
        assert_eq!(c.remainder(secs(305)), secs(295));
        assert_eq!(c.remainder(secs(275)), secs(25));
        assert_eq!(c.remainder(Duration::from_millis(299_500)), Duration::from_millis(500));
    }

    #[test]
    fn test_new_rejects_bad_cadence() {
        assert!(Cadence::new(Duration::ZERO, Duration::ZERO).is_none());
        assert!(Cadence::new(secs(10), secs(11)).is_none());
        assert!(Cadence::new(secs(10), secs(10)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_lands_on_boundary_despite_processing_time() {
        let ticker = Ticker::start(Cadence::default());

        ticker.wait_lead().await;
        assert_eq!(ticker.elapsed(), secs(270));

        // a slow upstream call
        tokio::time::advance(secs(12)).await;
        ticker.wait_boundary().await;
        assert_eq!(ticker.elapsed(), secs(300));

        ticker.wait_lead().await;
        tokio::time::advance(secs(40)).await;
        ticker.wait_boundary().await;
        assert_eq!(ticker.elapsed(), secs(900));
    }
}
