//! The polling loop: fetch departures, count delays, post on the period boundary.

use tracing::{info, warn};

use crate::fetch::{HttpClient, fetch};
use crate::parser::extract;
use crate::schedule::{Cadence, Ticker};
use crate::services::monitoring_api::{MonitoringApi, publish_delays};

pub struct Streamer<'a, T, M: ?Sized> {
    transport: &'a T,
    monitor: &'a M,
    transport_uri: String,
    metric: String,
    cadence: Cadence,
}

impl<'a, T: HttpClient, M: MonitoringApi + ?Sized> Streamer<'a, T, M> {
    pub fn new(
        transport: &'a T,
        monitor: &'a M,
        transport_uri: impl Into<String>,
        metric: impl Into<String>,
        cadence: Cadence,
    ) -> Self {
        Self {
            transport,
            monitor,
            transport_uri: transport_uri.into(),
            metric: metric.into(),
            cadence,
        }
    }

    /// The value to post for this cycle, or `None` to skip posting.
    ///
    /// An unreachable Transport API yields 0; a reachable one with an
    /// unreadable board yields nothing.
    pub async fn sample(&self) -> Option<usize> {
        match fetch(self.transport, &self.transport_uri).await {
            Ok(text) => extract(&text).ok(),
            Err(_) => Some(0),
        }
    }

    /// Runs `samples` cycles, or forever when `samples` is 0.
    pub async fn run(&self, samples: usize) {
        let ticker = Ticker::start(self.cadence);
        let mut completed = 0;

        if samples == 0 {
            info!(period_secs = self.cadence.period().as_secs(), "Streaming until stopped");
        } else {
            info!(samples, period_secs = self.cadence.period().as_secs(), "Starting sample collection");
        }

        while samples == 0 || completed < samples {
            ticker.wait_lead().await;
            self.cycle(&ticker, completed + 1).await;
            completed += 1;
        }

        info!(completed, "Finished streaming");
    }

    #[tracing::instrument(skip(self, ticker))]
    async fn cycle(&self, ticker: &Ticker, sample: usize) {
        let value = self.sample().await;
        ticker.wait_boundary().await;

        match value {
            // failures are logged inside publish_delays
            Some(count) => {
                let _ = publish_delays(self.monitor, &self.metric, count).await;
            }
            None => warn!("No delay count this cycle, skipping post"),
        }
    }
}
