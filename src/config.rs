//! Startup configuration read from the environment.

use reqwest::Url;

use crate::error::DelayError;
use crate::schedule::Cadence;

pub const STATION: &str = "MCV";
pub const METRIC_NAME: &str = "mcv_delays";

const TRANSPORT_BASE: &str = "https://transportapi.com/v3/uk/train/station";

/// Transport API application credentials.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub app_id: String,
    pub app_key: String,
    pub station: String,
}

/// Monitoring backend location and API key.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub host: String,
    pub key: String,
    pub metric_name: String,
}

/// Everything the binary needs, built once in `main` and passed down.
#[derive(Debug, Clone)]
pub struct Config {
    pub transport: TransportConfig,
    pub monitor: MonitorConfig,
    pub cadence: Cadence,
}

impl Config {
    /// Reads `T_ID`, `T_KEY`, `G_HOST` and `G_KEY` from the process environment.
    pub fn from_env() -> Result<Self, DelayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(DelayError::MissingEnv(key))
        };

        Ok(Self {
            transport: TransportConfig {
                app_id: require("T_ID")?,
                app_key: require("T_KEY")?,
                station: STATION.to_string(),
            },
            monitor: MonitorConfig {
                host: require("G_HOST")?,
                key: require("G_KEY")?,
                metric_name: METRIC_NAME.to_string(),
            },
            cadence: Cadence::default(),
        })
    }

    /// The live departures query, credentials included.
    pub fn transport_uri(&self) -> Result<Url, DelayError> {
        let base = format!("{}/{}/live.json", TRANSPORT_BASE, self.transport.station);
        Url::parse_with_params(
            &base,
            &[
                ("app_id", self.transport.app_id.as_str()),
                ("app_key", self.transport.app_key.as_str()),
                ("darwin", "false"),
                ("train_status", "passenger"),
            ],
        )
        .map_err(|e| DelayError::InvalidUri {
            uri: base,
            reason: e.to_string(),
        })
    }

    /// Root of the monitoring API. The key travels as basic auth, not in the URL.
    pub fn monitor_base(&self) -> Result<Url, DelayError> {
        let raw = format!("https://{}/", self.monitor.host);
        Url::parse(&raw).map_err(|e| DelayError::InvalidUri {
            uri: raw,
            reason: e.to_string(),
        })
    }
}
