//! Fixed checks run by `--test`: two live connectivity probes plus the
//! extraction scenarios that need no network.

use tracing::info;

use crate::fetch::{HttpClient, fetch};
use crate::parser::extract;
use crate::services::monitoring_api::MonitoringApi;

pub const UNREACHABLE_URI: &str = "https://transportapi";

#[derive(Debug)]
pub struct ScenarioResult {
    pub name: &'static str,
    pub outcome: Result<(), String>,
}

impl ScenarioResult {
    fn check(name: &'static str, passed: bool, detail: impl FnOnce() -> String) -> Self {
        let outcome = if passed { Ok(()) } else { Err(detail()) };
        Self { name, outcome }
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Extraction scenarios over canned payloads.
pub fn offline_scenarios() -> Vec<ScenarioResult> {
    let useless = extract(r#"{"user":1}"#);
    let missing = extract(r#"{"departures":1,"code":1}"#);
    let board = extract(
        r#"{"departures":{"all":[{"status":"LATE"},{"status":"ON TIME"},{"status":"LATE"}]}}"#,
    );

    vec![
        ScenarioResult::check("inapplicable_json_response", useless.is_err(), || {
            format!("expected failure, got {useless:?}")
        }),
        ScenarioResult::check("missing_json_fields", missing.is_err(), || {
            format!("expected failure, got {missing:?}")
        }),
        ScenarioResult::check("late_departures_counted", matches!(board, Ok(2)), || {
            format!("expected Ok(2), got {board:?}")
        }),
    ]
}

/// Runs every scenario in order, live probes first.
pub async fn run<T, M>(transport: &T, monitor: &M, transport_uri: &str) -> Vec<ScenarioResult>
where
    T: HttpClient,
    M: MonitoringApi + ?Sized,
{
    info!("Running self-test scenarios");
    let mut results = Vec::new();

    let live = fetch(transport, transport_uri).await;
    results.push(ScenarioResult::check(
        "transport_api_connection",
        matches!(&live, Ok(text) if text.contains("station_code")),
        || match &live {
            Ok(_) => "response has no station_code".to_string(),
            Err(e) => e.to_string(),
        },
    ));

    let listing = monitor.list_metrics().await;
    results.push(ScenarioResult::check(
        "monitor_api_connection",
        listing.is_ok(),
        || format!("{:?}", listing.as_ref().err()),
    ));

    let unreachable = fetch(transport, UNREACHABLE_URI).await;
    results.push(ScenarioResult::check("invalid_uri", unreachable.is_err(), || {
        "expected failure for an unreachable host".to_string()
    }));

    results.extend(offline_scenarios());
    results
}

/// Prints one line per scenario and returns whether all of them passed.
pub fn report(results: &[ScenarioResult]) -> bool {
    for r in results {
        match &r.outcome {
            Ok(()) => println!("{} ... ok", r.name),
            Err(detail) => println!("{} ... FAILED ({detail})", r.name),
        }
    }
    let failed = results.iter().filter(|r| !r.passed()).count();
    println!(
        "\n{} passed; {} failed",
        results.len() - failed,
        failed
    );
    failed == 0
}
