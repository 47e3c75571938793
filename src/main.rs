//! CLI entry point: stream Manchester Victoria train delays to a Grok instance.

use anyhow::{Context, Result};
use clap::Parser;
use mcv_delays::{
    config::Config,
    fetch::{BasicClient, auth::BasicAuth},
    infra::grok::GrokClient,
    selftest,
    services::monitoring_api::activate_model,
    stream::Streamer,
};
use std::ffi::OsStr;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "mcv_delays")]
#[command(about = "Stream Manchester Victoria Station train delays to a Grok instance", long_about = None)]
struct Cli {
    /// Enable data analysis on the delay metric
    #[arg(short, long)]
    analyze: bool,

    /// Start streaming delay counts
    #[arg(short, long)]
    stream: bool,

    /// Run the self-test scenarios
    #[arg(short, long)]
    test: bool,

    /// Show info and error messages
    #[arg(short, long)]
    verbose: bool,

    /// Number of stream cycles to run (0 = forever)
    #[arg(short = 'n', long, default_value_t = 0)]
    samples: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _file_guard = init_logging(cli.verbose);

    let config = Config::from_env()?;

    let transport = BasicClient::new().context("building transport HTTP client")?;
    let monitor_http = BasicAuth::new(
        BasicClient::new().context("building monitor HTTP client")?,
        &config.monitor.key,
        None,
    )?;
    let grok = GrokClient::new(monitor_http, config.monitor_base()?);
    let transport_uri = config.transport_uri()?;

    if cli.analyze {
        info!("++ ANALYSIS: Starting data analysis");
        let activated = activate_model(&grok, &config.monitor.metric_name).await;
        return Ok(exit_code(activated.is_ok()));
    }

    if cli.test {
        info!("++ TEST: Running test suite");
        let results = selftest::run(&transport, &grok, transport_uri.as_str()).await;
        return Ok(exit_code(selftest::report(&results)));
    }

    if cli.stream {
        info!("++ STREAM: Starting streaming session");
        Streamer::new(
            &transport,
            &grok,
            transport_uri,
            config.monitor.metric_name.as_str(),
            config.cadence,
        )
        .run(cli.samples)
        .await;
        return Ok(ExitCode::SUCCESS);
    }

    warn!("No mode selected; pass --stream, --analyze or --test");
    Ok(ExitCode::SUCCESS)
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Colored stderr output (warn, or info with `--verbose`) plus a JSON rolling
/// log file. The returned guard must live until exit so the file is flushed.
fn init_logging(verbose: bool) -> WorkerGuard {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/mcv_delays.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("mcv_delays.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_level = if verbose { LevelFilter::INFO } else { LevelFilter::WARN };
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(stderr_level.into())
                .from_env_lossy(),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::builder()
                .with_env_var("RUST_LOG_JSON")
                .with_default_directive(LevelFilter::DEBUG.into())
                .from_env_lossy(),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}
