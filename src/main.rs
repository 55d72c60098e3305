//! CLI entry point for the air-quality station relay.
//!
//! By default starts the HTTP relay. The `stations` and `station` subcommands
//! run a single upstream round trip and print the JSON the relay would serve.

use airq_relay::{
    config::{DEFAULT_BASE_URL, DEFAULT_LISTEN, DEFAULT_TIMEOUT_SECS, RelayConfig},
    infra::zeroc::ZerocClient,
    relay,
    server::{self, AppState},
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "airq_relay")]
#[command(about = "Relays air-quality station data with trailing weighted averages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Address the HTTP relay binds to
    #[arg(long, env = "AIRQ_LISTEN", default_value = DEFAULT_LISTEN, global = true)]
    listen: SocketAddr,

    #[command(flatten)]
    upstream: UpstreamArgs,
}

#[derive(Args)]
struct UpstreamArgs {
    /// Base URL of the upstream station API
    #[arg(long = "upstream", env = "AIRQ_UPSTREAM_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Seconds to wait for the upstream before failing the request
    #[arg(long, env = "AIRQ_UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_secs: u64,
}

impl UpstreamArgs {
    fn config(&self) -> Result<RelayConfig> {
        RelayConfig::new(&self.base_url, Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the relay over HTTP (the default)
    Serve,
    /// Fetch the station list once and print it
    Stations,
    /// Fetch one station, enrich its metrics and print it
    Station {
        #[arg(value_name = "STATION_ID")]
        station_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/airq_relay.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("airq_relay.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = cli.upstream.config()?;
    let api = ZerocClient::from_config(&config)?;

    info!(
        upstream = %config.base_url,
        timeout_secs = config.timeout.as_secs(),
        "Upstream configured"
    );

    match cli.command {
        None | Some(Commands::Serve) => {
            run_server(cli.listen, AppState::new(api)).await?;
        }
        Some(Commands::Stations) => {
            let body = relay::station_list(&api).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Some(Commands::Station { station_id }) => {
            let body = relay::station_detail(&api, &station_id).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

async fn run_server(listen: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("Failed to bind {listen}"))?;
    server::serve(listener, state).await
}
