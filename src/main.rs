//! hello-consumer: an HTTP relay in front of an upstream JSON service.
//!
//! This is the application entry point. It parses the command line,
//! initializes tracing, builds the shared upstream client, sets up the Axum
//! router and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hello_consumer::config::{
    AppConfig, LogFormat, LoggingConfig, DEFAULT_LOG_FORMAT, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use hello_consumer::http::start_server;
use hello_consumer::routes::create_router;
use hello_consumer::state::AppState;

/// hello-consumer: relays the JSON answer of the service named by $HOST
#[derive(Parser, Debug)]
#[command(name = "hello-consumer", version, about)]
struct Args {
    /// Log level filter (e.g., "hello_consumer=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log output format: text or json
    #[arg(long, default_value = DEFAULT_LOG_FORMAT)]
    log_format: String,

    /// Total timeout for one upstream call, in seconds
    #[arg(long, default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    upstream_timeout_secs: u64,
}

fn init_tracing(logging: &LoggingConfig) {
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&logging.filter));

    match logging.format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Filter priority: CLI > RUST_LOG > default
    let config = AppConfig::load(args.log_level, &args.log_format, args.upstream_timeout_secs)?;

    init_tracing(&config.logging);

    tracing::info!(
        host_env = %config.upstream.host_env,
        port = config.upstream.port,
        path = %config.upstream.path,
        timeout_secs = config.upstream.timeout.as_secs(),
        "Upstream configured"
    );

    let state = AppState::new(&config)?;
    let app = create_router(state);

    start_server(app, &config).await?;

    Ok(())
}
