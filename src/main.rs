//! Fault normalizer demo service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ TraceLayer ──▶ TimeoutLayer ──▶ Router
//!                                               ├── /health
//!                                               └── fallback
//!                                                    HandleErrorLayer (500 default)
//!                                                      └── FaultLayer ◀── FaultRegistry
//!                                                            └── demo app
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use clap::Parser;
use tokio::net::TcpListener;
use tower::service_fn;

use fault_normalizer::config::{apply_overrides, load_config, ServiceConfig};
use fault_normalizer::faults::{FaultRegistry, MissingConfiguration};
use fault_normalizer::http::demo::demo_app;
use fault_normalizer::http::HttpServer;
use fault_normalizer::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "fault-normalizer")]
#[command(about = "Demo HTTP service with fault classification and error normalization", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_tracing(&config.observability.log_level)?;
    tracing::info!("fault-normalizer v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        overrides = config.faults.overrides.len(),
        "Configuration loaded"
    );

    let registry = Arc::new(FaultRegistry::new());
    registry.register::<MissingConfiguration>(StatusCode::SERVICE_UNAVAILABLE);
    let applied = apply_overrides(&registry, &config.faults);
    tracing::info!(tracked = registry.len(), overrides_applied = applied, "Fault registry ready");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, registry, service_fn(demo_app));
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
