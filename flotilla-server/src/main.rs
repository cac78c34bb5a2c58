// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Flotilla — generic service descriptions in, engine services out
//
//  API:     axum on tokio
//  Engine:  Docker Engine API over its unix socket
//  Config:  YAML + FLOTILLA_ env overrides
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use anyhow::Context;
use clap::Parser;
use flotilla_api::server::{ApiState, serve_api};
use flotilla_api::service::ServiceHandler;
use flotilla_core::config::FlotillaConfig;
use flotilla_core::translate::TranslationPolicy;
use flotilla_engine::DockerEngine;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "flotilla", version, about = "Flotilla — create and remove orchestrator services")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/flotilla/flotilla.yaml")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Tracing ──
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Flotilla starting");

    // ── Config ──
    if cli.config.exists() {
        info!(path = %cli.config.display(), "Loading config file");
    } else {
        info!(path = %cli.config.display(), "No config file found, using defaults");
    }
    let config = FlotillaConfig::load(&cli.config).context("loading configuration")?;

    // ── Engine ──
    // Nothing is served until the engine answers.
    let engine = match DockerEngine::connect(&config.engine).await {
        Ok(engine) => engine,
        Err(e) => {
            error!(socket = %config.engine.socket.display(), error = %e, "Engine unavailable");
            return Err(e).context("connecting to the orchestration engine");
        }
    };

    // ── Service API ──
    let handler = ServiceHandler::new(Arc::new(engine), TranslationPolicy::from(&config.service));
    let state = Arc::new(ApiState {
        handler,
        engine_api_version: config.engine.api_version.clone(),
    });

    info!(
        network = %config.service.default_network,
        role_label = %config.service.role_label_key,
        "Flotilla is ready"
    );

    serve_api(&config.api, state, shutdown_signal()).await?;

    info!("Flotilla stopped");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM (docker stop).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping...");
}
