//! gemrelay: HTTP relay between a chat front end and the Gemini API.
//!
//! Loads configuration, wires the relay, and serves the HTTP API until
//! SIGINT or SIGTERM.

mod error;
mod protocol;
mod routes;
mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use gemrelay_ai::SessionStore;
use gemrelay_common::ConfigError;
use gemrelay_config::{LoggingConfig, RelayConfig};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Longest pause between idle-session sweeps.
const MAX_REAP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Parser)]
#[command(name = "gemrelay", version, about = "Streaming chat relay for the Gemini API")]
struct Args {
    /// Path to the TOML config file. Defaults to the platform config dir.
    #[arg(short, long, env = "GEMRELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on. Overrides the config file and `PORT`.
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let bootstrap_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let mut config =
        load_config_logged(args.config.as_deref(), bootstrap_filter, std::io::stderr)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if args.print_config {
        println!("{}", gemrelay_config::config_to_json(&config));
        return Ok(());
    }

    init_tracing(&config.logging);
    info!(version = env!("CARGO_PKG_VERSION"), "gemrelay starting");
    debug!(candidates = ?config.models.candidates, "Model candidates");
    if config.provider.api_key.is_empty() {
        warn!("No API key configured; set API_KEY or provider.api_key");
    }

    let state = Arc::new(AppState::from_config(config)?);
    let config = Arc::clone(&state.config);

    let shutdown = CancellationToken::new();
    if let Some(ttl) = config.sessions.idle_ttl_secs {
        spawn_reaper(
            state.relay.sessions().clone(),
            Duration::from_secs(ttl),
            shutdown.clone(),
        );
    }

    let app = routes::build(Arc::clone(&state))?;
    let addr = config.server.address();
    let listener = TcpListener::bind(&addr).await?;
    let port = listener.local_addr()?.port();

    info!(%addr, "gemrelay listening");
    info!("Health check: http://localhost:{port}/api/health");
    info!("Models: http://localhost:{port}/api/gemini/models");
    info!("Simple chat: http://localhost:{port}/api/gemini/simple?msg=hello");

    let token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            token.cancel();
        })
        .await?;

    shutdown.cancel();
    info!("gemrelay stopped");
    Ok(())
}

/// Load the config with a temporary subscriber installed, since the real
/// one depends on the loaded logging settings.
fn load_config_logged<W>(
    path: Option<&Path>,
    filter: EnvFilter,
    writer: W,
) -> Result<RelayConfig, ConfigError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .finish();
    tracing::subscriber::with_default(bootstrap, || gemrelay_config::load_config(path))
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match logging.level.parse::<EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: logging.level '{}' is not a valid filter ({e}); falling back to 'info'",
                    logging.level
                );
                EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Periodically drop sessions idle for longer than `ttl`.
fn spawn_reaper(store: SessionStore, ttl: Duration, shutdown: CancellationToken) {
    let interval = ttl.min(MAX_REAP_INTERVAL);
    info!(ttl_secs = ttl.as_secs(), "Idle session reaper enabled");

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
            let reaped = store.reap_idle(ttl).await;
            let count = store.count().await;
            if reaped > 0 {
                info!(reaped, sessions = count, "Reaped idle sessions");
            } else {
                debug!(sessions = count, "Reaper tick");
            }
        }
    });
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}
