mod utils;

use std::time::Duration;

use futures::future::join_all;
use tokio::time::timeout;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

use crate::http_server;
use crate::{ServiceConfig, ServiceState};

/// Install the global subscriber: `RUST_LOG` overrides `log_level`, output
/// is compact and written off-thread. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init_logging(log_level: tracing::Level) -> WorkerGuard {
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(log_level).into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    if tracing_subscriber::registry()
        .with(stdout_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("global subscriber already installed");
    }
    guard
}

pub async fn spawn_service(service_config: &ServiceConfig) {
    let _guard = init_logging(service_config.log_level);

    utils::register_panic_logger();
    utils::report_build_info();
    service_config.report();
    if service_config.sync_api_key.is_none() {
        tracing::warn!("SYNC_API_KEY is not set, /api/sync accepts unauthenticated requests");
    }

    let (graceful_waiter, shutdown_rx) = utils::graceful_shutdown_blocker();

    let state = match ServiceState::from_config(service_config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("error creating server state: {}", e);
            eprintln!("error creating server state: {}", e);
            std::process::exit(3);
        }
    };

    let mut handles = Vec::new();

    let http_config =
        http_server::Config::new(service_config.listen_addr, service_config.log_level);
    let http_rx = shutdown_rx.clone();
    let http_handle = tokio::spawn(async move {
        tracing::info!("Starting HTTP server on {}", http_config.listen_addr);
        if let Err(e) = http_server::run(http_config, state, http_rx).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });
    handles.push(http_handle);

    let _ = graceful_waiter.await;

    if timeout(FINAL_SHUTDOWN_TIMEOUT, join_all(handles))
        .await
        .is_err()
    {
        tracing::error!(
            "Failed to shut down within {} seconds",
            FINAL_SHUTDOWN_TIMEOUT.as_secs()
        );
        std::process::exit(4);
    }
}
