use tokio::sync::watch;
use tokio::task::JoinHandle;

use common::version::build_info;

pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic_info| {
        match panic_info.location() {
            Some(location) => tracing::error!(
                message = %panic_info,
                file = location.file(),
                line = location.line(),
                "panic"
            ),
            None => tracing::error!(message = %panic_info, "panic"),
        }
    }));
}

pub fn report_build_info() {
    let info = build_info();
    tracing::info!(
        version = %info.version,
        git_hash = %info.git_hash,
        build_profile = %info.build_profile,
        build_timestamp = %info.build_timestamp,
        target = %info.target,
        "spsync starting up"
    );
}

/// Spawns a task that resolves on Ctrl-C (or SIGTERM on unix) and then
/// notifies every clone of the returned receiver.
pub fn graceful_shutdown_blocker() -> (JoinHandle<()>, watch::Receiver<()>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    let handle = tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("shutdown signal received, beginning graceful shutdown");
        let _ = shutdown_tx.send(());
    });

    (handle, shutdown_rx)
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {},
                _ = terminate.recv() => {},
            }
        }
        Err(e) => {
            tracing::warn!("unable to listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
