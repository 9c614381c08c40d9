use std::env;
use std::sync::Arc;

use tokio::signal;
use tonic::transport::Server;

use kafka_log_server::{grpc, Broker, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut config = Config::from_env()?;
    if let Some(addr) = env::args().nth(1) {
        config = config.with_addr(&addr)?;
    }

    let broker = Arc::new(Broker::new(&config));
    let server = grpc::create_server(broker);

    tracing::info!(addr = %config.addr, max_poll_records = ?config.max_poll_records, "starting log server");
    Server::builder()
        .add_service(server)
        .serve_with_shutdown(config.addr, shutdown_signal())
        .await?;
    tracing::info!("log server stopped");

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
