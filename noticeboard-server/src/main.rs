use noticeboard_server::{config, serve_with_shutdown};

use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load noticeboard config: {e}");
        panic!("failed to load noticeboard config: {e}");
    });
    tracing::info!("Successfully loaded noticeboard config");

    let listener = TcpListener::bind(&cfg.addr).await.unwrap_or_else(|e| {
        tracing::error!("Failed to listen on {}: {e}", cfg.addr);
        panic!("failed to listen on {}: {e}", cfg.addr);
    });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("gRPC server starting, listening on {}", addr),
        Err(_) => tracing::info!("gRPC server starting, listening on {}", cfg.addr),
    }

    if let Err(e) = serve_with_shutdown(listener, &cfg, shutdown_signal()).await {
        tracing::error!("gRPC server error: {e}");
        panic!("failed to serve gRPC: {e}");
    }

    tracing::info!("gRPC server shut down");
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }
}
