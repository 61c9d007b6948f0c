pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use std::{future::Future, sync::Arc};

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

use config::Config;
use handlers::grpc::{self, StreamSettings};
use service::NoticeboardService;

/// Serves the noticeboard on an already bound listener until `signal` resolves.
///
/// The note store is built once from `config` and shared read-only by every
/// call.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    config: &Config,
    signal: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()>,
{
    let store = config.store();
    tracing::info!("Loaded {} notes into the noticeboard", store.len());

    let service = Arc::new(NoticeboardService::new(store));
    let grpc_service = grpc::create_grpc_server(service, StreamSettings::from(config));

    tonic::transport::Server::builder()
        .add_service(grpc_service)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal)
        .await
}
