use std::{future::Future, time::Duration};

use olamai_proto::v1::{
    simulation_service_server::SimulationServiceServer, to_do_service_server::ToDoServiceServer,
};
use tokio::{
    net::TcpListener,
    signal::unix::{signal, SignalKind},
};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic_web::GrpcWebLayer;

use crate::handlers::{SimulationService, ToDoService};

const HTTP2_KEEPALIVE: Duration = Duration::from_secs(2);

/// Serve both gRPC services on `listener` until `shutdown` resolves.
/// HTTP/1.1 is accepted so gRPC-Web clients can talk to the same port.
pub async fn serve(
    listener: TcpListener,
    todo: ToDoService,
    simulation: SimulationService,
    shutdown: impl Future<Output = ()>,
) -> Result<(), tonic::transport::Error> {
    Server::builder()
        .http2_keepalive_interval(Some(HTTP2_KEEPALIVE))
        .http2_keepalive_timeout(Some(HTTP2_KEEPALIVE))
        .accept_http1(true)
        .layer(GrpcWebLayer::new())
        .add_service(ToDoServiceServer::new(todo))
        .add_service(SimulationServiceServer::new(simulation))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}

/// Resolves on SIGINT or SIGTERM.
pub async fn wait_for_quit() {
    let (Ok(mut sigint), Ok(mut sigterm)) = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) else {
        tracing::error!("unable to install signal handlers");
        return futures::future::pending().await;
    };
    tokio::select! {
        _ = sigint.recv() => (),
        _ = sigterm.recv() => (),
    };
}
