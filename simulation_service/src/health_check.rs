use std::future::Future;

use warp::{
    http::StatusCode,
    reply::{with_status, WithStatus},
    Filter, Rejection,
};

use crate::handlers::SimulationService;

/// `GET /health` for load balancers. Answers `503` once the simulation has
/// started closing its streams so traffic drains before the gRPC port goes.
pub fn health_route(
    simulation: SimulationService,
) -> impl Filter<Extract = (WithStatus<&'static str>,), Error = Rejection> + Clone {
    warp::get()
        .and(warp::path("health"))
        .and(warp::path::end())
        .map(move || match simulation.is_closing() {
            true => with_status("shutting down", StatusCode::SERVICE_UNAVAILABLE),
            false => with_status("ok", StatusCode::OK),
        })
}

/// Serve [`health_route`] on `port` until `shutdown` resolves.
pub fn health_check_server(
    port: u16,
    simulation: SimulationService,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> impl Future<Output = ()> {
    let (_, server) = warp::serve(health_route(simulation)).bind_with_graceful_shutdown(
        ([0, 0, 0, 0], port),
        async {
            shutdown.await;
            tracing::info!("health check shutting down");
        },
    );
    server
}
