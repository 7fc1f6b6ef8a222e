use clap::Parser;
use simulation_service::{
    health_check::health_check_server,
    server::{serve, wait_for_quit},
    Args, ServiceConfig, SimulationService, ToDoService,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    olamai_common::logging::init_logging(&args.log_level, args.json_logs);

    let config = ServiceConfig::from(&args);
    tracing::info!(env = ?config.env, "Starting simulation service on port {:?}", args.port);
    tracing::info!("Starting health check on port {:?}", args.health_check_port);

    let simulation = SimulationService::new(config);
    let stepper = simulation.spawn_stepper();

    let listener = TcpListener::bind(("0.0.0.0", args.port)).await?;
    let health_server =
        health_check_server(args.health_check_port, simulation.clone(), wait_for_quit());

    let shutdown = {
        let simulation = simulation.clone();
        async move {
            wait_for_quit().await;
            tracing::info!("Shutdown signal received");
            if let Some(stepper) = stepper {
                stepper.abort();
            }
            simulation.close_all_streams();
        }
    };
    let grpc_server = serve(listener, ToDoService::new(), simulation, shutdown);

    let (_, grpc_result) = tokio::join!(health_server, grpc_server);
    grpc_result?;

    Ok(())
}
