//! gRPC server hosting `v1.ToDoService` and the grid world `v1.SimulationService`.

pub mod config;
pub mod handlers;
pub mod health_check;
pub mod remote_model;
pub mod server;
pub mod stadium;
pub mod vec2;
pub mod world;

pub use config::{Args, Environment, ServiceConfig};
pub use handlers::{SimulationService, ToDoService};
