#[macro_use]
pub mod callback;
pub mod descriptor;
mod error;
pub mod grpc_client;
mod metadata;
pub mod simulation;
pub mod streams;
pub mod todo;

pub use error::*;
pub use grpc_client::GrpcClient;
pub use metadata::CallMetadata;
pub use simulation::SimulationServiceClient;
pub use streams::{ObservationStream, SpectatorStream};
pub use todo::ToDoServiceClient;

#[cfg(test)]
mod tests {
    #[ctor::ctor]
    fn _setup() {
        olamai_common::logger();
    }
}
