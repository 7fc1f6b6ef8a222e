mod simulation;
mod todo;

pub use simulation::{Feed, ModelFeed, SimulationService, SpectatorFeed};
pub use todo::ToDoService;

use olamai_proto::{ConversionError, API_VERSION};
use tonic::Status;

use crate::{remote_model::RemoteModelError, stadium::StadiumError, world::WorldError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("unsupported API version: service implements API version '{expected}', but asked for '{got}'")]
    UnsupportedApi { expected: &'static str, got: String },
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Stadium(#[from] StadiumError),
    #[error(transparent)]
    RemoteModel(#[from] RemoteModelError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} is not available in production")]
    NotAvailable(&'static str),
    #[error("service is shutting down")]
    ShuttingDown,
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::UnsupportedApi { .. } => Status::unimplemented(message),
            ServiceError::Conversion(_) | ServiceError::RemoteModel(RemoteModelError::EmptyName) => {
                Status::invalid_argument(message)
            }
            ServiceError::World(WorldError::CellOccupied(_))
            | ServiceError::RemoteModel(RemoteModelError::AlreadyConnected(_)) => {
                Status::already_exists(message)
            }
            ServiceError::NotFound(_) | ServiceError::Stadium(StadiumError::UnknownSpectator(_)) => {
                Status::not_found(message)
            }
            ServiceError::Stadium(StadiumError::SnapshotTooLarge { .. }) => {
                Status::resource_exhausted(message)
            }
            ServiceError::NotAvailable(_) => Status::failed_precondition(message),
            ServiceError::ShuttingDown => Status::unavailable(message),
        }
    }
}

/// `field` of a `message` request, which proto3 cannot mark as required.
pub(crate) fn required<T>(
    field: Option<T>,
    item: &'static str,
    message: &'static str,
) -> Result<T, ServiceError> {
    field.ok_or_else(|| {
        ConversionError::Missing {
            item,
            r#type: message,
        }
        .into()
    })
}

/// An empty version means "whatever the server speaks".
pub(crate) fn check_api(api: &str) -> Result<(), ServiceError> {
    if api.is_empty() || api == API_VERSION {
        return Ok(());
    }
    Err(ServiceError::UnsupportedApi {
        expected: API_VERSION,
        got: api.to_string(),
    })
}
