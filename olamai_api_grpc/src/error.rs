use olamai_proto::ApiEndpoint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrpcBuilderError {
    #[error("host url required to create client")]
    MissingHostUrl,
    #[error(transparent)]
    Metadata(#[from] tonic::metadata::errors::InvalidMetadataValue),
    #[error("Invalid URI during channel creation")]
    InvalidUri(#[from] http::uri::InvalidUri),
    #[error(transparent)]
    Transport(#[from] tonic::transport::Error),
}

#[derive(Debug, Error)]
pub enum GrpcError {
    #[error(transparent)]
    Status(#[from] tonic::Status),
    #[error("invalid metadata key {0:?}")]
    MetadataKey(String),
    #[error(transparent)]
    MetadataValue(#[from] tonic::metadata::errors::InvalidMetadataValue),
}

impl GrpcError {
    pub fn status(&self) -> Option<&tonic::Status> {
        match self {
            GrpcError::Status(s) => Some(s),
            _ => None,
        }
    }
}

/// Error returned by every client call, tagged with the endpoint that produced it.
#[derive(Debug, Error)]
#[error("api client at endpoint \"{}\" has error {}", endpoint, source)]
pub struct ApiClientError {
    pub endpoint: ApiEndpoint,
    pub source: GrpcError,
}

impl ApiClientError {
    pub fn new(endpoint: ApiEndpoint, source: impl Into<GrpcError>) -> Self {
        Self {
            endpoint,
            source: source.into(),
        }
    }

    /// The gRPC status code, if the server answered at all.
    pub fn code(&self) -> Option<tonic::Code> {
        self.source.status().map(tonic::Status::code)
    }

    pub fn message(&self) -> Option<&str> {
        self.source.status().map(tonic::Status::message)
    }
}
