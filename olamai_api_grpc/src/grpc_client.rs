use std::time::Duration;

use tonic::{
    metadata::{self, MetadataValue},
    transport::{Channel, ClientTlsConfig, Endpoint},
};
use tracing::Instrument;

use crate::{
    descriptor::MethodDescriptor, ApiClientError, CallMetadata, GrpcBuilderError, GrpcError,
};

const DEFAULT_APP_VERSION: &str = "0.0.0";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(2);
const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared gRPC transport. Cloning is cheap, every clone multiplexes over the
/// same HTTP/2 channel.
#[derive(Clone, Debug)]
pub struct GrpcClient {
    inner: tonic::client::Grpc<Channel>,
    app_version: MetadataValue<metadata::Ascii>,
}

impl GrpcClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    fn build_request<Req, Resp>(
        &self,
        descriptor: &MethodDescriptor<Req, Resp>,
        message: Req,
        metadata: &CallMetadata,
    ) -> Result<tonic::Request<Req>, GrpcError> {
        let mut request = tonic::Request::new(message);
        metadata.apply(request.metadata_mut())?;
        // must be lowercase otherwise panics
        request
            .metadata_mut()
            .insert("x-app-version", self.app_version.clone());
        request.extensions_mut().insert(descriptor.grpc_method());
        Ok(request)
    }

    async fn ready(client: &mut tonic::client::Grpc<Channel>) -> Result<(), GrpcError> {
        client.ready().await.map_err(|e| {
            GrpcError::from(tonic::Status::new(
                tonic::Code::Unknown,
                format!("Service was not ready: {}", e),
            ))
        })
    }

    /// Send a unary request described by `descriptor`.
    pub async fn unary<Req, Resp>(
        &self,
        descriptor: &MethodDescriptor<Req, Resp>,
        message: Req,
        metadata: &CallMetadata,
    ) -> Result<Resp, ApiClientError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let endpoint = descriptor.endpoint;
        let request = self
            .build_request(descriptor, message, metadata)
            .map_err(|e| ApiClientError::new(endpoint, e))?;

        let client = &mut self.inner.clone();
        Self::ready(client)
            .await
            .map_err(|e| ApiClientError::new(endpoint, e))?;

        let codec = tonic::codec::ProstCodec::<Req, Resp>::default();
        tracing::trace!(path = descriptor.path, "unary call");
        client
            .unary(request, descriptor.path_and_query(), codec)
            .await
            .map(tonic::Response::into_inner)
            .map_err(|e| ApiClientError::new(endpoint, e))
    }

    /// Open a server stream described by `descriptor`.
    pub async fn server_streaming<Req, Resp>(
        &self,
        descriptor: &MethodDescriptor<Req, Resp>,
        message: Req,
        metadata: &CallMetadata,
    ) -> Result<tonic::Streaming<Resp>, ApiClientError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let endpoint = descriptor.endpoint;
        let request = self
            .build_request(descriptor, message, metadata)
            .map_err(|e| ApiClientError::new(endpoint, e))?;

        let client = &mut self.inner.clone();
        Self::ready(client)
            .await
            .map_err(|e| ApiClientError::new(endpoint, e))?;

        let codec = tonic::codec::ProstCodec::<Req, Resp>::default();
        tracing::debug!(path = descriptor.path, "opening server stream");
        client
            .server_streaming(request, descriptor.path_and_query(), codec)
            .await
            .map(tonic::Response::into_inner)
            .map_err(|e| ApiClientError::new(endpoint, e))
    }
}

#[derive(Default)]
pub struct ClientBuilder {
    host: Option<String>,
    /// version of the app, sent as `x-app-version`
    app_version: Option<MetadataValue<metadata::Ascii>>,
    /// Whether or not the channel should use TLS
    tls_channel: bool,
}

impl ClientBuilder {
    pub fn set_app_version(&mut self, version: String) -> Result<(), GrpcBuilderError> {
        self.app_version = Some(MetadataValue::try_from(&version)?);
        Ok(())
    }

    pub fn set_tls(&mut self, tls: bool) {
        self.tls_channel = tls;
    }

    pub fn set_host(&mut self, host: String) {
        self.host = Some(host);
    }

    pub async fn build(self) -> Result<GrpcClient, GrpcBuilderError> {
        let host = self.host.ok_or(GrpcBuilderError::MissingHostUrl)?;
        let endpoint = endpoint(host, self.tls_channel)?;
        let span = tracing::debug_span!("grpc_connect", uri = %endpoint.uri());
        let channel = endpoint.connect().instrument(span).await?;

        Ok(GrpcClient {
            inner: tonic::client::Grpc::new(channel),
            app_version: self
                .app_version
                .unwrap_or(MetadataValue::from_static(DEFAULT_APP_VERSION)),
        })
    }
}

/// Connection settings for `host`. Spectator and remote model streams can
/// sit idle between world steps, so pings go out even without open calls
/// and match the server's two second keepalive.
fn endpoint(host: String, tls: bool) -> Result<Endpoint, GrpcBuilderError> {
    let endpoint = Endpoint::from_shared(host)?
        .connect_timeout(CONNECT_TIMEOUT)
        .http2_keep_alive_interval(KEEPALIVE_INTERVAL)
        .keep_alive_timeout(KEEPALIVE_TIMEOUT)
        .keep_alive_while_idle(true);
    if !tls {
        return Ok(endpoint);
    }
    Ok(endpoint.tls_config(ClientTlsConfig::new().with_enabled_roots())?)
}
