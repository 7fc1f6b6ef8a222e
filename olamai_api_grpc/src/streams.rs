use std::{
    error::Error,
    io::ErrorKind,
    pin::Pin,
    task::{ready, Context, Poll},
};

use futures::{stream::FusedStream, Stream, TryStream};
use olamai_proto::{
    v1::{CellUpdate, Observation},
    ApiEndpoint,
};
use pin_project_lite::pin_project;
use tonic::Status;

use crate::ApiClientError;

/// Cell updates for one spectator.
pub type SpectatorStream = ApiStream<tonic::Streaming<CellUpdate>>;

/// Observations of every agent driven by one remote model, once per world step.
pub type ObservationStream = ApiStream<tonic::Streaming<Observation>>;

pin_project! {
    /// Server stream of one endpoint. Errors come out as [`ApiClientError`]
    /// tagged with that endpoint.
    ///
    /// A status caused by a broken pipe (the HTTP/2 keepalive went
    /// unanswered) is yielded once and then the stream ends. Any other
    /// status leaves the stream open.
    pub struct ApiStream<S> {
        #[pin] inner: S,
        endpoint: ApiEndpoint,
        connection_lost: bool,
    }
}

impl<S> ApiStream<S> {
    pub fn new(inner: S, endpoint: ApiEndpoint) -> Self {
        Self {
            inner,
            endpoint,
            connection_lost: false,
        }
    }

    pub fn endpoint(&self) -> ApiEndpoint {
        self.endpoint
    }
}

fn is_broken_pipe(status: &Status) -> bool {
    let io = status
        .source()
        .and_then(|e| e.downcast_ref::<hyper::Error>())
        .and_then(|e| e.source())
        .and_then(|e| e.downcast_ref::<h2::Error>())
        .and_then(h2::Error::get_io);
    io.is_some_and(|io| io.kind() == ErrorKind::BrokenPipe)
}

impl<S> Stream for ApiStream<S>
where
    S: TryStream<Error = Status>,
{
    type Item = Result<S::Ok, ApiClientError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.connection_lost {
            return Poll::Ready(None);
        }
        let Some(item) = ready!(this.inner.try_poll_next(cx)) else {
            return Poll::Ready(None);
        };
        Poll::Ready(Some(item.map_err(|status| {
            tracing::warn!(endpoint = %this.endpoint, %status, "error on server stream");
            if is_broken_pipe(&status) {
                *this.connection_lost = true;
            }
            ApiClientError::new(*this.endpoint, status)
        })))
    }
}

impl<S> FusedStream for ApiStream<S>
where
    S: TryStream<Error = Status>,
{
    fn is_terminated(&self) -> bool {
        self.connection_lost
    }
}
