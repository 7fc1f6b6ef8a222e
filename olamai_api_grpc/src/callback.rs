use std::future::Future;

use tokio::task::JoinHandle;

use crate::ApiClientError;

/// Drive `call` to completion on the current runtime and hand the outcome to
/// `callback`. The callback runs exactly once, with either the response or
/// the error the async call returned.
///
/// Must be called from within a tokio runtime.
pub fn spawn_with_callback<T, Fut, F>(call: Fut, callback: F) -> JoinHandle<()>
where
    Fut: Future<Output = Result<T, ApiClientError>> + Send + 'static,
    T: Send + 'static,
    F: FnOnce(Result<T, ApiClientError>) + Send + 'static,
{
    tokio::spawn(async move {
        let result = call.await;
        if let Err(e) = &result {
            tracing::debug!("{} failed: {}", e.endpoint, e.source);
        }
        callback(result)
    })
}

/// Generates the async and callback flavour of each unary method.
/// The client type must have a `transport: GrpcClient` field.
macro_rules! unary_methods {
    ($(
        $(#[$attr:meta])*
        $name:ident, $with_callback:ident => $descriptor:path, $req:ty => $resp:ty;
    )*) => {
        $(
            $(#[$attr])*
            pub async fn $name(
                &self,
                request: $req,
                metadata: &$crate::CallMetadata,
            ) -> Result<$resp, $crate::ApiClientError> {
                self.transport.unary(&$descriptor, request, metadata).await
            }

            $(#[$attr])*
            ///
            /// Callback flavour: the callback receives exactly what the async
            /// call would have returned.
            pub fn $with_callback<F>(
                &self,
                request: $req,
                metadata: &$crate::CallMetadata,
                callback: F,
            ) -> tokio::task::JoinHandle<()>
            where
                F: FnOnce(Result<$resp, $crate::ApiClientError>) + Send + 'static,
            {
                let transport = self.transport.clone();
                let metadata = metadata.clone();
                $crate::callback::spawn_with_callback(
                    async move { transport.unary(&$descriptor, request, &metadata).await },
                    callback,
                )
            }
        )*
    };
}
