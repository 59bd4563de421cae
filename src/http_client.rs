use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use std::{fmt::Debug, sync::Arc};

/// Error returned by an [`HttpClient`].
pub type HttpError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Transport used to deliver items to Rollbar.
///
/// Implementations must be safe to use from several outstanding requests at once. Timeouts,
/// TLS, and connection reuse are entirely up to the implementation.
#[async_trait]
pub trait HttpClient: Debug + Send + Sync {
    /// Send the request and resolve with the status code and body of the response.
    ///
    /// Non-2xx responses are not errors at this level. Return `Err` only when no response
    /// could be obtained.
    async fn send_bytes(&self, request: Request<Bytes>) -> Result<Response<Bytes>, HttpError>;
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    async fn send_bytes(&self, request: Request<Bytes>) -> Result<Response<Bytes>, HttpError> {
        self.as_ref().send_bytes(request).await
    }
}

#[cfg(feature = "reqwest")]
mod reqwest {
    use super::{async_trait, Bytes, HttpClient, HttpError, Request, Response};
    use std::convert::TryInto;

    #[async_trait]
    impl HttpClient for reqwest::Client {
        async fn send_bytes(
            &self,
            request: Request<Bytes>,
        ) -> Result<Response<Bytes>, HttpError> {
            let request: reqwest::Request = request.try_into()?;
            let response = self.execute(request).await?;
            Ok(Response::builder()
                .status(response.status())
                .body(response.bytes().await?)?)
        }
    }
}
