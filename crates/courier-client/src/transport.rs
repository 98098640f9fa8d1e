use futures::future::BoxFuture;
use reqwest::{Client, Request, Response};

use courier_core::error::TransportError;

/// Executes a single HTTP request.
///
/// [`reqwest::Client`] is the production implementation. Test doubles
/// implement this to intercept requests without opening a socket.
pub trait Transport: Send + Sync {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, TransportError>>;
}

impl Transport for Client {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, TransportError>> {
        Box::pin(async move { Client::execute(self, request).await.map_err(classify) })
    }
}

/// Map a reqwest failure onto the transport error taxonomy.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(Box::new(err))
    } else if err.is_connect() {
        TransportError::Connect(Box::new(err))
    } else {
        TransportError::Other(Box::new(err))
    }
}
