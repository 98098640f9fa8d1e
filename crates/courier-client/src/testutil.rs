//! Test utilities: a recording [`Transport`] double.
//!
//! The mock never opens a socket. It records every request it receives and
//! replies from a queue, so tests can assert on what was (or was not) sent.

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use reqwest::{Method, Request, Response};
use url::Url;

use courier_core::error::TransportError;

use crate::transport::Transport;

/// A request as seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

enum Reply {
    Status(u16, String),
    Error(TransportError),
    Hang,
}

/// Mock transport with a queue of replies.
///
/// Each call pops the first queued reply. When the queue is empty it answers
/// `200 OK` with body `"OK"`.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<Vec<Reply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self::with_reply(Reply::Status(status, body.to_string()))
    }

    pub fn with_error(error: TransportError) -> Self {
        Self::with_reply(Reply::Error(error))
    }

    /// A transport whose first request never completes.
    pub fn hanging() -> Self {
        Self::with_reply(Reply::Hang)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            replies: Arc::new(Mutex::new(vec![reply])),
            requests: Arc::default(),
        }
    }

    /// Number of requests that reached the transport.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, TransportError>> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
        });

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Reply::Status(200, "OK".to_string())
            } else {
                replies.remove(0)
            }
        };

        Box::pin(async move {
            match reply {
                Reply::Status(status, body) => {
                    let response = http::Response::builder()
                        .status(status)
                        .body(body)
                        .unwrap();
                    Ok(Response::from(response))
                }
                Reply::Error(error) => Err(error),
                Reply::Hang => std::future::pending().await,
            }
        })
    }
}
