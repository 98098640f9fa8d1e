//! Outbound HTTP fetcher: builder-configured headers, user agent, client and
//! transport, with per-call cancellation.

pub mod fetcher;
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
pub mod transport;

pub use fetcher::{Fetcher, FetcherBuilder};
pub use transport::Transport;

pub use reqwest::{Client, Response};
pub use tokio_util::sync::CancellationToken;
