use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, Request, Response};
use tokio_util::sync::CancellationToken;
use tracing::Span;
use url::Url;

use courier_core::config::FetcherConfig;
use courier_core::error::{BoxError, ConfigError, FetchError, TransportError};

use crate::transport::Transport;

const USER_AGENT: &str = "User-Agent";

/// Outbound HTTP fetcher.
///
/// Performs exactly one GET per [`fetch`](Self::fetch) call and hands back the
/// raw response. Non-2xx statuses are not errors; interpreting the status and
/// closing the body are left to the caller.
///
/// Configuration is fixed at construction, so a `Fetcher` (and any clone of
/// it) can be shared freely between tasks.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    transport: Option<Arc<dyn Transport>>,
    headers: Option<Vec<(String, String)>>,
    span: Span,
}

impl Fetcher {
    /// Create a fetcher with a default client, no custom headers and no
    /// transport override.
    ///
    /// Log events are recorded under a child of `logger` tagged
    /// `service = "http"`.
    pub fn new(logger: &Span) -> Self {
        FetcherBuilder::new(logger).build()
    }

    /// Start configuring a fetcher. See [`FetcherBuilder`].
    pub fn builder(logger: &Span) -> FetcherBuilder {
        FetcherBuilder::new(logger)
    }

    /// Headers applied to every outgoing request, in configuration order.
    pub fn headers(&self) -> &[(String, String)] {
        self.headers.as_deref().unwrap_or_default()
    }

    /// Whether requests go through a transport override instead of the client.
    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    /// Fetch `link` with a GET request.
    ///
    /// Cancelling `cancel` aborts the in-flight request and yields
    /// [`TransportError::Cancelled`].
    pub async fn fetch(
        &self,
        cancel: &CancellationToken,
        link: &str,
    ) -> Result<Response, FetchError> {
        let url = Url::parse(link).map_err(|source| {
            tracing::error!(
                parent: &self.span,
                method = "fetch",
                link,
                error = %source,
                "failed to parse link"
            );
            FetchError::Parse {
                link: link.to_string(),
                source,
            }
        })?;

        let request = self.build_request(url).map_err(|e| {
            tracing::error!(
                parent: &self.span,
                method = "fetch",
                link,
                error = %e,
                "failed to build request"
            );
            FetchError::RequestBuild(e)
        })?;

        self.dispatch(cancel, request).await.map_err(|e| {
            tracing::debug!(
                parent: &self.span,
                method = "fetch",
                link,
                error = %e,
                "request failed"
            );
            FetchError::Transport(e)
        })
    }

    /// Build the GET request. Scheme support is left to the transport, so
    /// any parsed URL reaches dispatch.
    fn build_request(&self, url: Url) -> Result<Request, BoxError> {
        let mut request = Request::new(Method::GET, url);

        let headers = request.headers_mut();
        for (name, value) in self.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            let value = HeaderValue::from_str(value)?;
            headers.insert(name, value);
        }

        Ok(request)
    }

    async fn dispatch(
        &self,
        cancel: &CancellationToken,
        request: Request,
    ) -> Result<Response, TransportError> {
        let transport: &dyn Transport = match &self.transport {
            Some(transport) => transport.as_ref(),
            None => &self.client,
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(TransportError::Cancelled),
            result = transport.execute(request) => result,
        }
    }
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("headers", &self.headers)
            .field("has_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Fetcher`].
///
/// Options apply in call order. When two options touch the same state the
/// later one wins.
pub struct FetcherBuilder {
    client: Client,
    transport: Option<Arc<dyn Transport>>,
    headers: Option<Vec<(String, String)>>,
    span: Span,
}

impl FetcherBuilder {
    /// A builder with a default client and nothing else configured.
    pub fn new(logger: &Span) -> Self {
        Self {
            client: Client::new(),
            transport: None,
            headers: None,
            span: tracing::error_span!(parent: logger, "fetcher", service = "http"),
        }
    }

    /// Seed a builder from configuration: a client with the configured
    /// timeout, then the configured user agent, then the configured headers
    /// merged on top.
    pub fn from_config(logger: &Span, config: &FetcherConfig) -> Result<Self, ConfigError> {
        let mut client = Client::builder();
        if let Some(timeout) = config.timeout {
            client = client.timeout(timeout);
        }
        let client = client
            .build()
            .map_err(|e| ConfigError(format!("Failed to build HTTP client: {e}")))?;

        let mut builder = Self::new(logger).client(Some(client));
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        for (name, value) in &config.headers {
            set_header(
                builder.headers.get_or_insert_with(Vec::new),
                name.clone(),
                value.clone(),
            );
        }

        Ok(builder)
    }

    /// Execute requests through `transport` instead of the owned client.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set the `User-Agent` header, overwriting any previous value.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        set_header(
            self.headers.get_or_insert_with(Vec::new),
            USER_AGENT.to_string(),
            value.into(),
        );
        self
    }

    /// Replace every configured header, including a previously set user agent.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fresh = Vec::new();
        for (name, value) in headers {
            set_header(&mut fresh, name.into(), value.into());
        }
        self.headers = Some(fresh);
        self
    }

    /// Replace the owned client. `None` keeps the current one.
    pub fn client(mut self, client: Option<Client>) -> Self {
        if let Some(client) = client {
            self.client = client;
        }
        self
    }

    /// Freeze the configuration into a [`Fetcher`].
    pub fn build(self) -> Fetcher {
        Fetcher {
            client: self.client,
            transport: self.transport,
            headers: self.headers,
            span: self.span,
        }
    }
}

/// Insert or overwrite a header. Names compare case-insensitively.
fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
    {
        Some(entry) => *entry = (name, value),
        None => headers.push((name, value)),
    }
}
