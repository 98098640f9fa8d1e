use thiserror::Error;

/// Boxed error used to carry the underlying cause of a failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by a single fetch.
///
/// Each variant keeps its originating cause reachable through
/// [`std::error::Error::source`], so callers can tell a malformed link apart
/// from a request that could not be built or a request that never completed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The link is not a syntactically valid URL. No network call was made.
    #[error("failed to parse link '{link}': {source}")]
    Parse {
        link: String,
        #[source]
        source: url::ParseError,
    },

    /// The request could not be constructed (e.g. an invalid configured header).
    #[error("failed to build request: {0}")]
    RequestBuild(#[source] BoxError),

    /// The request was dispatched but no response was received.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl FetchError {
    /// Returns true if the link could not be parsed.
    pub fn is_parse(&self) -> bool {
        matches!(self, FetchError::Parse { .. })
    }

    /// Returns true if the request could not be built.
    pub fn is_request_build(&self) -> bool {
        matches!(self, FetchError::RequestBuild(_))
    }

    /// Returns true if the failure happened at or after dispatch.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }

    /// Returns true if this error is transient and worth retrying.
    ///
    /// The fetcher never retries on its own; this is a hint for callers that
    /// implement their own policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(e) => e.is_retryable(),
            FetchError::Parse { .. } | FetchError::RequestBuild(_) => false,
        }
    }
}

/// Failure of the transport layer to produce a response.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The caller cancelled the request before a response arrived.
    #[error("request cancelled")]
    Cancelled,

    /// The request exceeded the client's timeout.
    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),

    /// DNS resolution, TCP connect or TLS handshake failed.
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    /// Any other transport failure.
    #[error("{0}")]
    Other(#[source] BoxError),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Timeout(_) | TransportError::Connect(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }
}

/// Invalid or missing configuration.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);
