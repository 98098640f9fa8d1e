pub mod config;
pub mod error;

pub use config::{FetcherConfig, parse_header};
pub use error::{BoxError, ConfigError, FetchError, TransportError};
