use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for a fetcher, typically read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetcherConfig {
    pub user_agent: Option<String>,
    /// Client timeout. `None` means the client never times out on its own.
    pub timeout: Option<Duration>,
    /// Default headers in configuration order.
    pub headers: Vec<(String, String)>,
}

impl FetcherConfig {
    /// Read configuration from environment variables.
    ///
    /// - `COURIER_USER_AGENT` (optional)
    /// - `COURIER_TIMEOUT_SECS` (optional, positive integer)
    /// - `COURIER_HEADERS` (optional, `Name: value` pairs separated by `;`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_agent = lookup("COURIER_USER_AGENT").filter(|ua| !ua.trim().is_empty());

        let timeout = match lookup("COURIER_TIMEOUT_SECS") {
            None => None,
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ConfigError(format!(
                        "Invalid COURIER_TIMEOUT_SECS '{raw}': must be a positive integer"
                    ))
                })?;
                if secs == 0 {
                    return Err(ConfigError(
                        "COURIER_TIMEOUT_SECS must be at least 1".into(),
                    ));
                }
                Some(Duration::from_secs(secs))
            }
        };

        let headers = match lookup("COURIER_HEADERS") {
            None => Vec::new(),
            Some(raw) => raw
                .split(';')
                .filter(|entry| !entry.trim().is_empty())
                .map(parse_header)
                .collect::<Result<_, _>>()?,
        };

        Ok(Self {
            user_agent,
            timeout,
            headers,
        })
    }
}

/// Parse a single `Name: value` header line.
///
/// Only the syntax is checked here; header name and value validity is
/// enforced when a request is built.
pub fn parse_header(raw: &str) -> Result<(String, String), ConfigError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| ConfigError(format!("Invalid header '{raw}': expected 'Name: value'")))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError(format!("Invalid header '{raw}': empty name")));
    }

    Ok((name.to_string(), value.trim().to_string()))
}
