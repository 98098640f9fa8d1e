use courier_core::ConfigError;

const DEFAULT_PORT: u16 = 3000;

/// Configuration for the health-check server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `COURIER_SERVER_PORT` (optional, defaults to 3000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_port(std::env::var("COURIER_SERVER_PORT").ok().as_deref())
    }

    fn from_port(raw: Option<&str>) -> Result<Self, ConfigError> {
        let port = match raw {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigError(format!(
                    "Invalid COURIER_SERVER_PORT '{raw}': must be a port number"
                ))
            })?,
        };

        Ok(Self { port })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
