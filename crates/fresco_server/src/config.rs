//! Process-wide server configuration.

use derive_getters::Getters;
use fresco_error::{ConfigError, FrescoResult};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 7001;

/// Configuration read once at startup and shared immutably by all sessions.
#[derive(Debug, Clone, PartialEq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ServerConfig {
    /// Listen host
    #[builder(default = "DEFAULT_HOST.to_string()")]
    host: String,
    /// Listen port
    #[builder(default = "DEFAULT_PORT")]
    port: u16,
    /// Fallback credential used when a request does not carry its own
    #[builder(default)]
    openai_api_key: Option<String>,
    /// Root directory for transcript logs
    #[builder(default = "PathBuf::from(\".\")")]
    logs_path: PathBuf,
    /// Serve canned completions instead of calling upstream
    #[builder(default)]
    mock: bool,
}

impl ServerConfig {
    /// Create config from environment variables
    ///
    /// Reads:
    /// - `FRESCO_HOST` (default: "0.0.0.0")
    /// - `FRESCO_PORT` (default: 7001)
    /// - `OPENAI_API_KEY` (optional fallback credential)
    /// - `LOGS_PATH` (default: current directory)
    /// - `MOCK` (default: false)
    pub fn from_env() -> FrescoResult<Self> {
        let host = std::env::var("FRESCO_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var("FRESCO_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                ConfigError::new(format!("FRESCO_PORT is not a port number: {}", raw))
            })?,
            Err(_) => DEFAULT_PORT,
        };
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let logs_path = std::env::var("LOGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let mock = std::env::var("MOCK")
            .map(|raw| raw == "1" || raw.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(ServerConfigBuilder::default()
            .host(host)
            .port(port)
            .openai_api_key(openai_api_key)
            .logs_path(logs_path)
            .mock(mock)
            .build()
            .expect("Valid ServerConfig"))
    }
}
