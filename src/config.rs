use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// User-Agent sent when the caller has not overridden it.
pub const DEFAULT_USER_AGENT: &str = "xhr-shim";

/// Accept header sent when the caller has not overridden it.
pub const DEFAULT_ACCEPT: &str = "*/*";

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Shim configuration: the default header seed for every request object and
/// the connect timeout used by the bundled TCP transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept")]
    pub accept: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept() -> String {
    DEFAULT_ACCEPT.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn load() -> Self {
        let defaults = Config::default();
        let user_agent =
            std::env::var("XHR_USER_AGENT").unwrap_or(defaults.user_agent);
        let accept = std::env::var("XHR_ACCEPT").unwrap_or(defaults.accept);
        let connect_timeout_ms = std::env::var("XHR_CONNECT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.connect_timeout_ms);

        Self {
            user_agent,
            accept,
            connect_timeout_ms,
        }
    }

    /// Parse configuration handed over by the host as a JSON document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Fresh header map seeded with the configured defaults. Each request
    /// object gets its own copy so instances never alias header storage.
    pub fn default_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        headers.insert("Accept".to_string(), self.accept.clone());
        headers
    }
}
