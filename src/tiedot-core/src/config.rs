use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

pub const URL_VAR: &str = "TIEDOT_URL";
pub const PORT_VAR: &str = "TIEDOT_PORT";
pub const TIMEOUT_VAR: &str = "TIEDOT_TIMEOUT_SECS";

static GLOBAL: OnceLock<ClientConfig> = OnceLock::new();

/// Location of the tiedot HTTP API and per-request settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Scheme and host, without port or trailing slash
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost".to_string()
}

fn default_port() -> u16 {
    5830
}

fn default_timeout_secs() -> u64 {
    5
}

impl ClientConfig {
    /// Process-wide config, resolved from the environment on first use.
    ///
    /// Later calls return the same instance even if the environment changed.
    pub fn global() -> &'static ClientConfig {
        GLOBAL.get_or_init(Self::from_env)
    }

    /// Resolve from `TIEDOT_URL`, `TIEDOT_PORT` and `TIEDOT_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` in place of the process environment.
    ///
    /// Unset or empty values use the defaults. Values that fail to parse,
    /// and a zero timeout, fall back to the defaults as well.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Self {
            url: get(URL_VAR).unwrap_or_else(default_url),
            port: get(PORT_VAR)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or_else(default_port),
            timeout_secs: get(TIMEOUT_VAR)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or_else(default_timeout_secs),
        }
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// `<url>:<port>/`
    pub fn base_url(&self) -> String {
        self.to_string()
    }

    pub fn endpoint(&self, name: &str) -> String {
        format!("{}{}", self, name)
    }

    /// Per-request timeout; zero means the default
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(default_timeout_secs()),
            secs => Duration::from_secs(secs),
        }
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/", self.url, self.port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
