//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Client configuration for connecting to the Samiti backend
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SAMITI_API_URL | http://localhost:5000 | Backend base URL |
/// | SAMITI_TIMEOUT_SECS | 30 | Per-request timeout |
/// | SAMITI_SESSION_FILE | (none) | Where the login session is persisted |
/// | SAMITI_POLL_INTERVAL_MS | 3000 | Payment verify interval |
/// | SAMITI_POLL_HORIZON_MS | 30000 | Give up payment polling after this long |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://api.samiti.org")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Session file; `None` keeps the session in memory only
    pub session_file: Option<PathBuf>,

    /// Payment status polling interval
    pub poll_interval: Duration,

    /// Payment status polling horizon
    pub poll_horizon: Duration,
}

impl ClientConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
    pub const DEFAULT_POLL_HORIZON: Duration = Duration::from_secs(30);

    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            session_file: None,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            poll_horizon: Self::DEFAULT_POLL_HORIZON,
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("SAMITI_API_URL").unwrap_or_else(|_| "http://localhost:5000".into()),
        );
        if let Some(timeout) = env_parse("SAMITI_TIMEOUT_SECS") {
            config.timeout = timeout;
        }
        config.session_file = std::env::var("SAMITI_SESSION_FILE").ok().map(PathBuf::from);
        if let Some(ms) = env_parse::<u64>("SAMITI_POLL_INTERVAL_MS").filter(|ms| *ms > 0) {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("SAMITI_POLL_HORIZON_MS").filter(|ms| *ms > 0) {
            config.poll_horizon = Duration::from_millis(ms);
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Persist the session to this file
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Set the payment polling interval and horizon. Zero keeps the
    /// current value.
    pub fn with_polling(mut self, interval: Duration, horizon: Duration) -> Self {
        if !interval.is_zero() {
            self.poll_interval = interval;
        }
        if !horizon.is_zero() {
            self.poll_horizon = horizon;
        }
        self
    }

    /// Base URL without a trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
