use std::time::Duration;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the resman API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Quiet period before a filter change triggers a fetch.
    pub filter_debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout: Duration::from_secs(30),
            filter_debounce: Duration::from_millis(500),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                  |
    /// |-------------------------------|--------------------------|
    /// | `RESMAN_API_URL`              | `http://localhost:3000`  |
    /// | `RESMAN_REQUEST_TIMEOUT_SECS` | `30`                     |
    /// | `RESMAN_FILTER_DEBOUNCE_MS`   | `500`                    |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("RESMAN_API_URL").unwrap_or(defaults.base_url);

        let request_timeout = std::env::var("RESMAN_REQUEST_TIMEOUT_SECS")
            .map(|v| {
                Duration::from_secs(
                    v.parse()
                        .expect("RESMAN_REQUEST_TIMEOUT_SECS must be a valid u64"),
                )
            })
            .unwrap_or(defaults.request_timeout);

        let filter_debounce = std::env::var("RESMAN_FILTER_DEBOUNCE_MS")
            .map(|v| {
                Duration::from_millis(
                    v.parse()
                        .expect("RESMAN_FILTER_DEBOUNCE_MS must be a valid u64"),
                )
            })
            .unwrap_or(defaults.filter_debounce);

        Self {
            base_url,
            request_timeout,
            filter_debounce,
        }
    }
}
