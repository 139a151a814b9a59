use std::time::Duration;

use url::Url;

use crate::error::Error;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_REFRESH_PATH: &str = "/auth/token/refresh/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Backend connection settings.
///
/// The base URL is a constructor parameter; everything else has a default.
///
/// ```rust,ignore
/// use canteen_client::ClientConfig;
///
/// let config = ClientConfig::new("https://canteen.example.edu/api".parse()?)
///     .with_timeout(std::time::Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) refresh_path: String,
    pub(crate) timeout: Duration,
    pub(crate) poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_BASE_URL).expect("valid default URL"))
    }
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            refresh_path: DEFAULT_REFRESH_PATH.into(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Create config from environment variables.
    ///
    /// # Optional env vars
    /// - `CANTEEN_API_URL`: backend base URL (default `http://localhost:8000/api`)
    /// - `CANTEEN_REFRESH_PATH`: token refresh endpoint path
    /// - `CANTEEN_TIMEOUT_SECS`: per-request timeout in seconds
    /// - `CANTEEN_POLL_INTERVAL_SECS`: order tracker poll interval in seconds
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = match std::env::var("CANTEEN_API_URL") {
            Ok(url_str) => Self::new(
                url_str
                    .parse()
                    .map_err(|e| Error::Config(format!("CANTEEN_API_URL: {e}")))?,
            ),
            Err(_) => Self::default(),
        };

        if let Ok(path) = std::env::var("CANTEEN_REFRESH_PATH") {
            config = config.with_refresh_path(path);
        }
        if let Some(secs) = env_secs("CANTEEN_TIMEOUT_SECS")? {
            config = config.with_timeout(secs);
        }
        if let Some(secs) = env_secs("CANTEEN_POLL_INTERVAL_SECS")? {
            config = config.with_poll_interval(secs);
        }

        Ok(config)
    }

    /// Override the token refresh endpoint path.
    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Override the per-request timeout (default 30 s).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the order tracker poll interval (default 30 s).
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn refresh_path(&self) -> &str {
        &self.refresh_path
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Absolute URL for an endpoint path such as `/food-courts/`.
    ///
    /// Endpoints are appended to the base path, so a base of
    /// `http://host/api` and `/food-courts/` give `http://host/api/food-courts/`.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    #[must_use]
    pub fn refresh_url(&self) -> String {
        self.endpoint_url(&self.refresh_path)
    }
}

fn env_secs(key: &str) -> Result<Option<Duration>, Error> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|e| Error::Config(format!("{key}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();

        assert_eq!(config.base_url().as_str(), "http://localhost:8000/api");
        assert_eq!(config.refresh_path(), "/auth/token/refresh/");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_endpoint_url_joins_under_base_path() {
        let config = ClientConfig::new("http://localhost:8000/api/".parse().unwrap());

        assert_eq!(
            config.endpoint_url("/food-courts/"),
            "http://localhost:8000/api/food-courts/"
        );
        assert_eq!(
            config.refresh_url(),
            "http://localhost:8000/api/auth/token/refresh/"
        );
    }

    // The only test touching these variables, so no other test races it.
    #[test]
    fn test_from_env() {
        const VARS: [&str; 4] = [
            "CANTEEN_API_URL",
            "CANTEEN_REFRESH_PATH",
            "CANTEEN_TIMEOUT_SECS",
            "CANTEEN_POLL_INTERVAL_SECS",
        ];
        let set = |key: &str, value: &str| unsafe { std::env::set_var(key, value) };
        let reset = || {
            for key in VARS {
                unsafe { std::env::remove_var(key) };
            }
        };

        reset();
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8000/api");
        assert_eq!(config.timeout(), Duration::from_secs(30));

        set("CANTEEN_API_URL", "https://canteen.example.edu/api");
        set("CANTEEN_REFRESH_PATH", "/token/refresh/");
        set("CANTEEN_TIMEOUT_SECS", " 12 ");
        set("CANTEEN_POLL_INTERVAL_SECS", "5");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(
            config.endpoint_url("/food-courts/"),
            "https://canteen.example.edu/api/food-courts/"
        );
        assert_eq!(config.refresh_url(), "https://canteen.example.edu/api/token/refresh/");
        assert_eq!(config.timeout(), Duration::from_secs(12));
        assert_eq!(config.poll_interval(), Duration::from_secs(5));

        set("CANTEEN_TIMEOUT_SECS", "soon");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.starts_with("CANTEEN_TIMEOUT_SECS")));

        set("CANTEEN_TIMEOUT_SECS", "12");
        set("CANTEEN_API_URL", "not a url");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.starts_with("CANTEEN_API_URL")));

        reset();
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::new("https://canteen.example.edu".parse().unwrap())
            .with_refresh_path("/token/refresh/")
            .with_timeout(Duration::from_secs(5))
            .with_poll_interval(Duration::from_secs(10));

        assert_eq!(config.refresh_url(), "https://canteen.example.edu/token/refresh/");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
    }
}
