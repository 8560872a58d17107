//! Client configuration
//!
//! Reads the same variables the mini-app's dev server uses (`VITE_API_URL`,
//! `VITE_PORT`, `VITE_WS_URL`) so one `.env` drives both.

use std::time::Duration;

use reqwest::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_PORT: u16 = 5173;
pub const DEFAULT_API_PATH: &str = "/api/v1";
pub const DEFAULT_WS_PATH: &str = "/ws";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is appended to, e.g. `http://localhost:5173/api/v1`
    pub api_url: Url,
    pub ws_url: Url,
    pub timeout: Duration,
    /// Platform-issued init data sent as `X-Telegram-Init-Data`
    pub init_data: Option<String>,
}

impl ClientConfig {
    /// Config for an explicit API base; the feed URL is derived from it
    pub fn new(api_url: &str) -> ClientResult<Self> {
        let api_url = parse_api_url(api_url, DEFAULT_PORT)?;
        let ws_url = derive_ws_url(&api_url)?;
        Ok(Self {
            api_url,
            ws_url,
            timeout: DEFAULT_TIMEOUT,
            init_data: None,
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable source
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("VITE_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ClientError::Config(format!("VITE_PORT is not a port: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let api_url = parse_api_url(get("VITE_API_URL").as_deref().unwrap_or(DEFAULT_API_PATH), port)?;

        let ws_url = match get("VITE_WS_URL") {
            Some(raw) => parse_ws_url(&raw)?,
            None => derive_ws_url(&api_url)?,
        };

        let timeout = match get("RAFFLE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    ClientError::Config(format!("RAFFLE_TIMEOUT_SECS is not a number: {}", raw))
                })?;
                if secs == 0 {
                    return Err(ClientError::Config("RAFFLE_TIMEOUT_SECS must be positive".to_string()));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_url,
            ws_url,
            timeout,
            init_data: get("RAFFLE_INIT_DATA"),
        })
    }

    pub fn with_init_data(mut self, init_data: impl Into<String>) -> Self {
        self.init_data = Some(init_data.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ws_url(mut self, ws_url: &str) -> ClientResult<Self> {
        self.ws_url = parse_ws_url(ws_url)?;
        Ok(self)
    }

    /// Full URL for an API path such as `/raffles/active`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Relative bases (`/api/v1`) resolve against the local dev server
fn parse_api_url(raw: &str, port: u16) -> ClientResult<Url> {
    let raw = raw.trim();
    let url = if raw.starts_with('/') {
        Url::parse(&format!("http://localhost:{}{}", port, raw))
    } else {
        Url::parse(raw)
    }
    .map_err(|e| ClientError::Config(format!("invalid API URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::Config(format!("unsupported API scheme: {}", other))),
    }
}

fn parse_ws_url(raw: &str) -> ClientResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ClientError::Config(format!("invalid WebSocket URL '{}': {}", raw, e)))?;
    match url.scheme() {
        // proxy targets are bare origins; the backend serves the feed on /ws
        "ws" | "wss" => Ok(with_default_ws_path(url)),
        "http" | "https" => swap_to_ws(url),
        other => Err(ClientError::Config(format!("unsupported WebSocket scheme: {}", other))),
    }
}

fn derive_ws_url(api_url: &Url) -> ClientResult<Url> {
    let mut url = api_url.clone();
    url.set_path(DEFAULT_WS_PATH);
    url.set_query(None);
    swap_to_ws(url)
}

fn with_default_ws_path(mut url: Url) -> Url {
    if url.path().is_empty() || url.path() == "/" {
        url.set_path(DEFAULT_WS_PATH);
    }
    url
}

fn swap_to_ws(url: Url) -> ClientResult<Url> {
    let mut url = with_default_ws_path(url);
    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    url.set_scheme(scheme)
        .map_err(|_| ClientError::Config(format!("cannot use {} as a WebSocket URL", url)))?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5173/api/v1");
        assert_eq!(config.ws_url.as_str(), "ws://localhost:5173/ws");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.init_data.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("VITE_API_URL", "https://raffle.example.com/api/v1"),
            ("VITE_WS_URL", "https://raffle.example.com"),
            ("RAFFLE_TIMEOUT_SECS", "3"),
            ("RAFFLE_INIT_DATA", "query_id=AAE&hash=abc"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.as_str(), "https://raffle.example.com/api/v1");
        assert_eq!(config.ws_url.as_str(), "wss://raffle.example.com/ws");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.init_data.as_deref(), Some("query_id=AAE&hash=abc"));
    }

    #[test]
    fn test_bare_ws_origin_gets_feed_path() {
        let config = ClientConfig::from_lookup(lookup(&[("VITE_WS_URL", "ws://localhost:8000")])).unwrap();
        assert_eq!(config.ws_url.as_str(), "ws://localhost:8000/ws");

        let config = ClientConfig::from_lookup(lookup(&[("VITE_WS_URL", "wss://raffle.example.com/")])).unwrap();
        assert_eq!(config.ws_url.as_str(), "wss://raffle.example.com/ws");

        // an explicit path is kept as given
        let config = ClientConfig::from_lookup(lookup(&[("VITE_WS_URL", "ws://localhost:8000/feed")])).unwrap();
        assert_eq!(config.ws_url.as_str(), "ws://localhost:8000/feed");
    }

    #[test]
    fn test_https_api_derives_wss_feed() {
        let config = ClientConfig::from_lookup(lookup(&[("VITE_API_URL", "https://raffle.example.com:8443/api/v1")])).unwrap();
        assert_eq!(config.ws_url.as_str(), "wss://raffle.example.com:8443/ws");

        let config = ClientConfig::new("https://127.0.0.1:4443/api/v1?debug=1").unwrap();
        assert_eq!(config.ws_url.as_str(), "wss://127.0.0.1:4443/ws");
    }

    #[test]
    fn test_relative_api_url_uses_port() {
        let config = ClientConfig::from_lookup(lookup(&[("VITE_PORT", "8080")])).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/api/v1");
        assert_eq!(config.ws_url.as_str(), "ws://localhost:8080/ws");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("VITE_PORT", "not-a-port")])),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("RAFFLE_TIMEOUT_SECS", "0")])),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("VITE_API_URL", "ftp://host/api")])),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let config = ClientConfig::new("http://127.0.0.1:9000/api/v1/").unwrap();
        assert_eq!(config.endpoint("/raffles/active"), "http://127.0.0.1:9000/api/v1/raffles/active");
        assert_eq!(config.endpoint("user/stats"), "http://127.0.0.1:9000/api/v1/user/stats");
    }
}
