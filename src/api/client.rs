//! HTTP transport for the raffle backend
//!
//! Every request goes through two hooks:
//! - outbound: the init-data provider is asked for the platform auth string,
//!   which is sent as `X-Telegram-Init-Data` when present
//! - inbound: transport errors, non-2xx statuses and undecodable bodies are
//!   logged and returned as `ClientError`

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

pub const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

/// Source of the mini-app's init data, consulted on every request
pub trait InitDataProvider: Send + Sync {
    fn init_data(&self) -> Option<String>;
}

/// Init data fixed at construction (or absent)
#[derive(Debug, Clone, Default)]
pub struct StaticInitData(Option<String>);

impl StaticInitData {
    pub fn new(init_data: Option<String>) -> Self {
        Self(init_data.filter(|s| !s.is_empty()))
    }
}

impl InitDataProvider for StaticInitData {
    fn init_data(&self) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    init_data: Arc<dyn InitDataProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_url", &self.config.api_url.as_str())
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl ApiClient {
    /// Client whose init data comes from the config
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let provider = StaticInitData::new(config.init_data.clone());
        Self::with_provider(config, Arc::new(provider))
    }

    pub fn with_provider(config: ClientConfig, init_data: Arc<dyn InitDataProvider>) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        debug!("API client ready: {} (timeout {:?})", config.api_url, config.timeout);

        Ok(Self { http, config, init_data })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.request(Method::GET, path);
        self.execute(Method::GET, path, builder).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        self.execute(Method::GET, path, builder).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.execute(Method::POST, path, builder).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.config.endpoint(path));
        match self.init_data.init_data() {
            Some(init_data) => builder.header(INIT_DATA_HEADER, init_data),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> ClientResult<T> {
        debug!("→ {} {}", method, path);
        let result = read_response(builder).await;
        if let Err(e) = &result {
            error!("API Error: {} {} failed: {}", method, path, e);
        }
        result
    }
}

async fn read_response<T: DeserializeOwned>(builder: RequestBuilder) -> ClientResult<T> {
    let response = builder.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ClientError::Api {
            status: status.as_u16(),
            detail: extract_detail(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// FastAPI puts the reason in `detail`; validation errors use a list there,
/// which is not a displayable message.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail() {
        assert_eq!(
            extract_detail(r#"{"detail":"Raffle not found"}"#).as_deref(),
            Some("Raffle not found")
        );
        assert_eq!(extract_detail(r#"{"detail":[{"loc":["body","tx_hash"]}]}"#), None);
        assert_eq!(extract_detail(r#"{"detail":""}"#), None);
        assert_eq!(extract_detail("<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn test_static_init_data_ignores_empty() {
        assert_eq!(StaticInitData::new(Some(String::new())).init_data(), None);
        assert_eq!(
            StaticInitData::new(Some("user=1&hash=ff".to_string())).init_data().as_deref(),
            Some("user=1&hash=ff")
        );
    }
}
