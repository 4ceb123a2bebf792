use std::sync::Arc;

use serde_json::Value;
use time::{Duration, OffsetDateTime};

use crate::cancel::CancelToken;
use crate::domain::format_day;
use crate::error::LoadError;
use crate::http_client::{HttpClient, HttpRequest};

/// Environment variable overriding the proxy base URL.
const PROXY_URL_ENV: &str = "MARKETSCOPE_PROXY_URL";

const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";

/// Connection settings for the allow-listed upstream proxy.
///
/// The proxy owns host allow-listing, API key injection, and cache headers;
/// the core only needs its base URL and a request timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var(PROXY_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| String::from(DEFAULT_PROXY_URL));
        Self {
            base_url,
            timeout_ms: 10_000,
        }
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: 10_000,
        }
    }
}

/// Day range for a load, `YYYY-MM-DD` at both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Range {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl Range {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// Fill missing ends with the default lookback: the last two years.
    pub fn resolve(self) -> Self {
        let now = OffsetDateTime::now_utc();
        let two_years_back = now
            .replace_year(now.year() - 2)
            .unwrap_or(now - Duration::days(730));

        Self {
            from: self
                .from
                .or_else(|| Some(format_day(two_years_back.unix_timestamp()))),
            to: self.to.or_else(|| Some(format_day(now.unix_timestamp()))),
        }
    }
}

/// One proxy query: the `src` selector plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyQuery {
    src: &'static str,
    params: Vec<(&'static str, String)>,
}

impl ProxyQuery {
    pub fn new(src: &'static str) -> Self {
        Self {
            src,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    pub fn param_opt(self, key: &'static str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    fn to_url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}/api/proxy?src={}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(self.src)
        );
        for (key, value) in &self.params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}

/// Client for the upstream-proxying endpoint.
///
/// Single-shot fetch only; the retry loop lives in the load controller.
#[derive(Clone)]
pub struct ProxyClient {
    config: ProxyConfig,
    http: Arc<dyn HttpClient>,
}

impl ProxyClient {
    pub fn new(config: ProxyConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    /// Execute one query and parse the response body as JSON.
    ///
    /// `kind` names the logical load ("price", "cot") for error messages.
    /// Status mapping: 429 → rate-limited; other non-2xx → upstream error,
    /// preferring the upstream `{"error": ...}` body over the generic
    /// `"<kind> fetch error: <status>"`; a 2xx body that is not JSON is also
    /// an upstream error. Transport failures and cancellation pass through
    /// with their own kinds.
    pub async fn fetch_json(
        &self,
        query: &ProxyQuery,
        kind: &'static str,
        cancel: CancelToken,
    ) -> Result<Value, LoadError> {
        let request = HttpRequest::get(query.to_url(&self.config.base_url))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http.execute(request, cancel).await.map_err(|error| {
            if error.is_cancelled() {
                LoadError::cancelled()
            } else {
                LoadError::transport(format!("{kind} fetch failed: {}", error.message()))
            }
        })?;

        if !response.is_success() {
            let message = upstream_message(&response.body)
                .unwrap_or_else(|| format!("{kind} fetch error: {}", response.status));
            return if response.status == 429 {
                Err(LoadError::rate_limited(message))
            } else {
                Err(LoadError::upstream(message))
            };
        }

        serde_json::from_str(&response.body)
            .map_err(|_| LoadError::upstream(format!("{kind} fetch error: malformed response body")))
    }
}

/// Pull the `error` string out of a proxy failure body, if it has one.
fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value.get("error")?.as_str()?.trim();
    (!message.is_empty()).then(|| message.to_owned())
}
