//! Resilient load control.
//!
//! One [`LoadSlot`] per logical data kind (price, positioning). A slot is a
//! small state machine (idle, loading, done, error) where `loading` is
//! re-entrant: every new load first cancels the outstanding request for the
//! slot, so the last request always wins. Superseded or cancelled completions
//! are strict no-ops: they neither touch slot state nor surface an error.

use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;

use crate::adapters::{alphavantage, cftc, finnhub, fmp};
use crate::cancel::CancelToken;
use crate::domain::{normalize, parse_day, Bar, CotPoint};
use crate::error::{LoadError, ValidationError};
use crate::markets::MarketAliases;
use crate::proxy::{ProxyClient, ProxyQuery, Range};
use crate::retry::RetryPolicy;

/// Caller-visible lifecycle of a load slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Done,
    Error,
}

impl LoadState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

/// Point-in-time copy of a slot's caller-visible state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotSnapshot<T> {
    pub state: LoadState,
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct SlotInner<T> {
    state: LoadState,
    data: Vec<T>,
    error: Option<String>,
    token: Option<CancelToken>,
    generation: u64,
}

/// State machine for one logical load.
///
/// Slots are independent; nothing is shared between the price and the
/// positioning slot. The interior mutex is only held for field updates,
/// never across an await point.
#[derive(Clone)]
pub struct LoadSlot<T> {
    label: &'static str,
    inner: Arc<Mutex<SlotInner<T>>>,
}

impl<T: Clone> LoadSlot<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            inner: Arc::new(Mutex::new(SlotInner {
                state: LoadState::Idle,
                data: Vec::new(),
                error: None,
                token: None,
                generation: 0,
            })),
        }
    }

    /// Run one load to completion.
    ///
    /// Cancels the outstanding request for this slot (silently), hands the
    /// fetch closure a fresh token, and applies the outcome only if no newer
    /// load has started in the meantime.
    pub async fn run<F, Fut>(&self, fetch: F)
    where
        F: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = Result<Vec<T>, LoadError>>,
    {
        let (token, generation) = self.begin();
        let result = fetch(token).await;
        self.finish(generation, result);
    }

    fn begin(&self) -> (CancelToken, u64) {
        let mut inner = self.inner.lock().expect("load slot lock is not poisoned");

        if let Some(previous) = inner.token.take() {
            previous.cancel();
        }

        let token = CancelToken::new();
        inner.token = Some(token.clone());
        inner.generation += 1;
        inner.state = LoadState::Loading;
        inner.error = None;

        tracing::debug!(slot = self.label, generation = inner.generation, "load started");
        (token, inner.generation)
    }

    fn finish(&self, generation: u64, result: Result<Vec<T>, LoadError>) {
        let mut inner = self.inner.lock().expect("load slot lock is not poisoned");

        if inner.generation != generation {
            tracing::debug!(slot = self.label, generation, "stale load discarded");
            return;
        }

        match result {
            Err(error) if error.is_cancelled() => {
                // Supersession is silent; the newer load owns the slot now.
                tracing::debug!(slot = self.label, generation, "load cancelled");
            }
            Ok(data) => {
                tracing::debug!(slot = self.label, generation, rows = data.len(), "load done");
                inner.state = LoadState::Done;
                inner.data = data;
                inner.error = None;
                inner.token = None;
            }
            Err(error) => {
                tracing::warn!(slot = self.label, generation, error = %error, "load failed");
                inner.state = LoadState::Error;
                inner.error = Some(error.message().to_owned());
                inner.data.clear();
                inner.token = None;
            }
        }
    }

    pub fn state(&self) -> LoadState {
        self.inner
            .lock()
            .expect("load slot lock is not poisoned")
            .state
    }

    pub fn snapshot(&self) -> SlotSnapshot<T> {
        let inner = self.inner.lock().expect("load slot lock is not poisoned");
        SlotSnapshot {
            state: inner.state,
            data: inner.data.clone(),
            error: inner.error.clone(),
        }
    }
}

/// Fetch through the proxy with the shared retry policy.
///
/// Rate-limit responses and transient transport failures retry up to
/// `policy.max_retries` extra attempts with exponential backoff; the backoff
/// sleep races the cancel token so supersession short-circuits any queued
/// delay. Cancellation and non-retryable failures return immediately.
pub async fn fetch_json_with_retry(
    client: &ProxyClient,
    query: &ProxyQuery,
    kind: &'static str,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<Value, LoadError> {
    let mut attempt: u32 = 0;
    loop {
        match client.fetch_json(query, kind, cancel.clone()).await {
            Ok(value) => return Ok(value),
            Err(error) if error.retryable() && attempt < policy.max_retries => {
                let delay = policy.delay(attempt);
                attempt += 1;
                tracing::warn!(
                    kind,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "load attempt failed, backing off"
                );
                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    () = cancel.cancelled() => return Err(LoadError::cancelled()),
                }
            }
            Err(error) => return Err(error),
        }
    }
}

/// Which vendor feed serves the price slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    AlphaVantageDaily,
    FinnhubCandle,
    FmpEod,
}

impl PriceSource {
    const fn src(self) -> &'static str {
        match self {
            Self::AlphaVantageDaily => "alphavantage_daily",
            Self::FinnhubCandle => "finnhub_candle",
            Self::FmpEod => "fmp_eod",
        }
    }

    fn extract(self, doc: &Value) -> Vec<Bar> {
        match self {
            Self::AlphaVantageDaily => alphavantage::bars_from_daily_series(doc),
            Self::FinnhubCandle => finnhub::bars_from_candles(doc),
            Self::FmpEod => fmp::bars_from_historical(doc),
        }
    }
}

impl FromStr for PriceSource {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "alphavantage" => Ok(Self::AlphaVantageDaily),
            "finnhub" => Ok(Self::FinnhubCandle),
            "fmp" => Ok(Self::FmpEod),
            other => Err(ValidationError::InvalidPriceSource {
                value: other.to_owned(),
            }),
        }
    }
}

/// Parameters for one price load.
#[derive(Debug, Clone)]
pub struct PriceRequest {
    pub source: PriceSource,
    pub symbol: String,
    pub range: Range,
}

/// Load controller for the price slot.
#[derive(Clone)]
pub struct PriceLoader {
    slot: LoadSlot<Bar>,
    proxy: ProxyClient,
    policy: RetryPolicy,
}

impl PriceLoader {
    pub fn new(proxy: ProxyClient, policy: RetryPolicy) -> Self {
        Self {
            slot: LoadSlot::new("price"),
            proxy,
            policy,
        }
    }

    pub async fn load(&self, request: PriceRequest) {
        let query = price_query(&request);
        let source = request.source;
        let proxy = self.proxy.clone();
        let policy = self.policy.clone();

        self.slot
            .run(move |cancel| async move {
                let doc = fetch_json_with_retry(&proxy, &query, "price", &policy, &cancel).await?;
                Ok(normalize(source.extract(&doc)))
            })
            .await;
    }

    pub fn state(&self) -> LoadState {
        self.slot.state()
    }

    pub fn snapshot(&self) -> SlotSnapshot<Bar> {
        self.slot.snapshot()
    }
}

fn price_query(request: &PriceRequest) -> ProxyQuery {
    let symbol = request.symbol.trim().to_ascii_uppercase();
    let range = request.range.clone().resolve();

    match request.source {
        // The daily series endpoint has no range parameters upstream.
        PriceSource::AlphaVantageDaily => {
            ProxyQuery::new(request.source.src()).param("symbol", symbol)
        }
        // Candle queries take unix-second bounds.
        PriceSource::FinnhubCandle => ProxyQuery::new(request.source.src())
            .param("symbol", symbol)
            .param("resolution", "D")
            .param_opt(
                "from",
                range.from.as_deref().and_then(parse_day).map(|t| t.to_string()),
            )
            .param_opt(
                "to",
                range.to.as_deref().and_then(parse_day).map(|t| t.to_string()),
            ),
        PriceSource::FmpEod => ProxyQuery::new(request.source.src())
            .param("symbol", symbol)
            .param_opt("from", range.from)
            .param_opt("to", range.to),
    }
}

/// Parameters for one positioning load. `market` may be a short futures code
/// or a full market name; short codes resolve through the alias table.
#[derive(Debug, Clone)]
pub struct CotRequest {
    pub market: String,
    pub range: Range,
}

/// Load controller for the positioning slot.
#[derive(Clone)]
pub struct CotLoader {
    slot: LoadSlot<CotPoint>,
    proxy: ProxyClient,
    policy: RetryPolicy,
    aliases: MarketAliases,
}

impl CotLoader {
    pub fn new(proxy: ProxyClient, policy: RetryPolicy, aliases: MarketAliases) -> Self {
        Self {
            slot: LoadSlot::new("cot"),
            proxy,
            policy,
            aliases,
        }
    }

    pub async fn load(&self, request: CotRequest) {
        let market = self.aliases.resolve(&request.market);
        let range = request.range.clone().resolve();
        let query = ProxyQuery::new("cftc_pre_tff")
            .param("market", market)
            .param_opt("from", range.from)
            .param_opt("to", range.to);

        let proxy = self.proxy.clone();
        let policy = self.policy.clone();

        self.slot
            .run(move |cancel| async move {
                let doc = fetch_json_with_retry(&proxy, &query, "cot", &policy, &cancel).await?;
                Ok(cftc::cot_points_from_tff_rows(&doc))
            })
            .await;
    }

    pub fn state(&self) -> LoadState {
        self.slot.state()
    }

    pub fn snapshot(&self) -> SlotSnapshot<CotPoint> {
        self.slot.snapshot()
    }
}
