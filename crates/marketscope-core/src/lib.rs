//! # Marketscope Core
//!
//! Canonical market data feeds, technical indicators, and resilient load
//! control for the marketscope dashboard tooling.
//!
//! ## Overview
//!
//! The crate turns heterogeneous vendor feeds into two canonical shapes and
//! derives indicator series from the price shape:
//!
//! - **Vendor adapters** parse duck-typed upstream JSON (daily series keyed
//!   by date, parallel candle arrays, historical-list variants, weekly
//!   positioning report rows) into candidate records. Adapters never error;
//!   malformed records are dropped one by one.
//! - **Normalizers** produce the canonical sequences: ascending by time,
//!   duplicates collapsed last-wins, every field finite.
//! - **Indicators** (Williams %R, Ultimate Oscillator, breakout flags) are
//!   pure functions over canonical bars.
//! - **Load control** drives fetches through an allow-listed proxy with
//!   retry-on-rate-limit and last-request-wins supersession; a superseded
//!   request can never clobber the newer one's outcome.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Vendor feed adapters (Alpha Vantage, Finnhub, FMP, CFTC) |
//! | [`cancel`] | Cancellation tokens owned by load slots |
//! | [`domain`] | Canonical models (`Bar`, `CotPoint`) and normalizers |
//! | [`error`] | Load and validation error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`indicators`] | Pure indicator functions over bar sequences |
//! | [`loader`] | Load slots, retry loop, typed loaders |
//! | [`markets`] | Short-code to market-name alias table |
//! | [`proxy`] | Proxy endpoint client and query building |
//! | [`retry`] | Backoff policy |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marketscope_core::{
//!     IndicatorConfig, IndicatorSet, PriceLoader, PriceRequest, PriceSource,
//!     ProxyClient, ProxyConfig, Range, ReqwestHttpClient, RetryPolicy,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let proxy = ProxyClient::new(ProxyConfig::from_env(), Arc::new(ReqwestHttpClient::new()));
//!     let loader = PriceLoader::new(proxy, RetryPolicy::default());
//!
//!     loader
//!         .load(PriceRequest {
//!             source: PriceSource::FmpEod,
//!             symbol: String::from("NVDA"),
//!             range: Range::default(),
//!         })
//!         .await;
//!
//!     let bars = loader.snapshot().data;
//!     let set = IndicatorSet::compute(&bars, &IndicatorConfig::default());
//!     println!("{:?}", set.summary());
//! }
//! ```

pub mod adapters;
pub mod cancel;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod indicators;
pub mod loader;
pub mod markets;
pub mod proxy;
pub mod retry;

// Re-export commonly used types at crate root for convenience

// Cancellation
pub use cancel::CancelToken;

// Domain models and normalizers
pub use domain::{
    format_day, latest_signal, normalize, parse_day, sort_dedup_by_time, Bar, CotBias, CotPoint,
    CotSignal,
};

// Error types
pub use error::{LoadError, LoadErrorKind, ValidationError};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// Indicators
pub use indicators::{
    breakout_flags, ultimate_oscillator, williams_r, IndicatorConfig, IndicatorSet,
    IndicatorSummary,
};

// Load control
pub use loader::{
    fetch_json_with_retry, CotLoader, CotRequest, LoadSlot, LoadState, PriceLoader, PriceRequest,
    PriceSource, SlotSnapshot,
};

// Market aliases
pub use markets::MarketAliases;

// Proxy client
pub use proxy::{ProxyClient, ProxyConfig, ProxyQuery, Range};

// Retry policy
pub use retry::RetryPolicy;
