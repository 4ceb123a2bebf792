//! Behavior-driven tests for vendor adapters routed end-to-end through the
//! load controller: each vendor's document shape lands as one canonical,
//! ascending, deduplicated bar sequence.

use std::sync::Arc;

use marketscope_tests::{
    price_loader, LoadState, PriceLoader, PriceRequest, PriceSource, ProxyClient, ProxyConfig,
    Range, RetryPolicy, ScriptedHttpClient, Step,
};

fn request(source: PriceSource) -> PriceRequest {
    PriceRequest {
        source,
        symbol: String::from("nvda"),
        range: Range::new("2024-01-01", "2024-06-30"),
    }
}

fn loader_with_body(body: &str) -> (PriceLoader, Arc<ScriptedHttpClient>) {
    let client = Arc::new(ScriptedHttpClient::new([Step::ok(body)]));
    (price_loader(client.clone()), client)
}

#[tokio::test]
async fn alphavantage_daily_series_lands_sorted_ascending() {
    // Newest-first keys, one row with a broken field.
    let body = r#"{
        "Time Series (Daily)": {
            "2024-01-04": {"1. open": "103.0", "2. high": "105.0", "3. low": "102.0", "4. close": "104.0"},
            "2024-01-03": {"1. open": "101.0", "2. high": "103.0", "3. low": "100.0", "4. close": "102.5"},
            "2024-01-02": {"1. open": "99.0", "2. high": "bad", "3. low": "98.0", "4. close": "100.0"}
        }
    }"#;
    let (loader, client) = loader_with_body(body);

    loader.load(request(PriceSource::AlphaVantageDaily)).await;

    let snapshot = loader.snapshot();
    assert_eq!(snapshot.state, LoadState::Done);
    assert_eq!(snapshot.data.len(), 2);
    assert!(snapshot.data[0].time < snapshot.data[1].time);
    assert_eq!(snapshot.data[1].close, 104.0);

    let urls = client.recorded_urls();
    assert!(urls[0].contains("src=alphavantage_daily"));
    assert!(urls[0].contains("symbol=NVDA"), "symbol should be uppercased");
}

#[tokio::test]
async fn finnhub_no_data_flag_lands_as_empty_done_state() {
    let (loader, _client) = loader_with_body(r#"{"s": "no_data"}"#);

    loader.load(request(PriceSource::FinnhubCandle)).await;

    // Missing data is not an error: the slot completes with zero rows.
    let snapshot = loader.snapshot();
    assert_eq!(snapshot.state, LoadState::Done);
    assert!(snapshot.data.is_empty());
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn finnhub_candles_zip_and_guard_length_mismatches() {
    let body = r#"{
        "s": "ok",
        "t": [1704153600, 1704240000, 1704326400],
        "o": [10.0, 11.0, 12.0],
        "h": [12.0, 13.0],
        "l": [9.0, 10.0, 11.0],
        "c": [11.0, 12.0, 13.0]
    }"#;
    let (loader, client) = loader_with_body(body);

    loader.load(request(PriceSource::FinnhubCandle)).await;

    let snapshot = loader.snapshot();
    assert_eq!(snapshot.data.len(), 2);
    assert_eq!(snapshot.data[1].high, 13.0);

    // Candle queries carry unix-second bounds and the daily resolution.
    let url = &client.recorded_urls()[0];
    assert!(url.contains("src=finnhub_candle"));
    assert!(url.contains("resolution=D"));
    assert!(url.contains("from=1704067200"), "unexpected url: {url}");
}

#[tokio::test]
async fn fmp_envelope_variants_normalize_identically() {
    let rows = r#"[
        {"date": "2024-01-03", "open": 11.0, "high": 12.0, "low": 10.0, "close": 11.5},
        {"date": "2024-01-02", "open": 10.0, "high": 11.0, "low": 9.0, "close": 10.5},
        {"date": "2024-01-02", "open": 10.0, "high": 11.0, "low": 9.0, "close": 99.0}
    ]"#;
    let bodies = [
        rows.to_owned(),
        format!(r#"{{"symbol": "NVDA", "historical": {rows}}}"#),
        format!(r#"{{"historicalStockList": [{{"symbol": "NVDA", "historical": {rows}}}]}}"#),
        format!(r#"{{"data": {rows}}}"#),
    ];

    for body in &bodies {
        let (loader, _client) = loader_with_body(body);
        loader.load(request(PriceSource::FmpEod)).await;

        let snapshot = loader.snapshot();
        assert_eq!(snapshot.state, LoadState::Done, "body: {body}");
        assert_eq!(snapshot.data.len(), 2, "body: {body}");
        // Duplicate 2024-01-02 rows collapse to the later one.
        assert_eq!(snapshot.data[0].close, 99.0, "body: {body}");
        assert!(snapshot.data[0].time < snapshot.data[1].time);
    }
}

#[tokio::test]
async fn unrecognized_document_shape_degrades_to_empty() {
    let (loader, _client) = loader_with_body(r#"{"message": "maintenance"}"#);

    loader.load(request(PriceSource::FmpEod)).await;

    let snapshot = loader.snapshot();
    assert_eq!(snapshot.state, LoadState::Done);
    assert!(snapshot.data.is_empty());
}

#[tokio::test]
async fn fmp_query_carries_day_range_params() {
    let client = Arc::new(ScriptedHttpClient::new([Step::ok("[]")]));
    let proxy = ProxyClient::new(ProxyConfig::new("http://proxy.test"), client.clone());
    let loader = PriceLoader::new(proxy, RetryPolicy::default());

    loader.load(request(PriceSource::FmpEod)).await;

    let url = &client.recorded_urls()[0];
    assert!(url.contains("src=fmp_eod"));
    assert!(url.contains("from=2024-01-01"));
    assert!(url.contains("to=2024-06-30"));
}
