use marketscope_core::{
    latest_signal, CotLoader, CotRequest, LoadState, MarketAliases, ProxyClient, Range, RetryPolicy,
};
use serde_json::{json, Value};

use crate::cli::CotArgs;
use crate::error::CliError;

pub async fn run(args: &CotArgs, proxy: ProxyClient) -> Result<Value, CliError> {
    let aliases = MarketAliases::default();
    let market = aliases.resolve(&args.market);
    let loader = CotLoader::new(proxy, RetryPolicy::default(), aliases);

    loader
        .load(CotRequest {
            market: args.market.clone(),
            range: Range {
                from: args.from.clone(),
                to: args.to.clone(),
            },
        })
        .await;

    let snapshot = loader.snapshot();
    if snapshot.state == LoadState::Error {
        return Err(CliError::Load(
            snapshot
                .error
                .unwrap_or_else(|| String::from("cot fetch error")),
        ));
    }

    let signal = latest_signal(&snapshot.data);
    let mut out = json!({
        "market": market,
        "state": snapshot.state,
        "points": snapshot.data,
    });
    if args.signal {
        out["signal"] = serde_json::to_value(signal)?;
    }
    Ok(out)
}
