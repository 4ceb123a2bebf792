use marketscope_core::{
    IndicatorConfig, IndicatorSet, LoadState, PriceLoader, PriceRequest, PriceSource, ProxyClient,
    Range, RetryPolicy,
};
use serde_json::{json, Value};

use crate::cli::BarsArgs;
use crate::error::CliError;

pub async fn run(args: &BarsArgs, proxy: ProxyClient) -> Result<Value, CliError> {
    let source: PriceSource = args.vendor.parse()?;
    let loader = PriceLoader::new(proxy, RetryPolicy::default());

    loader
        .load(PriceRequest {
            source,
            symbol: args.symbol.clone(),
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
                .unwrap_or_else(|| String::from("price fetch error")),
        ));
    }

    let config = IndicatorConfig {
        wr_length: args.wr_length,
        ..IndicatorConfig::default()
    };
    let set = IndicatorSet::compute(&snapshot.data, &config);

    let mut out = json!({
        "symbol": args.symbol.to_ascii_uppercase(),
        "state": snapshot.state,
        "bars": snapshot.data,
        "summary": set.summary(),
    });
    if args.series {
        out["series"] = serde_json::to_value(&set)?;
    }
    Ok(out)
}
