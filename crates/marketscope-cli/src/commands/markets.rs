use marketscope_core::MarketAliases;
use serde_json::{json, Value};

use crate::error::CliError;

pub fn run() -> Result<Value, CliError> {
    let aliases = MarketAliases::default();
    let entries: Vec<Value> = aliases
        .entries()
        .iter()
        .map(|(code, market)| json!({"code": code, "market": market}))
        .collect();
    Ok(json!({ "markets": entries }))
}
