mod bars;
mod cot;
mod markets;

use std::sync::Arc;

use marketscope_core::{ProxyClient, ProxyConfig, ReqwestHttpClient};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    match &cli.command {
        Command::Bars(args) => bars::run(args, proxy_client()).await,
        Command::Cot(args) => cot::run(args, proxy_client()).await,
        Command::Markets => markets::run(),
    }
}

fn proxy_client() -> ProxyClient {
    ProxyClient::new(ProxyConfig::from_env(), Arc::new(ReqwestHttpClient::new()))
}
