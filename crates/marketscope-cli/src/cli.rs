//! CLI argument definitions for marketscope.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `bars` | Fetch daily bars and derived indicators |
//! | `cot` | Fetch weekly trader-positioning data |
//! | `markets` | List the known market code aliases |
//!
//! # Examples
//!
//! ```bash
//! # Daily bars plus indicator summary
//! marketscope bars NVDA --vendor fmp --pretty
//!
//! # Positioning for a futures code over a custom window
//! marketscope cot NQ --from 2024-01-01 --to 2024-06-30
//! ```

use clap::{Args, Parser, Subcommand};

/// Market dashboard data fetcher: daily bars, positioning reports, and the
/// indicators derived from them, through an allow-listed proxy endpoint.
#[derive(Debug, Parser)]
#[command(name = "marketscope", version, about = "Market data and indicator CLI")]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch daily bars for a symbol and compute indicator series.
    Bars(BarsArgs),
    /// Fetch weekly positioning data for a futures market.
    Cot(CotArgs),
    /// List the short-code aliases the cot command resolves.
    Markets,
}

#[derive(Debug, Args)]
pub struct BarsArgs {
    /// Ticker symbol, e.g. NVDA.
    pub symbol: String,

    /// Price vendor: alphavantage, finnhub, or fmp.
    #[arg(long, default_value = "fmp")]
    pub vendor: String,

    /// Range start day (YYYY-MM-DD); defaults to two years back.
    #[arg(long)]
    pub from: Option<String>,

    /// Range end day (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub to: Option<String>,

    /// Williams %R lookback length.
    #[arg(long, default_value_t = 14)]
    pub wr_length: usize,

    /// Emit the full indicator series, not just the summary.
    #[arg(long, default_value_t = false)]
    pub series: bool,
}

#[derive(Debug, Args)]
pub struct CotArgs {
    /// Futures code (NQ, ES, ...) or a full market name.
    pub market: String,

    /// Range start day (YYYY-MM-DD); defaults to two years back.
    #[arg(long)]
    pub from: Option<String>,

    /// Range end day (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub to: Option<String>,

    /// Include the latest-week signal classification.
    #[arg(long, default_value_t = false)]
    pub signal: bool,
}
