use crate::commands::{ListScope, DEFAULT_INTERVAL_SECS};
use crate::http::DEFAULT_TIMEOUT;
use crate::providers::AssetType;
use crate::service::{DEFAULT_HISTORY_DAYS, MAX_HISTORY_DAYS, MIN_HISTORY_DAYS};
use clap::ValueHint;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_LOG_FILE: &str = "logs/app.log";

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch crypto, forex and precious metal prices")]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Command,

    #[command(flatten)]
    pub(crate) global: GlobalArgs,
}

impl Cli {
    pub fn log_file(&self) -> &PathBuf {
        &self.global.log_file
    }
}

#[derive(Args, Debug)]
pub(crate) struct GlobalArgs {
    /// Path to environment file (default: ./.env). Can also use APP_ENV_FILE.
    #[arg(
        long,
        value_hint = ValueHint::FilePath,
        default_value = ".env",
        env = "APP_ENV_FILE",
        global = true
    )]
    pub(crate) env_file: PathBuf,

    /// HTTP request timeout in seconds
    #[arg(
        long,
        env = "HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub(crate) timeout: u64,

    /// File that receives the application log
    #[arg(
        long,
        value_hint = ValueHint::FilePath,
        env = "PRICE_TRACKER_LOG_FILE",
        default_value = DEFAULT_LOG_FILE,
        global = true
    )]
    pub(crate) log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Show current prices for the default symbols
    List {
        /// Asset type to list (forex | crypto | metals | all)
        #[arg(short = 't', long = "type", default_value = "all", value_parser = parse_list_scope)]
        scope: ListScope,
    },

    /// Show the current price of one symbol
    Price {
        /// Symbol to look up, e.g. bitcoin, eur/usd or XAU
        symbol: String,

        /// Asset type of the symbol (forex | crypto | metals)
        #[arg(short = 't', long = "type", value_parser = parse_asset_type)]
        asset: AssetType,
    },

    /// Show daily closing prices for one symbol
    History {
        symbol: String,

        /// Asset type of the symbol (forex | crypto | metals)
        #[arg(short = 't', long = "type", value_parser = parse_asset_type)]
        asset: AssetType,

        /// Number of days to show
        #[arg(
            short = 'd',
            long,
            default_value_t = DEFAULT_HISTORY_DAYS,
            value_parser = clap::value_parser!(u32).range(MIN_HISTORY_DAYS as i64..=MAX_HISTORY_DAYS as i64)
        )]
        days: u32,
    },

    /// Print the price of one symbol repeatedly until Ctrl-C
    Watch {
        symbol: String,

        /// Asset type of the symbol (forex | crypto | metals)
        #[arg(short = 't', long = "type", value_parser = parse_asset_type)]
        asset: AssetType,

        /// Seconds between updates
        #[arg(
            short = 'i',
            long,
            default_value_t = DEFAULT_INTERVAL_SECS,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        interval: u64,
    },
}

pub fn parse_asset_type(s: &str) -> Result<AssetType, String> {
    s.parse::<AssetType>().map_err(|e| e.to_string())
}

pub fn parse_list_scope(s: &str) -> Result<ListScope, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "all" | "" => Ok(ListScope::All),
        other => parse_asset_type(other)
            .map(ListScope::Only)
            .map_err(|_| format!("invalid type '{other}'; expected one of: forex, crypto, metals, all")),
    }
}
