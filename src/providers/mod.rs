//! Price provider adapters.
//!
//! Each adapter wraps one external REST API and translates its response shape
//! into a plain `f64` price or a date-ordered list of [`PricePoint`]s. Every
//! failure is folded into [`PriceError::NotFound`]; nothing is retried or
//! cached.

pub mod alphavantage;
pub mod coingecko;
pub mod gold_api;
mod synthetic;

pub use alphavantage::AlphaVantageProvider;
pub use coingecko::CoingeckoProvider;
pub use gold_api::GoldApiProvider;

use crate::error::{PriceError, PriceResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Crypto,
    Forex,
    Metals,
}

impl AssetType {
    pub const ALL: [AssetType; 3] = [AssetType::Forex, AssetType::Crypto, AssetType::Metals];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Crypto => "crypto",
            Self::Forex => "forex",
            Self::Metals => "metals",
        }
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crypto" => Ok(Self::Crypto),
            "forex" => Ok(Self::Forex),
            "metals" => Ok(Self::Metals),
            other => Err(PriceError::Validation(format!(
                "Invalid or missing type: {other}. Must be one of: forex, crypto, metals"
            ))),
        }
    }
}

/// One day of a price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    fn asset_type(&self) -> AssetType;

    /// Current price of `symbol`; always positive on success.
    async fn price(&self, symbol: &str) -> PriceResult<f64>;

    /// Current prices for several symbols, keyed by the symbol as passed in.
    ///
    /// Any symbol failing fails the whole call. The default issues one
    /// request per symbol, in order.
    async fn prices(&self, symbols: &[String]) -> PriceResult<HashMap<String, f64>> {
        let mut out = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            let price = self.price(symbol).await?;
            out.insert(symbol.clone(), price);
        }
        Ok(out)
    }

    /// Trailing `days` of daily prices, ascending by date.
    async fn history(&self, symbol: &str, days: u32) -> PriceResult<Vec<PricePoint>>;

    /// Whether [`PriceProvider::history`] fabricates data from the current price.
    fn history_is_synthetic(&self) -> bool;
}
