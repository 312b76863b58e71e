use super::synthetic::synthetic_history;
use super::{AssetType, PricePoint, PriceProvider};
use crate::error::{PriceError, PriceResult};
use crate::http::JsonFetcher;
use crate::utils::serialization::de_opt_f64;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

pub const COINGECKO_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// CoinGecko-backed crypto prices in USD via `/simple/price`.
///
/// CoinGecko has no free historical endpoint, so [`PriceProvider::history`]
/// returns synthetic data derived from the current price.
pub struct CoingeckoProvider {
    fetcher: Arc<dyn JsonFetcher>,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    #[serde(default, deserialize_with = "de_opt_f64")]
    usd: Option<f64>,
}

impl CoingeckoProvider {
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        let base = Url::parse(COINGECKO_PRICE_URL).expect("valid url");
        Self { fetcher, base }
    }

    pub fn with_base_url(fetcher: Arc<dyn JsonFetcher>, base: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid CoinGecko url: {base}"))?;
        Ok(Self { fetcher, base })
    }

    /// Map a ticker or id to CoinGecko's asset id. Unknown inputs are taken
    /// to already be ids.
    pub fn coin_id(symbol: &str) -> String {
        let lower = symbol.trim().to_ascii_lowercase();
        let id = match lower.as_str() {
            "btc" => "bitcoin",
            "eth" => "ethereum",
            "sol" => "solana",
            "usdt" => "tether",
            "usdc" => "usd-coin",
            "xrp" => "ripple",
            "ada" => "cardano",
            "doge" => "dogecoin",
            "ltc" => "litecoin",
            "dot" => "polkadot",
            "bnb" => "binancecoin",
            _ => return lower,
        };
        id.to_string()
    }

    async fn fetch_quotes(&self, ids: &[String]) -> anyhow::Result<HashMap<String, UsdQuote>> {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("ids", &ids.join(","))
            .append_pair("vs_currencies", "usd");

        let body = self.fetcher.get_json(url).await?;

        // { "bitcoin": {"usd": 12345.6}, ... }
        serde_json::from_value(body).context("malformed CoinGecko response")
    }
}

#[async_trait]
impl PriceProvider for CoingeckoProvider {
    fn asset_type(&self) -> AssetType {
        AssetType::Crypto
    }

    async fn price(&self, symbol: &str) -> PriceResult<f64> {
        let mut prices = self.prices(&[symbol.to_string()]).await?;
        prices
            .remove(symbol)
            .ok_or_else(|| PriceError::fetch_failed(symbol, format!("Price not found for symbol: {symbol}")))
    }

    async fn prices(&self, symbols: &[String]) -> PriceResult<HashMap<String, f64>> {
        if symbols.is_empty() {
            return Ok(HashMap::new());
        }

        let label = symbols.join(",");
        info!("Fetching price for cryptocurrency: {label}");

        let mut ids: Vec<String> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let id = Self::coin_id(symbol);
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        let quotes = self.fetch_quotes(&ids).await.map_err(|e| {
            error!("Error fetching {label} price: {e:#}");
            PriceError::fetch_failed(&label, format!("{e:#}"))
        })?;

        // All or nothing: a single missing symbol fails the batch.
        let mut out = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            let price = quotes
                .get(&Self::coin_id(symbol))
                .and_then(|q| q.usd)
                .filter(|p| p.is_finite() && *p > 0.0)
                .ok_or_else(|| {
                    let cause = format!("Price not found for symbol: {symbol}");
                    error!("Error fetching {label} price: {cause}");
                    PriceError::fetch_failed(&label, cause)
                })?;
            info!("Fetched price for {symbol}: ${price}");
            out.insert(symbol.clone(), price);
        }

        Ok(out)
    }

    async fn history(&self, symbol: &str, days: u32) -> PriceResult<Vec<PricePoint>> {
        let current = self.price(symbol).await?;
        let today = Utc::now().date_naive();
        let history = synthetic_history(current, days, today, &mut rand::rng());
        info!("Generated {} placeholder prices for {symbol}", history.len());
        Ok(history)
    }

    fn history_is_synthetic(&self) -> bool {
        true
    }
}
