//! Single lookup entry point over the three price providers.

use crate::error::{PriceError, PriceResult};
use crate::http::JsonFetcher;
use crate::providers::{
    AlphaVantageProvider, AssetType, CoingeckoProvider, GoldApiProvider, PricePoint,
    PriceProvider,
};
use std::collections::HashMap;
use std::sync::Arc;

pub const MIN_HISTORY_DAYS: u32 = 1;
pub const MAX_HISTORY_DAYS: u32 = 30;
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

/// Rejects a history window outside `1..=30` days.
pub fn validate_days(days: u32) -> PriceResult<u32> {
    if (MIN_HISTORY_DAYS..=MAX_HISTORY_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(PriceError::Validation(format!(
            "Days must be between {MIN_HISTORY_DAYS} and {MAX_HISTORY_DAYS}"
        )))
    }
}

/// Rejects an empty symbol.
pub fn validate_symbol(symbol: &str) -> PriceResult<&str> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        Err(PriceError::Validation("Symbol is required".into()))
    } else {
        Ok(symbol)
    }
}

/// Dispatches lookups to the provider registered for each asset type and
/// passes their results or failures through untouched.
#[derive(Clone)]
pub struct PriceService {
    providers: HashMap<AssetType, Arc<dyn PriceProvider>>,
}

impl PriceService {
    /// Wire the live CoinGecko, Alpha Vantage and gold-api providers.
    ///
    /// Fails with [`PriceError::Configuration`] when the forex key is absent.
    pub fn live(fetcher: Arc<dyn JsonFetcher>, forex_api_key: &str) -> PriceResult<Self> {
        let forex = AlphaVantageProvider::new(fetcher.clone(), forex_api_key)?;
        Ok(Self::from_providers([
            Arc::new(CoingeckoProvider::new(fetcher.clone())) as Arc<dyn PriceProvider>,
            Arc::new(forex),
            Arc::new(GoldApiProvider::new(fetcher)),
        ]))
    }

    pub fn from_providers(providers: impl IntoIterator<Item = Arc<dyn PriceProvider>>) -> Self {
        let providers = providers
            .into_iter()
            .map(|p| (p.asset_type(), p))
            .collect();
        Self { providers }
    }

    fn provider(&self, asset: AssetType) -> PriceResult<&Arc<dyn PriceProvider>> {
        self.providers.get(&asset).ok_or_else(|| {
            PriceError::Configuration(format!("no price provider registered for {asset}"))
        })
    }

    pub async fn price(&self, asset: AssetType, symbol: &str) -> PriceResult<f64> {
        let symbol = validate_symbol(symbol)?;
        self.provider(asset)?.price(symbol).await
    }

    pub async fn prices(
        &self,
        asset: AssetType,
        symbols: &[String],
    ) -> PriceResult<HashMap<String, f64>> {
        for symbol in symbols {
            validate_symbol(symbol)?;
        }
        self.provider(asset)?.prices(symbols).await
    }

    pub async fn history(
        &self,
        asset: AssetType,
        symbol: &str,
        days: u32,
    ) -> PriceResult<Vec<PricePoint>> {
        let symbol = validate_symbol(symbol)?;
        let days = validate_days(days)?;
        self.provider(asset)?.history(symbol, days).await
    }

    pub fn history_is_synthetic(&self, asset: AssetType) -> bool {
        self.providers
            .get(&asset)
            .is_some_and(|p| p.history_is_synthetic())
    }
}
