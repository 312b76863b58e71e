use crate::error::PriceResult;
use crate::providers::AssetType;
use crate::service::PriceService;
use crate::ui::display::{show_error, show_group_header, show_price};
use crate::ui::spinner::with_spinner;
use tracing::{error, info};

use super::price::fetch_and_show;

pub const CRYPTO_SYMBOLS: &[&str] = &["bitcoin", "ethereum", "solana"];
pub const FOREX_SYMBOLS: &[&str] = &["eur/usd", "gbp/usd", "usd/jpy"];
pub const METAL_SYMBOLS: &[&str] = &["XAU", "XAG"];

/// Which asset groups `list` covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListScope {
    #[default]
    All,
    Only(AssetType),
}

impl ListScope {
    pub fn asset_types(&self) -> Vec<AssetType> {
        match self {
            Self::All => AssetType::ALL.to_vec(),
            Self::Only(asset) => vec![*asset],
        }
    }
}

pub fn default_symbols(asset: AssetType) -> &'static [&'static str] {
    match asset {
        AssetType::Crypto => CRYPTO_SYMBOLS,
        AssetType::Forex => FOREX_SYMBOLS,
        AssetType::Metals => METAL_SYMBOLS,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListReport {
    pub shown: usize,
    pub failed: usize,
}

/// Crypto goes out as one batched request; forex and metals APIs take one
/// symbol per request, so those are fetched one after another.
async fn list_group(service: &PriceService, asset: AssetType) -> PriceResult<ListReport> {
    let symbols = default_symbols(asset);
    let mut report = ListReport::default();

    show_group_header(asset);

    if asset == AssetType::Crypto {
        let owned: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
        let result = with_spinner(
            format!("Fetching {asset} prices…"),
            service.prices(asset, &owned),
        )
        .await;
        match result {
            Ok(prices) => {
                for symbol in symbols {
                    if let Some(price) = prices.get(*symbol) {
                        show_price(asset, symbol, *price);
                        report.shown += 1;
                    }
                }
            }
            Err(e) if e.is_not_found() => {
                error!("Error listing {asset} prices: {e}");
                show_error("Error fetching price", &e);
                report.failed += symbols.len();
            }
            Err(e) => return Err(e),
        }
        return Ok(report);
    }

    for symbol in symbols {
        match fetch_and_show(service, asset, symbol).await? {
            Some(_) => report.shown += 1,
            None => report.failed += 1,
        }
    }
    Ok(report)
}

pub async fn run_list(service: &PriceService, scope: ListScope) -> PriceResult<ListReport> {
    info!("Listing prices for {scope:?}");

    let mut total = ListReport::default();
    for asset in scope.asset_types() {
        let report = list_group(service, asset).await?;
        total.shown += report.shown;
        total.failed += report.failed;
    }

    info!("Listed {} prices ({} failed)", total.shown, total.failed);
    Ok(total)
}
