use crate::error::PriceResult;
use crate::providers::AssetType;
use crate::service::{validate_symbol, PriceService};
use crate::ui::display::{show_error, show_price};
use crate::ui::spinner::with_spinner;
use tracing::{error, info};

/// Fetch and print one price. Lookup failures are printed, not returned.
pub(crate) async fn fetch_and_show(
    service: &PriceService,
    asset: AssetType,
    symbol: &str,
) -> PriceResult<Option<f64>> {
    let result = with_spinner(
        format!("Fetching {symbol} price…"),
        service.price(asset, symbol),
    )
    .await;

    match result {
        Ok(price) => {
            show_price(asset, symbol, price);
            info!("Price for {symbol} of type {asset} is ${price}");
            Ok(Some(price))
        }
        Err(e) if e.is_not_found() => {
            error!("Error fetching price for {symbol} of type {asset}: {e}");
            show_error("Error fetching price", &e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

pub async fn run_price(service: &PriceService, asset: AssetType, symbol: &str) -> PriceResult<()> {
    let symbol = validate_symbol(symbol)?;
    info!("Fetching price for {symbol} of type {asset}");

    fetch_and_show(service, asset, symbol).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PriceError;
    use crate::service::testing::fixed_service;

    #[tokio::test]
    async fn prints_and_returns_ok_on_success() {
        let (service, [crypto, ..]) = fixed_service();

        run_price(&service, AssetType::Crypto, "bitcoin").await.unwrap();

        assert_eq!(crypto.calls(), 1);
    }

    #[tokio::test]
    async fn lookup_failure_is_reported_not_returned() {
        let (service, [_, forex, _]) = fixed_service();

        let shown = fetch_and_show(&service, AssetType::Forex, "missing")
            .await
            .unwrap();

        assert_eq!(shown, None);
        assert_eq!(forex.calls(), 1);
        assert!(run_price(&service, AssetType::Forex, "missing").await.is_ok());
    }

    #[tokio::test]
    async fn blank_symbol_is_rejected() {
        let (service, [_, _, metals]) = fixed_service();

        let err = run_price(&service, AssetType::Metals, "").await.unwrap_err();

        assert_eq!(err, PriceError::Validation("Symbol is required".into()));
        assert_eq!(metals.calls(), 0);
    }
}
