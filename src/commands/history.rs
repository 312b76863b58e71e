use crate::error::PriceResult;
use crate::providers::{AssetType, PricePoint};
use crate::service::{validate_days, validate_symbol, PriceService};
use crate::ui::display::{show_error, show_history, show_placeholder_warning};
use crate::ui::spinner::with_spinner;
use tracing::{error, info};

/// Print `days` of history for `symbol`. Returns the points shown, or `None`
/// when the lookup failed and an error line was printed instead.
pub async fn run_history(
    service: &PriceService,
    asset: AssetType,
    symbol: &str,
    days: u32,
) -> PriceResult<Option<Vec<PricePoint>>> {
    let symbol = validate_symbol(symbol)?;
    let days = validate_days(days)?;

    info!("Fetching historical prices for {symbol} (type: {asset}, days: {days})");

    if service.history_is_synthetic(asset) {
        show_placeholder_warning(asset);
    }

    let result = with_spinner(
        format!("Fetching {days} days of {symbol}…"),
        service.history(asset, symbol, days),
    )
    .await;

    match result {
        Ok(history) => {
            show_history(asset, symbol, &history);
            info!("Fetched {} historical prices for {symbol}", history.len());
            Ok(Some(history))
        }
        Err(e) if e.is_not_found() => {
            error!("Error fetching history for {symbol}: {e}");
            show_error("Error", &e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
