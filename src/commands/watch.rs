use crate::error::{PriceError, PriceResult};
use crate::providers::AssetType;
use crate::schedule::PeriodicTask;
use crate::service::{validate_symbol, PriceService};
use crate::ui::display::show_notice;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

use super::price::fetch_and_show;

pub const DEFAULT_INTERVAL_SECS: u64 = 10;

pub fn validate_interval(secs: u64) -> PriceResult<Duration> {
    if secs < 1 {
        return Err(PriceError::Validation(
            "Interval must be a positive number".into(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C, stopping watch: {e}");
    }
}

/// Print the price now and then every `interval` until Ctrl-C.
pub async fn run_watch(
    service: &PriceService,
    asset: AssetType,
    symbol: &str,
    interval: Duration,
) -> PriceResult<()> {
    watch_until(service, asset, symbol, interval, interrupted()).await
}

pub(crate) async fn watch_until(
    service: &PriceService,
    asset: AssetType,
    symbol: &str,
    interval: Duration,
    stop: impl Future<Output = ()>,
) -> PriceResult<()> {
    let symbol = validate_symbol(symbol)?.to_string();
    if interval.is_zero() {
        return Err(PriceError::Validation(
            "Interval must be a positive number".into(),
        ));
    }

    info!(
        "Start watch for {symbol} (type: {asset}, interval: {}ms)",
        interval.as_millis()
    );
    show_notice(format!(
        "Watching {symbol} every {}s, press Ctrl-C to stop",
        interval.as_secs()
    ));

    let task = {
        let service = service.clone();
        let symbol = symbol.clone();
        PeriodicTask::spawn(interval, move || {
            let service = service.clone();
            let symbol = symbol.clone();
            async move {
                // A failed tick never affects the next one.
                if let Err(e) = fetch_and_show(&service, asset, &symbol).await {
                    error!("Error fetching {symbol} price: {e}");
                }
            }
        })
    };

    stop.await;
    if !task.is_running() {
        warn!("watch loop for {symbol} exited before it was stopped");
    }
    task.stop().await;

    info!("Stopped watching {symbol}");
    show_notice(format!("Stopped watching {symbol}"));
    Ok(())
}
