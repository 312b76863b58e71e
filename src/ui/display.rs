//! Colored user-facing output.
//!
//! Lines go through the `plain` tracing target, which the logging setup
//! renders without timestamp or level (errors land on stderr).

use crate::providers::gold_api::metal_name;
use crate::providers::{AssetType, PricePoint};
use dialoguer::console::{style, Style};
use std::fmt::Display;
use tracing::{error, info};

/// Renders a price with at most six decimals and no trailing zeros.
pub(crate) fn format_price(price: f64) -> String {
    let text = format!("{price:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

/// Display label for a symbol: `BITCOIN/USD`, `EUR/USD`, `GOLD`.
pub(crate) fn price_label(asset: AssetType, symbol: &str) -> String {
    match asset {
        AssetType::Crypto => format!("{}/USD", symbol.to_uppercase()),
        AssetType::Forex => symbol.to_uppercase(),
        AssetType::Metals => metal_name(symbol),
    }
}

pub(crate) fn price_text(asset: AssetType, symbol: &str, price: f64) -> String {
    format!("{}: ${}", price_label(asset, symbol), format_price(price))
}

pub(crate) fn history_line(point: &PricePoint) -> String {
    format!("{}: ${}", point.date, format_price(point.price))
}

pub(crate) fn placeholder_warning(asset: AssetType) -> String {
    format!(
        "Warning: Historical data for {asset} is not provided by the API. Using placeholder data."
    )
}

fn asset_style(asset: AssetType, symbol: &str) -> Style {
    match asset {
        AssetType::Crypto => Style::new().blue(),
        AssetType::Forex => Style::new().green(),
        AssetType::Metals if symbol.trim().eq_ignore_ascii_case("XAU") => Style::new().yellow(),
        AssetType::Metals => Style::new().dim(),
    }
}

pub(crate) fn show_price(asset: AssetType, symbol: &str, price: f64) {
    let line = asset_style(asset, symbol).apply_to(price_text(asset, symbol, price));
    info!(target: "plain", "{line}");
}

pub(crate) fn show_placeholder_warning(asset: AssetType) {
    info!(target: "plain", "{}", style(placeholder_warning(asset)).yellow());
}

pub(crate) fn show_history(asset: AssetType, symbol: &str, history: &[PricePoint]) {
    info!(target: "plain",
        "{}",
        style(format!(
            "Historical prices for {} ({asset}):",
            symbol.to_uppercase()
        ))
        .blue()
    );

    let line_style = asset_style(asset, symbol);
    for point in history {
        info!(target: "plain", "{}", line_style.apply_to(history_line(point)));
    }
}

pub(crate) fn show_group_header(asset: AssetType) {
    info!(target: "plain",
        "\n{} {}",
        style("◆").blue().bold(),
        style(asset.as_str().to_uppercase()).bold()
    );
}

pub(crate) fn show_notice(message: impl Display) {
    info!(target: "plain", "{}", style(message).dim());
}

pub(crate) fn show_error(prefix: &str, err: impl Display) {
    error!(target: "plain", "{}", style(format!("{prefix}: {err}")).red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn prices_print_without_float_noise() {
        assert_eq!(format_price(50000.0), "50000");
        assert_eq!(format_price(1.1744), "1.1744");
        assert_eq!(format_price(1.175), "1.175");
        assert_eq!(format_price(50123.456789123), "50123.456789");
        assert_eq!(format_price(0.5), "0.5");
    }

    #[test]
    fn price_lines_per_asset_type() {
        assert_eq!(
            price_text(AssetType::Crypto, "bitcoin", 50000.0),
            "BITCOIN/USD: $50000"
        );
        assert_eq!(
            price_text(AssetType::Forex, "eur/usd", 1.1744),
            "EUR/USD: $1.1744"
        );
        assert_eq!(price_text(AssetType::Metals, "XAU", 3887.0), "GOLD: $3887");
        assert_eq!(price_text(AssetType::Metals, "xag", 47.1), "SILVER: $47.1");
    }

    #[test]
    fn history_line_uses_calendar_date() {
        let point = PricePoint {
            date: NaiveDate::from_ymd_opt(2023, 10, 2).unwrap(),
            price: 1.175,
        };
        assert_eq!(history_line(&point), "2023-10-02: $1.175");
    }

    #[test]
    fn placeholder_warning_names_the_asset_type() {
        assert_eq!(
            placeholder_warning(AssetType::Crypto),
            "Warning: Historical data for crypto is not provided by the API. Using placeholder data."
        );
    }
}
