use super::{AssetType, PricePoint, PriceProvider};
use crate::error::{PriceError, PriceResult};
use crate::http::JsonFetcher;
use crate::utils::serialization::{de_opt_numeric_text, parse_positive_price};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

pub const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
pub const API_KEY_ENV_VAR: &str = "ALPHA_VANTAGE_API_KEY";

/// Alpha Vantage-backed FX rates for `BASE/QUOTE` pairs.
///
/// Unlike the other providers, history here is real daily close data.
pub struct AlphaVantageProvider {
    fetcher: Arc<dyn JsonFetcher>,
    base: Url,
    api_key: String,
}

/// Alpha Vantage reports throttling and bad requests inside a 200 response.
#[derive(Debug, Default, Deserialize)]
struct ApiNotice {
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

impl ApiNotice {
    fn message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .or(self.note.as_deref())
            .or(self.information.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    #[serde(rename = "Realtime Currency Exchange Rate")]
    rate: Option<ExchangeRate>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Debug, Deserialize)]
struct ExchangeRate {
    #[serde(rename = "5. Exchange Rate", default, deserialize_with = "de_opt_numeric_text")]
    rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailySeriesResponse {
    #[serde(rename = "Time Series FX (Daily)")]
    series: Option<HashMap<String, DailyBar>>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close", default, deserialize_with = "de_opt_numeric_text")]
    close: Option<String>,
}

/// Split `"eur/usd"` into `("EUR", "USD")`.
pub(crate) fn parse_pair(pair: &str) -> Result<(String, String)> {
    let mut parts = pair.split('/').map(|s| s.trim().to_ascii_uppercase());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(from), Some(to), None) if !from.is_empty() && !to.is_empty() => Ok((from, to)),
        _ => bail!("invalid currency pair '{pair}', expected BASE/QUOTE"),
    }
}

impl AlphaVantageProvider {
    /// Fails immediately when the key is missing or blank.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, api_key: impl Into<String>) -> PriceResult<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(PriceError::Configuration(format!(
                "{API_KEY_ENV_VAR} is not configured"
            )));
        }
        let base = Url::parse(ALPHA_VANTAGE_URL).expect("valid url");
        Ok(Self {
            fetcher,
            base,
            api_key,
        })
    }

    pub fn with_base_url(mut self, base: &str) -> Result<Self> {
        self.base = Url::parse(base).with_context(|| format!("invalid Alpha Vantage url: {base}"))?;
        Ok(self)
    }

    fn query_url(&self, function: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("function", function);
            for (k, v) in params {
                qp.append_pair(k, v);
            }
            qp.append_pair("apikey", &self.api_key);
        }
        url
    }

    async fn fetch_rate(&self, pair: &str) -> Result<f64> {
        let (from, to) = parse_pair(pair)?;
        let url = self.query_url(
            "CURRENCY_EXCHANGE_RATE",
            &[("from_currency", from.as_str()), ("to_currency", to.as_str())],
        );

        let body = self.fetcher.get_json(url).await?;
        let resp: ExchangeRateResponse =
            serde_json::from_value(body).context("malformed Alpha Vantage response")?;

        let Some(rate) = resp.rate else {
            bail!(
                "{}",
                resp.notice
                    .message()
                    .unwrap_or("No exchange rate data in response")
            );
        };
        let text = rate
            .rate
            .ok_or_else(|| anyhow!("No exchange rate data in response"))?;
        parse_positive_price(&text).ok_or_else(|| anyhow!("Invalid exchange rate received"))
    }

    async fn fetch_daily(&self, pair: &str, days: u32) -> Result<Vec<PricePoint>> {
        let (from, to) = parse_pair(pair)?;
        let url = self.query_url("FX_DAILY", &[("from_symbol", from.as_str()), ("to_symbol", to.as_str())]);

        let body = self.fetcher.get_json(url).await?;
        let resp: DailySeriesResponse =
            serde_json::from_value(body).context("malformed Alpha Vantage response")?;

        let Some(series) = resp.series else {
            bail!(
                "{}",
                resp.notice
                    .message()
                    .unwrap_or("No time series data in response")
            );
        };

        // Most recent first by key (ISO dates sort lexically), keep `days`,
        // and only then parse; entries outside the window are never inspected.
        let mut entries: Vec<(String, DailyBar)> = series.into_iter().collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        entries.truncate(days as usize);

        let mut points = entries
            .into_iter()
            .map(|(date, bar)| -> Result<PricePoint> {
                let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .with_context(|| format!("invalid date in time series: {date}"))?;
                let price = bar
                    .close
                    .as_deref()
                    .and_then(parse_positive_price)
                    .ok_or_else(|| anyhow!("Invalid close price for {date}"))?;
                Ok(PricePoint { date: day, price })
            })
            .collect::<Result<Vec<_>>>()?;

        points.sort_by(|a, b| a.date.cmp(&b.date));

        if points.is_empty() {
            bail!("No historical data available");
        }
        Ok(points)
    }
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    fn asset_type(&self) -> AssetType {
        AssetType::Forex
    }

    async fn price(&self, pair: &str) -> PriceResult<f64> {
        info!("Fetching price for: {pair}");
        let price = self.fetch_rate(pair).await.map_err(|e| {
            error!("Error fetching {pair} price: {e:#}");
            PriceError::fetch_failed(pair, format!("{e:#}"))
        })?;
        info!("Fetched price for {pair}: ${price}");
        Ok(price)
    }

    async fn history(&self, pair: &str, days: u32) -> PriceResult<Vec<PricePoint>> {
        info!("Fetching {days} days of history for: {pair}");
        let history = self.fetch_daily(pair, days).await.map_err(|e| {
            error!("Error fetching {pair} history: {e:#}");
            PriceError::NotFound(format!("Error fetching {pair} history: {e:#}"))
        })?;
        info!("Fetched {} historical prices for {pair}", history.len());
        Ok(history)
    }

    fn history_is_synthetic(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::stub::StubFetcher;
    use serde_json::json;

    fn provider(stub: &Arc<StubFetcher>) -> AlphaVantageProvider {
        AlphaVantageProvider::new(stub.clone(), "TEST_KEY").unwrap()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_api_key_fails_at_construction() {
        let stub = Arc::new(StubFetcher::new());
        for key in ["", "   "] {
            let err = AlphaVantageProvider::new(stub.clone(), key).err().unwrap();
            assert_eq!(
                err,
                PriceError::Configuration("ALPHA_VANTAGE_API_KEY is not configured".into())
            );
        }
    }

    #[test]
    fn pair_parsing() {
        assert_eq!(
            parse_pair("eur/usd").unwrap(),
            ("EUR".to_string(), "USD".to_string())
        );
        assert_eq!(
            parse_pair(" Gbp / jpy ").unwrap(),
            ("GBP".to_string(), "JPY".to_string())
        );
        assert!(parse_pair("eurusd").is_err());
        assert!(parse_pair("eur/").is_err());
        assert!(parse_pair("eur/usd/jpy").is_err());
    }

    #[tokio::test]
    async fn fetches_eur_usd_rate() {
        let stub = Arc::new(StubFetcher::new().respond(json!({
            "Realtime Currency Exchange Rate": {"5. Exchange Rate": "1.1744"}
        })));

        let price = provider(&stub).price("eur/usd").await.unwrap();

        assert_eq!(price, 1.1744);
        assert!(stub.requests()[0].as_str().starts_with(ALPHA_VANTAGE_URL));
        assert_eq!(
            stub.query(0),
            pairs(&[
                ("function", "CURRENCY_EXCHANGE_RATE"),
                ("from_currency", "EUR"),
                ("to_currency", "USD"),
                ("apikey", "TEST_KEY"),
            ])
        );
    }

    #[tokio::test]
    async fn network_error_is_not_found() {
        let stub = Arc::new(StubFetcher::new().fail("Network error"));

        let err = provider(&stub).price("eur/usd").await.unwrap_err();

        assert_eq!(err.to_string(), "Error fetching eur/usd price: Network error");
    }

    #[tokio::test]
    async fn missing_rate_object_is_not_found() {
        let stub = Arc::new(StubFetcher::new().respond(json!({})));

        let err = provider(&stub).price("eur/usd").await.unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("No exchange rate data in response"));
    }

    #[tokio::test]
    async fn throttle_notice_is_surfaced() {
        let stub = Arc::new(StubFetcher::new().respond(json!({
            "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."
        })));

        let err = provider(&stub).price("eur/usd").await.unwrap_err();

        assert!(err.to_string().contains("standard API call frequency"));
    }

    #[tokio::test]
    async fn invalid_pair_skips_the_network() {
        let stub = Arc::new(StubFetcher::new());

        let err = provider(&stub).price("eurusd").await.unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("invalid currency pair"));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_rate_is_not_found() {
        let stub = Arc::new(StubFetcher::new().respond(json!({
            "Realtime Currency Exchange Rate": {"5. Exchange Rate": "n/a"}
        })));

        let err = provider(&stub).price("eur/usd").await.unwrap_err();

        assert!(err.to_string().contains("Invalid exchange rate received"));
    }

    #[tokio::test]
    async fn fetches_eur_usd_history() {
        let stub = Arc::new(StubFetcher::new().respond(json!({
            "Time Series FX (Daily)": {
                "2023-10-01": {"4. close": "1.1744"},
                "2023-10-02": {"4. close": "1.1750"}
            }
        })));
        let provider = provider(&stub);

        let history = provider.history("eur/usd", 2).await.unwrap();

        assert!(!provider.history_is_synthetic());
        assert_eq!(
            history,
            vec![
                PricePoint {
                    date: day(2023, 10, 1),
                    price: 1.1744
                },
                PricePoint {
                    date: day(2023, 10, 2),
                    price: 1.175
                },
            ]
        );
        assert_eq!(
            stub.query(0),
            pairs(&[
                ("function", "FX_DAILY"),
                ("from_symbol", "EUR"),
                ("to_symbol", "USD"),
                ("apikey", "TEST_KEY"),
            ])
        );
    }

    #[tokio::test]
    async fn history_keeps_most_recent_days() {
        let stub = Arc::new(StubFetcher::new().respond(json!({
            "Time Series FX (Daily)": {
                "2023-10-04": {"4. close": "1.20"},
                "2023-10-03": {"4. close": "1.19"},
                "2023-10-02": {"4. close": "1.18"},
                "2023-09-29": {"4. close": "1.17"}
            }
        })));

        let history = provider(&stub).history("eur/usd", 2).await.unwrap();

        let dates: Vec<_> = history.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(2023, 10, 3), day(2023, 10, 4)]);
    }

    #[tokio::test]
    async fn bad_entries_older_than_the_window_are_ignored() {
        let stub = Arc::new(StubFetcher::new().respond(json!({
            "Time Series FX (Daily)": {
                "2023-10-04": {"4. close": "1.20"},
                "2023-10-03": {"4. close": "1.19"},
                "2019-01-01": {"4. close": ""}
            }
        })));

        let history = provider(&stub).history("eur/usd", 2).await.unwrap();

        assert_eq!(
            history,
            vec![
                PricePoint { date: day(2023, 10, 3), price: 1.19 },
                PricePoint { date: day(2023, 10, 4), price: 1.20 },
            ]
        );
    }

    #[tokio::test]
    async fn bad_entry_inside_the_window_fails() {
        let stub = Arc::new(StubFetcher::new().respond(json!({
            "Time Series FX (Daily)": {
                "2023-10-04": {"4. close": "1.20"},
                "2023-10-03": {"4. close": "n/a"}
            }
        })));

        let err = provider(&stub).history("eur/usd", 2).await.unwrap_err();

        assert!(err.to_string().contains("Invalid close price for 2023-10-03"), "{err}");
    }

    #[tokio::test]
    async fn missing_series_is_not_found() {
        let stub = Arc::new(StubFetcher::new().respond(json!({"Meta Data": {}})));

        let err = provider(&stub).history("eur/usd", 7).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("No time series data in response"));
    }

    #[tokio::test]
    async fn empty_series_is_not_found() {
        let stub = Arc::new(StubFetcher::new().respond(json!({"Time Series FX (Daily)": {}})));

        let err = provider(&stub).history("eur/usd", 7).await.unwrap_err();

        assert!(err.to_string().contains("No historical data available"));
    }
}
