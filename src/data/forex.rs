//! Frankfurter client for currency pairs
//!
//! Frankfurter publishes ECB reference rates once per working day. A short
//! open-ended time series gives the latest rate and the one before it, which
//! serve as current and reference values.

use std::collections::{BTreeMap, HashMap};

use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Instrument, ProviderError, Quote};
use crate::fetch::{FetchRequest, Fetcher};
use crate::quote::derive_change;

/// Base URL for the Frankfurter API
const FRANKFURTER_BASE_URL: &str = "https://api.frankfurter.app";

/// Days of history requested; covers weekends and holidays
const SERIES_DAYS: i64 = 7;

/// Time series response from Frankfurter
#[derive(Debug, Deserialize)]
struct SeriesResponse {
    rates: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

/// Client for currency pair quotes
#[derive(Debug, Clone)]
pub struct ForexClient {
    fetcher: Fetcher,
}

/// Splits `"USD/SEK"` into `("USD", "SEK")`
pub fn parse_pair(symbol: &str) -> Result<(String, String), ProviderError> {
    let (from, to) = symbol
        .split_once('/')
        .ok_or_else(|| ProviderError::InvalidInstrument(symbol.to_string()))?;
    let (from, to) = (from.trim(), to.trim());

    let is_code = |code: &str| code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic());
    if !is_code(from) || !is_code(to) {
        return Err(ProviderError::InvalidInstrument(symbol.to_string()));
    }

    Ok((from.to_uppercase(), to.to_uppercase()))
}

impl ForexClient {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Series URL for a pair, starting `SERIES_DAYS` before `today`
    pub fn series_url(from: &str, to: &str, today: NaiveDate) -> String {
        let start = today - chrono::Duration::days(SERIES_DAYS);
        format!(
            "{}/{}..?from={}&to={}",
            FRANKFURTER_BASE_URL,
            start.format("%Y-%m-%d"),
            from,
            to
        )
    }

    /// Fetches the quote for one pair
    pub async fn fetch_quote(&self, instrument: &Instrument) -> Result<Quote, ProviderError> {
        let (from, to) = parse_pair(&instrument.symbol)?;
        let url = Self::series_url(&from, &to, Local::now().date_naive());

        let payload = self.fetcher.fetch(&FetchRequest::new(url).require("/rates")).await?;
        let quote = parse_series(payload, &to)?;
        debug!(pair = %instrument.symbol, rate = quote.price, "forex quote");
        Ok(quote)
    }

    /// Fetches every pair in order, one at a time
    pub async fn fetch_all(
        &self,
        instruments: &[Instrument],
    ) -> Vec<(Instrument, Result<Quote, ProviderError>)> {
        let mut results = Vec::with_capacity(instruments.len());
        for instrument in instruments {
            let result = self.fetch_quote(instrument).await;
            results.push((instrument.clone(), result));
        }
        results
    }
}

/// Extracts the latest rate and its change from a time series payload
fn parse_series(payload: Value, to: &str) -> Result<Quote, ProviderError> {
    let series: SeriesResponse =
        serde_json::from_value(payload).map_err(|e| ProviderError::Payload(e.to_string()))?;

    let mut rates = series
        .rates
        .values()
        .rev()
        .filter_map(|day| day.get(to).copied());

    let price = rates
        .next()
        .ok_or_else(|| ProviderError::NotFound(to.to_string()))?;
    let change = rates.next().and_then(|previous| derive_change(price, previous));

    Ok(Quote {
        price,
        change,
        currency: Some(to.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("USD/SEK").unwrap(),
            ("USD".to_string(), "SEK".to_string())
        );
        assert_eq!(
            parse_pair(" eur / usd ").unwrap(),
            ("EUR".to_string(), "USD".to_string())
        );
    }

    #[test]
    fn test_parse_pair_rejects_malformed() {
        assert!(parse_pair("USDSEK").is_err());
        assert!(parse_pair("US/SEK").is_err());
        assert!(parse_pair("USD/S3K").is_err());
    }

    #[test]
    fn test_series_url() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        assert_eq!(
            ForexClient::series_url("USD", "SEK", today),
            "https://api.frankfurter.app/2025-12-08..?from=USD&to=SEK"
        );
    }

    #[test]
    fn test_parse_series_uses_last_two_days() {
        let payload = json!({
            "amount": 1.0,
            "base": "USD",
            "start_date": "2025-12-08",
            "end_date": "2025-12-12",
            "rates": {
                "2025-12-10": {"SEK": 9.0},
                "2025-12-12": {"SEK": 9.9},
                "2025-12-11": {"SEK": 10.0}
            }
        });

        let quote = parse_series(payload, "SEK").unwrap();

        assert_eq!(quote.price, 9.9);
        assert_eq!(quote.currency.as_deref(), Some("SEK"));
        let change = quote.change.unwrap();
        assert!((change.absolute + 0.1).abs() < 1e-9);
        assert!((change.percent + 1.0).abs() < 1e-9);
        assert!(!change.non_negative);
    }

    #[test]
    fn test_parse_series_single_day_has_no_change() {
        let payload = json!({"rates": {"2025-12-12": {"USD": 1.16}}});
        let quote = parse_series(payload, "USD").unwrap();
        assert_eq!(quote.price, 1.16);
        assert!(quote.change.is_none());
    }

    #[test]
    fn test_parse_series_without_target_currency() {
        let payload = json!({"rates": {"2025-12-12": {"EUR": 0.9}}});
        assert!(matches!(
            parse_series(payload, "SEK"),
            Err(ProviderError::NotFound(_))
        ));
    }
}
