//! Yahoo Finance chart client for equities
//!
//! Uses the key-less v8 chart endpoint. The `meta` block carries the current
//! price and two reference closes; `previousClose` is preferred and
//! `chartPreviousClose` covers the days it is missing or zero.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Instrument, ProviderError, Quote};
use crate::fetch::{FetchRequest, Fetcher};
use crate::quote::derive_change_with_fallback;

/// Base URL for the Yahoo chart API
const YAHOO_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Block holding the quote fields
const CHART_META_POINTER: &str = "/chart/result/0/meta";

/// Field a usable chart payload cannot do without
const CHART_PRICE_POINTER: &str = "/chart/result/0/meta/regularMarketPrice";

/// Subset of the chart `meta` block we read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    currency: Option<String>,
}

/// Client for stock quotes
#[derive(Debug, Clone)]
pub struct StocksClient {
    fetcher: Fetcher,
}

impl StocksClient {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Chart URL for a ticker
    pub fn chart_url(symbol: &str) -> String {
        format!(
            "{}/{}?range=1d&interval=1d&includePrePost=false",
            YAHOO_CHART_BASE_URL,
            urlencoding::encode(symbol)
        )
    }

    /// Fetches the quote for one ticker
    pub async fn fetch_quote(&self, instrument: &Instrument) -> Result<Quote, ProviderError> {
        let request =
            FetchRequest::new(Self::chart_url(&instrument.symbol)).require(CHART_PRICE_POINTER);
        let payload = self.fetcher.fetch(&request).await?;
        let quote = parse_chart(&payload)?;
        debug!(symbol = %instrument.symbol, price = quote.price, "stock quote");
        Ok(quote)
    }

    /// Fetches every ticker in order, one at a time
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

/// Extracts a quote from a chart payload
fn parse_chart(payload: &Value) -> Result<Quote, ProviderError> {
    let meta = payload
        .pointer(CHART_META_POINTER)
        .cloned()
        .ok_or_else(|| ProviderError::Payload("missing chart meta".to_string()))?;
    let meta: ChartMeta =
        serde_json::from_value(meta).map_err(|e| ProviderError::Payload(e.to_string()))?;

    let price = meta
        .regular_market_price
        .filter(|p| p.is_finite())
        .ok_or_else(|| ProviderError::Payload("missing regularMarketPrice".to_string()))?;

    Ok(Quote {
        price,
        change: derive_change_with_fallback(price, meta.previous_close, meta.chart_previous_close),
        currency: meta.currency,
    })
}
