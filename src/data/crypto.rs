//! CoinGecko simple-price client for cryptocurrencies
//!
//! One request covers every tracked coin. CoinGecko reports the current price
//! and a 24h percent change; the reference price is reconstructed from those
//! so crypto rows share the change arithmetic used everywhere else.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::{Instrument, ProviderError, Quote};
use crate::fetch::{FetchRequest, Fetcher};
use crate::quote::{derive_change, previous_from_percent};

/// Base URL for the CoinGecko simple price API
const COINGECKO_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

type PriceTable = HashMap<String, HashMap<String, Option<f64>>>;

/// Client for crypto quotes
#[derive(Debug, Clone)]
pub struct CryptoClient {
    fetcher: Fetcher,
    vs_currency: String,
}

impl CryptoClient {
    pub fn new(fetcher: Fetcher, vs_currency: impl Into<String>) -> Self {
        Self {
            fetcher,
            vs_currency: vs_currency.into().to_lowercase(),
        }
    }

    /// Price URL for a set of coin ids
    pub fn price_url(ids: &[&str], vs_currency: &str) -> String {
        format!(
            "{}?ids={}&vs_currencies={}&include_24hr_change=true",
            COINGECKO_PRICE_URL,
            urlencoding::encode(&ids.join(",")),
            urlencoding::encode(vs_currency)
        )
    }

    /// Fetches every coin in one request
    ///
    /// A failed request marks every coin unavailable; a coin missing from an
    /// otherwise good payload is unavailable on its own.
    pub async fn fetch_all(
        &self,
        instruments: &[Instrument],
    ) -> Vec<(Instrument, Result<Quote, ProviderError>)> {
        if instruments.is_empty() {
            return Vec::new();
        }

        let ids: Vec<&str> = instruments.iter().map(|i| i.symbol.as_str()).collect();
        // CoinGecko drops unknown ids from its reply, so any priced coin makes the batch usable
        let request = FetchRequest::new(Self::price_url(&ids, &self.vs_currency)).require_any(
            ids.iter()
                .map(|id| format!("/{}/{}", escape_pointer(id), escape_pointer(&self.vs_currency))),
        );

        let table = match self.fetcher.fetch(&request).await {
            Ok(payload) => parse_prices(payload),
            Err(e) => Err(e.into()),
        };

        match table {
            Ok(table) => instruments
                .iter()
                .map(|instrument| {
                    let result = quote_for(&table, &instrument.symbol, &self.vs_currency);
                    if let Ok(quote) = &result {
                        debug!(id = %instrument.symbol, price = quote.price, "crypto quote");
                    }
                    (instrument.clone(), result)
                })
                .collect(),
            Err(e) => {
                let message = e.to_string();
                instruments
                    .iter()
                    .map(|instrument| {
                        (
                            instrument.clone(),
                            Err(ProviderError::Batch(message.clone())),
                        )
                    })
                    .collect()
            }
        }
    }
}

/// Escapes a key for use in a JSON pointer
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn parse_prices(payload: Value) -> Result<PriceTable, ProviderError> {
    serde_json::from_value(payload).map_err(|e| ProviderError::Payload(e.to_string()))
}

/// Builds a quote for one coin from the price table
fn quote_for(table: &PriceTable, id: &str, vs_currency: &str) -> Result<Quote, ProviderError> {
    let prices = table
        .get(id)
        .ok_or_else(|| ProviderError::NotFound(id.to_string()))?;

    let price = prices
        .get(vs_currency)
        .copied()
        .flatten()
        .filter(|p| p.is_finite())
        .ok_or_else(|| ProviderError::Payload(format!("no {} price for {}", vs_currency, id)))?;

    let change = prices
        .get(&format!("{}_24h_change", vs_currency))
        .copied()
        .flatten()
        .and_then(|pct| previous_from_percent(price, pct))
        .and_then(|previous| derive_change(price, previous));

    Ok(Quote {
        price,
        change,
        currency: Some(vs_currency.to_uppercase()),
    })
}
