//! Instruments, quotes and the provider clients that produce them
//!
//! Each provider turns a tracked instrument into a [`Quote`] by fetching a
//! public JSON endpoint through the shared [`crate::fetch::Fetcher`]. A
//! provider failure is never fatal: the dashboard turns it into an
//! "unavailable" (or placeholder) row.

pub mod crypto;
pub mod forex;
pub mod stocks;
pub mod watchlist;

pub use crypto::CryptoClient;
pub use forex::ForexClient;
pub use stocks::StocksClient;
pub use watchlist::Watchlist;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetch::FetchError;
use crate::quote::QuoteChange;

/// Errors that can occur while producing a quote
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No access route produced a usable payload
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The payload decoded but did not contain a usable value
    #[error("Unusable payload: {0}")]
    Payload(String),

    /// The instrument was not present in the payload
    #[error("No data for {0}")]
    NotFound(String),

    /// The request shared by several instruments failed
    #[error("Batch request failed: {0}")]
    Batch(String),

    /// The instrument definition itself is malformed
    #[error("Invalid instrument: {0}")]
    InvalidInstrument(String),
}

/// Asset categories shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentKind {
    Stock,
    Crypto,
    Forex,
}

impl InstrumentKind {
    /// Panel title for the category
    pub fn title(&self) -> &'static str {
        match self {
            InstrumentKind::Stock => "Stocks",
            InstrumentKind::Crypto => "Crypto",
            InstrumentKind::Forex => "Currencies",
        }
    }
}

/// A tracked instrument
///
/// `symbol` is provider specific: a ticker for stocks (`AAPL`), a CoinGecko
/// id for crypto (`bitcoin`), and a `FROM/TO` pair for currencies (`USD/SEK`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    /// Display label, defaults to the symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Static value shown when live data is unavailable and placeholders are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<f64>,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            label: None,
            placeholder: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, value: f64) -> Self {
        self.placeholder = Some(value);
        self
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.symbol)
    }
}

/// A normalized quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Current value
    pub price: f64,
    /// Change against the reference value, if one was usable
    pub change: Option<QuoteChange>,
    /// Currency the price is quoted in, if known
    pub currency: Option<String>,
}

/// What the dashboard can show for one instrument
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteStatus {
    /// Live (or freshly cached) data
    Live(Quote),
    /// Static placeholder standing in for unavailable data
    Placeholder(Quote),
    /// No data right now
    Unavailable,
}

/// One display row
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
    pub kind: InstrumentKind,
    pub instrument: Instrument,
    pub status: QuoteStatus,
}

impl QuoteRow {
    /// Builds a row from a provider result, falling back to the placeholder when allowed
    pub fn from_result(
        kind: InstrumentKind,
        instrument: Instrument,
        result: Result<Quote, ProviderError>,
        placeholders: bool,
    ) -> Self {
        let status = match result {
            Ok(quote) => QuoteStatus::Live(quote),
            Err(_) => match instrument.placeholder {
                Some(price) if placeholders => QuoteStatus::Placeholder(Quote {
                    price,
                    change: None,
                    currency: None,
                }),
                _ => QuoteStatus::Unavailable,
            },
        };
        Self {
            kind,
            instrument,
            status,
        }
    }

    pub fn quote(&self) -> Option<&Quote> {
        match &self.status {
            QuoteStatus::Live(quote) | QuoteStatus::Placeholder(quote) => Some(quote),
            QuoteStatus::Unavailable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_quote() -> Quote {
        Quote {
            price: 10.0,
            change: None,
            currency: Some("USD".to_string()),
        }
    }

    #[test]
    fn test_display_label_defaults_to_symbol() {
        assert_eq!(Instrument::new("AAPL").display_label(), "AAPL");
        assert_eq!(
            Instrument::new("bitcoin").labeled("Bitcoin (BTC)").display_label(),
            "Bitcoin (BTC)"
        );
    }

    #[test]
    fn test_row_from_success_is_live() {
        let row = QuoteRow::from_result(
            InstrumentKind::Stock,
            Instrument::new("AAPL"),
            Ok(live_quote()),
            false,
        );
        assert_eq!(row.status, QuoteStatus::Live(live_quote()));
    }

    #[test]
    fn test_row_from_failure_is_unavailable() {
        let row = QuoteRow::from_result(
            InstrumentKind::Stock,
            Instrument::new("AAPL").with_placeholder(190.0),
            Err(ProviderError::NotFound("AAPL".to_string())),
            false,
        );
        assert_eq!(row.status, QuoteStatus::Unavailable);
        assert!(row.quote().is_none());
    }

    #[test]
    fn test_row_from_failure_uses_placeholder_when_enabled() {
        let row = QuoteRow::from_result(
            InstrumentKind::Stock,
            Instrument::new("AAPL").with_placeholder(190.0),
            Err(ProviderError::NotFound("AAPL".to_string())),
            true,
        );
        assert!(matches!(row.status, QuoteStatus::Placeholder(ref q) if q.price == 190.0));
    }

    #[test]
    fn test_row_without_placeholder_stays_unavailable() {
        let row = QuoteRow::from_result(
            InstrumentKind::Forex,
            Instrument::new("USD/SEK"),
            Err(ProviderError::Payload("empty".to_string())),
            true,
        );
        assert_eq!(row.status, QuoteStatus::Unavailable);
    }

    #[test]
    fn test_instrument_deserializes_with_defaults() {
        let inst: Instrument = serde_json::from_str(r#"{"symbol": "NVDA"}"#).unwrap();
        assert_eq!(inst, Instrument::new("NVDA"));
    }
}
