//! Text formatting shared by the terminal and plain-text renderers

use crate::data::{InstrumentKind, QuoteRow, QuoteStatus};
use crate::quote::QuoteChange;

/// Shown in the price column when nothing is known
pub const NO_PRICE: &str = "—";

/// Shown in the change column for unavailable rows
pub const OFFLINE: &str = "Offline";

/// Decimal places for a price
fn decimals(kind: InstrumentKind, value: f64) -> usize {
    match kind {
        InstrumentKind::Forex => 4,
        _ if value.abs() < 1.0 => 4,
        _ => 2,
    }
}

/// Formats a price with its currency prefix or suffix
///
/// Currency pairs are bare rates.
pub fn format_price(kind: InstrumentKind, price: f64, currency: Option<&str>) -> String {
    let places = decimals(kind, price);
    match currency {
        _ if kind == InstrumentKind::Forex => format!("{:.*}", places, price),
        Some("USD") => format!("${:.*}", places, price),
        Some(code) => format!("{:.*} {}", places, price, code),
        None => format!("{:.*}", places, price),
    }
}

/// Formats a change as `+1.23 (+0.45%)`
pub fn format_change(kind: InstrumentKind, price: f64, change: &QuoteChange) -> String {
    let places = decimals(kind, price);
    format!(
        "{sign}{abs:.places$} ({sign}{pct:.2}%)",
        sign = change.sign(),
        abs = change.absolute,
        pct = change.percent,
        places = places
    )
}

/// Price and change columns for a row
pub fn row_columns(row: &QuoteRow) -> (String, String) {
    match &row.status {
        QuoteStatus::Live(quote) => (
            format_price(row.kind, quote.price, quote.currency.as_deref()),
            quote
                .change
                .as_ref()
                .map(|c| format_change(row.kind, quote.price, c))
                .unwrap_or_default(),
        ),
        QuoteStatus::Placeholder(quote) => (
            format!("~{}", format_price(row.kind, quote.price, quote.currency.as_deref())),
            "Placeholder".to_string(),
        ),
        QuoteStatus::Unavailable => (NO_PRICE.to_string(), OFFLINE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Instrument, Quote};
    use crate::quote::derive_change;

    #[test]
    fn test_format_price_usd() {
        assert_eq!(format_price(InstrumentKind::Stock, 189.5, Some("USD")), "$189.50");
        assert_eq!(format_price(InstrumentKind::Crypto, 0.1234567, Some("USD")), "$0.1235");
    }

    #[test]
    fn test_format_price_other_currency() {
        assert_eq!(format_price(InstrumentKind::Stock, 310.0, Some("SEK")), "310.00 SEK");
        assert_eq!(format_price(InstrumentKind::Stock, 310.0, None), "310.00");
    }

    #[test]
    fn test_format_price_forex_uses_four_places() {
        assert_eq!(format_price(InstrumentKind::Forex, 9.51, Some("SEK")), "9.5100");
    }

    #[test]
    fn test_format_change_positive() {
        let change = derive_change(100.0, 90.0).unwrap();
        assert_eq!(format_change(InstrumentKind::Stock, 100.0, &change), "+10.00 (+11.11%)");
    }

    #[test]
    fn test_format_change_negative() {
        let change = derive_change(90.0, 100.0).unwrap();
        assert_eq!(format_change(InstrumentKind::Stock, 90.0, &change), "-10.00 (-10.00%)");
    }

    #[test]
    fn test_row_columns_unavailable() {
        let row = QuoteRow {
            kind: InstrumentKind::Stock,
            instrument: Instrument::new("AAPL"),
            status: QuoteStatus::Unavailable,
        };
        assert_eq!(row_columns(&row), ("—".to_string(), "Offline".to_string()));
    }

    #[test]
    fn test_row_columns_placeholder() {
        let row = QuoteRow {
            kind: InstrumentKind::Stock,
            instrument: Instrument::new("AAPL"),
            status: QuoteStatus::Placeholder(Quote {
                price: 230.0,
                change: None,
                currency: None,
            }),
        };
        assert_eq!(row_columns(&row).0, "~230.00");
    }

    #[test]
    fn test_row_columns_live_without_change() {
        let row = QuoteRow {
            kind: InstrumentKind::Forex,
            instrument: Instrument::new("EUR/USD"),
            status: QuoteStatus::Live(Quote {
                price: 1.1612,
                change: None,
                currency: Some("USD".to_string()),
            }),
        };
        assert_eq!(row_columns(&row), ("1.1612".to_string(), String::new()));
    }
}
