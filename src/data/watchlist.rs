//! The set of tracked instruments

use serde::{Deserialize, Serialize};

use super::{Instrument, InstrumentKind};

/// Instruments tracked per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Watchlist {
    pub stocks: Vec<Instrument>,
    pub crypto: Vec<Instrument>,
    /// Currency crypto prices are quoted in (CoinGecko `vs_currencies`)
    pub crypto_currency: String,
    pub forex: Vec<Instrument>,
}

impl Default for Watchlist {
    fn default() -> Self {
        Self {
            stocks: vec![
                Instrument::new("AAPL").labeled("Apple (AAPL)").with_placeholder(230.0),
                Instrument::new("NVDA").labeled("Nvidia (NVDA)").with_placeholder(180.0),
                Instrument::new("TSLA").labeled("Tesla (TSLA)").with_placeholder(430.0),
            ],
            crypto: vec![
                Instrument::new("bitcoin").labeled("Bitcoin (BTC)").with_placeholder(110_000.0),
                Instrument::new("ethereum").labeled("Ethereum (ETH)").with_placeholder(4_000.0),
                Instrument::new("solana").labeled("Solana (SOL)").with_placeholder(200.0),
            ],
            crypto_currency: "usd".to_string(),
            forex: vec![
                Instrument::new("USD/SEK").with_placeholder(9.5),
                Instrument::new("EUR/SEK").with_placeholder(11.0),
                Instrument::new("GBP/SEK").with_placeholder(12.6),
                Instrument::new("JPY/SEK").with_placeholder(0.063),
                Instrument::new("EUR/USD").with_placeholder(1.16),
            ],
        }
    }
}

impl Watchlist {
    pub fn instruments(&self, kind: InstrumentKind) -> &[Instrument] {
        match kind {
            InstrumentKind::Stock => &self.stocks,
            InstrumentKind::Crypto => &self.crypto,
            InstrumentKind::Forex => &self.forex,
        }
    }

    /// Total number of tracked instruments
    pub fn len(&self) -> usize {
        self.stocks.len() + self.crypto.len() + self.forex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
