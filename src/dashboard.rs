//! Loads every tracked instrument into display rows
//!
//! Categories are fetched concurrently and joined before anything is shown;
//! inside a category requests go out one at a time. Failures never escape:
//! each instrument ends up as a live, placeholder or unavailable row.

use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::{CacheError, KeyValueStore};
use crate::config::Config;
use crate::data::{
    CryptoClient, ForexClient, Instrument, InstrumentKind, ProviderError, Quote, QuoteRow,
    QuoteStatus, StocksClient, Watchlist,
};
use crate::fetch::{Fetcher, Transport};

/// Rows for every category at one point in time
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub stocks: Vec<QuoteRow>,
    pub crypto: Vec<QuoteRow>,
    pub forex: Vec<QuoteRow>,
    /// When the load finished
    pub refreshed_at: DateTime<Local>,
}

impl Snapshot {
    pub fn rows(&self, kind: InstrumentKind) -> &[QuoteRow] {
        match kind {
            InstrumentKind::Stock => &self.stocks,
            InstrumentKind::Crypto => &self.crypto,
            InstrumentKind::Forex => &self.forex,
        }
    }

    /// Number of rows without live data
    pub fn unavailable_count(&self) -> usize {
        self.stocks
            .iter()
            .chain(&self.crypto)
            .chain(&self.forex)
            .filter(|row| !matches!(row.status, QuoteStatus::Live(_)))
            .count()
    }
}

/// Fetches the whole watchlist
#[derive(Debug, Clone)]
pub struct Dashboard {
    fetcher: Fetcher,
    stocks: StocksClient,
    crypto: CryptoClient,
    forex: ForexClient,
    watchlist: Watchlist,
    placeholders: bool,
}

impl Dashboard {
    pub fn new(fetcher: Fetcher, watchlist: Watchlist, placeholders: bool) -> Self {
        Self {
            stocks: StocksClient::new(fetcher.clone()),
            crypto: CryptoClient::new(fetcher.clone(), watchlist.crypto_currency.clone()),
            forex: ForexClient::new(fetcher.clone()),
            fetcher,
            watchlist,
            placeholders,
        }
    }

    /// Builds the fetcher and clients described by `config`
    pub fn from_config(
        config: &Config,
        transport: Arc<dyn Transport>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let fetcher = Fetcher::new(transport, store)
            .with_routes(config.routes.clone())
            .with_freshness(config.freshness())
            .with_timeout(config.timeout());
        Self::new(fetcher, config.watchlist.clone(), config.placeholders)
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    /// Fetches every category and returns the rows
    pub async fn load(&self) -> Snapshot {
        let (stocks, crypto, forex) = futures::join!(
            self.stocks.fetch_all(&self.watchlist.stocks),
            self.crypto.fetch_all(&self.watchlist.crypto),
            self.forex.fetch_all(&self.watchlist.forex),
        );

        let snapshot = Snapshot {
            stocks: self.to_rows(InstrumentKind::Stock, stocks),
            crypto: self.to_rows(InstrumentKind::Crypto, crypto),
            forex: self.to_rows(InstrumentKind::Forex, forex),
            refreshed_at: Local::now(),
        };

        info!(
            tracked = self.watchlist.len(),
            unavailable = snapshot.unavailable_count(),
            "dashboard refreshed"
        );
        snapshot
    }

    /// Empties the cache, then loads everything from the network
    ///
    /// A failed clear is logged and the reload still happens; entries that
    /// survive it are simply served while fresh.
    pub async fn clear_and_reload(&self) -> Snapshot {
        if let Err(e) = self.clear_cache() {
            warn!(error = %e, "failed to clear cache");
        }
        self.load().await
    }

    pub fn clear_cache(&self) -> Result<(), CacheError> {
        info!("clearing cache");
        self.fetcher.clear_cache()
    }

    fn to_rows(
        &self,
        kind: InstrumentKind,
        results: Vec<(Instrument, Result<Quote, ProviderError>)>,
    ) -> Vec<QuoteRow> {
        results
            .into_iter()
            .map(|(instrument, result)| {
                if let Err(e) = &result {
                    warn!(symbol = %instrument.symbol, error = %e, "quote unavailable");
                }
                QuoteRow::from_result(kind, instrument, result, self.placeholders)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::fetch::AccessRoute;
    use crate::testing::{offline_fetcher, OfflineTransport};

    fn offline_dashboard(placeholders: bool) -> Dashboard {
        Dashboard::new(
            offline_fetcher(Arc::new(MemoryStore::new())),
            Watchlist::default(),
            placeholders,
        )
    }

    #[tokio::test]
    async fn test_offline_load_marks_everything_unavailable() {
        let snapshot = offline_dashboard(false).load().await;

        assert_eq!(snapshot.stocks.len(), 3);
        assert_eq!(snapshot.crypto.len(), 3);
        assert_eq!(snapshot.forex.len(), 5);
        assert_eq!(snapshot.unavailable_count(), 11);
        assert!(snapshot
            .rows(InstrumentKind::Forex)
            .iter()
            .all(|row| row.status == QuoteStatus::Unavailable));
    }

    #[tokio::test]
    async fn test_offline_load_with_placeholders() {
        let snapshot = offline_dashboard(true).load().await;

        assert!(snapshot
            .stocks
            .iter()
            .all(|row| matches!(row.status, QuoteStatus::Placeholder(_))));
        assert_eq!(snapshot.unavailable_count(), 11);
    }

    #[tokio::test]
    async fn test_rows_keep_watchlist_order() {
        let snapshot = offline_dashboard(false).load().await;
        let symbols: Vec<&str> = snapshot
            .stocks
            .iter()
            .map(|row| row.instrument.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["AAPL", "NVDA", "TSLA"]);
    }

    #[test]
    fn test_from_config_uses_configured_routes() {
        let config = Config {
            routes: vec![AccessRoute::direct()],
            ..Default::default()
        };
        let dashboard =
            Dashboard::from_config(&config, Arc::new(OfflineTransport), Arc::new(MemoryStore::new()));
        assert_eq!(dashboard.fetcher.routes().len(), 1);
        assert_eq!(dashboard.watchlist().len(), 11);
    }
}
