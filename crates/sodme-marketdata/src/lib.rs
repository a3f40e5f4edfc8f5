//! sodme-marketdata
//!
//! Pulls last-trade, 5-level depth, and IV/Greeks for instrument tokens from
//! the broker (`kite::KiteMarketDataAdapter` over the `adapter::MarketDataAdapter`
//! pull interface), and fans out live ticks from the broker's streaming
//! WebSocket (`ticker::TickerClient`) through `feed::DepthFeedHub`'s
//! subscribe interface. Also owns the margin-engine factor feeds: the daily
//! NSE margin file cache, the India VIX reading and its recompute trigger,
//! and per-instrument futures settlement prices.

pub mod adapter;
pub mod error;
pub mod feed;
pub mod kite;
pub mod margin_cache;
pub mod settlement;
pub mod ticker;
pub mod types;
pub mod vix;

pub use adapter::MarketDataAdapter;
pub use error::MarketDataError;
pub use feed::DepthFeedHub;
pub use kite::KiteMarketDataAdapter;
pub use margin_cache::NseMarginFileCache;
pub use settlement::SettlementCache;
pub use ticker::TickerClient;
pub use types::{Greeks, NseMarginFileRow, Quote, SettlementPrice, VixReading};
pub use vix::VixCache;
