use sodme_schemas::depth::DepthSnapshot;

use crate::error::MarketDataError;
use crate::types::{Greeks, Quote};

/// Pull-side market data interface: last-trade, 5-level depth, and
/// IV/Greeks for a single instrument token, fetched on demand from the
/// broker. The subscribe side (live ticks pushed to interested callers) is
/// a separate concern, owned by `feed::DepthFeedHub`.
#[async_trait::async_trait]
pub trait MarketDataAdapter: Send + Sync {
    async fn last_trade(&self, instrument_token: i64) -> Result<Quote, MarketDataError>;

    async fn depth(&self, instrument_token: i64) -> Result<DepthSnapshot, MarketDataError>;

    async fn greeks(&self, instrument_token: i64) -> Result<Greeks, MarketDataError>;
}
