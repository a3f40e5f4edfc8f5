use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use sodme_schemas::depth::{DepthLevel, DepthSnapshot};
use sodme_schemas::money::Paise;

use crate::feed::DepthFeedHub;

const MAX_RECONNECT_DELAY_SECS: u64 = 30;

/// One depth tick as the broker's streaming ticker frames it: top-5 bid/ask
/// levels for one instrument token. Prices arrive as decimal strings so the
/// conversion into `Paise` is explicit and deterministic rather than a raw
/// float cast.
#[derive(Debug, Clone, Deserialize)]
struct TickerDepthMessage {
    instrument_token: i64,
    bids: Vec<[String; 2]>,
    asks: Vec<[String; 2]>,
}

fn parse_levels(rows: &[[String; 2]]) -> Result<Vec<DepthLevel>, String> {
    rows.iter()
        .take(5)
        .map(|[price, qty]| {
            let price: f64 = price.parse().map_err(|_| format!("bad price '{price}'"))?;
            let quantity: i64 = qty.parse().map_err(|_| format!("bad quantity '{qty}'"))?;
            Ok(DepthLevel { price: Paise::from_f64_rupees(price), quantity })
        })
        .collect()
}

impl TickerDepthMessage {
    fn into_snapshot(self) -> Result<DepthSnapshot, String> {
        Ok(DepthSnapshot {
            instrument_token: self.instrument_token,
            bids: parse_levels(&self.bids)?,
            asks: parse_levels(&self.asks)?,
        })
    }
}

/// Subscribe-side client for the broker's live tick WebSocket. Connects,
/// decodes incoming depth frames, and publishes them into a shared
/// `DepthFeedHub` so every caller pulls from one place regardless of which
/// instrument tokens it is subscribed to. Reconnects with exponential
/// backoff on disconnect, the same recovery shape a broker-facing stream
/// needs during an NSE feed blip.
pub struct TickerClient {
    url: String,
    hub: Arc<DepthFeedHub>,
}

impl TickerClient {
    pub fn new(url: String, hub: Arc<DepthFeedHub>) -> Self {
        Self { url, hub }
    }

    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut retry_count = 0u32;
            loop {
                match self.connect_and_process().await {
                    Ok(()) => {
                        info!(url = %self.url, "ticker connection closed normally");
                        break;
                    }
                    Err(e) => {
                        let delay_secs = std::cmp::min(2u64.pow(retry_count), MAX_RECONNECT_DELAY_SECS);
                        warn!(url = %self.url, error = %e, delay_secs, "ticker connection failed, reconnecting");
                        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                        retry_count = (retry_count + 1).min(10);
                    }
                }
            }
        })
    }

    async fn connect_and_process(&self) -> Result<(), String> {
        let (ws_stream, _) = connect_async(&self.url).await.map_err(|e| e.to_string())?;
        info!(url = %self.url, "ticker connected");
        let (_, mut read) = ws_stream.split();

        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<TickerDepthMessage>(&text) {
                    Ok(tick) => match tick.into_snapshot() {
                        Ok(snapshot) => {
                            debug!(instrument_token = snapshot.instrument_token, "ticker depth update");
                            self.hub.publish(snapshot);
                        }
                        Err(e) => error!(error = %e, "ticker depth decode failed"),
                    },
                    Err(e) => error!(error = %e, text = %text, "ticker message parse failed"),
                },
                Ok(Message::Close(frame)) => {
                    info!(frame = ?frame, "ticker close frame received");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "ticker websocket error");
                    break;
                }
            }
        }

        Err("ticker disconnected".to_string())
    }
}
