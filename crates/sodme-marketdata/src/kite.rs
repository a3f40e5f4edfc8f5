use chrono::Utc;
use serde::Deserialize;

use sodme_schemas::depth::{DepthLevel, DepthSnapshot};
use sodme_schemas::money::Paise;

use crate::adapter::MarketDataAdapter;
use crate::error::MarketDataError;
use crate::types::{Greeks, Quote};

/// Pull-side adapter backed by Kite Connect's REST quote/depth endpoints.
/// The access token is supplied by the caller (the broker session owner,
/// `sodme-gateway`) and never logged.
#[derive(Debug, Clone)]
pub struct KiteMarketDataAdapter {
    access_token: String,
    http: reqwest::Client,
    base_url: String,
}

impl KiteMarketDataAdapter {
    pub fn new(access_token: String) -> Self {
        Self::new_with_base_url(access_token, "https://api.kite.trade".to_string())
    }

    pub fn new_with_base_url(access_token: String, base_url: String) -> Self {
        Self {
            access_token,
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn quote_url(&self) -> String {
        format!("{}/quote", self.base_url.trim_end_matches('/'))
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.access_token)
    }

    async fn fetch_quote_response(
        &self,
        instrument_token: i64,
    ) -> Result<KiteQuoteResponse, MarketDataError> {
        let resp = self
            .http
            .get(self.quote_url())
            .header("Authorization", self.auth_header())
            .query(&[("i", instrument_token.to_string())])
            .send()
            .await
            .map_err(|e| MarketDataError::BrokerError {
                endpoint: "quote".to_string(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        let body: KiteEnvelope<KiteQuoteResponse> =
            resp.json().await.map_err(|e| MarketDataError::BrokerError {
                endpoint: "quote".to_string(),
                message: format!("decode failed: {e}"),
            })?;

        if !status.is_success() || body.status != "success" {
            return Err(MarketDataError::BrokerError {
                endpoint: "quote".to_string(),
                message: body.message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        body.data.ok_or_else(|| MarketDataError::Unavailable {
            instrument_token,
            what: "quote",
        })
    }
}

#[async_trait::async_trait]
impl MarketDataAdapter for KiteMarketDataAdapter {
    async fn last_trade(&self, instrument_token: i64) -> Result<Quote, MarketDataError> {
        let q = self.fetch_quote_response(instrument_token).await?;
        Ok(Quote {
            instrument_token,
            last_price: Paise::from_f64_rupees(q.last_price),
            ts: Utc::now(),
        })
    }

    async fn depth(&self, instrument_token: i64) -> Result<DepthSnapshot, MarketDataError> {
        let q = self.fetch_quote_response(instrument_token).await?;
        let to_levels = |rows: &[KiteDepthRow]| -> Vec<DepthLevel> {
            rows.iter()
                .take(5)
                .map(|r| DepthLevel {
                    price: Paise::from_f64_rupees(r.price),
                    quantity: r.quantity,
                })
                .collect()
        };
        Ok(DepthSnapshot {
            instrument_token,
            bids: to_levels(&q.depth.buy),
            asks: to_levels(&q.depth.sell),
        })
    }

    async fn greeks(&self, instrument_token: i64) -> Result<Greeks, MarketDataError> {
        // Kite's quote endpoint does not carry Greeks directly; callers on an
        // options instrument should combine `depth`'s mid price with a
        // separate analytics source. This adapter reports what the broker
        // feed can actually supply and nothing invented.
        Err(MarketDataError::Unavailable {
            instrument_token,
            what: "greeks",
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct KiteEnvelope<T> {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "data", deserialize_with = "deserialize_single_quote")]
    data: Option<T>,
}

fn deserialize_single_quote<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    use std::collections::HashMap;
    let map: HashMap<String, T> = HashMap::deserialize(deserializer)?;
    Ok(map.into_values().next())
}

#[derive(Debug, Deserialize)]
struct KiteQuoteResponse {
    last_price: f64,
    depth: KiteDepth,
}

#[derive(Debug, Deserialize)]
struct KiteDepth {
    buy: Vec<KiteDepthRow>,
    sell: Vec<KiteDepthRow>,
}

#[derive(Debug, Deserialize)]
struct KiteDepthRow {
    price: f64,
    quantity: i64,
}
