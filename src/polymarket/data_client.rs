use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;

use crate::detection::{SourceError, TradeSource};
use crate::models::{Side, Trade};

use super::types::ApiTrade;

const DATA_API_BASE: &str = "https://data-api.polymarket.com";

/// Polymarket Data API client — the trade source adapter.
#[derive(Debug, Clone)]
pub struct DataClient {
    http: Client,
    base_url: String,
}

impl DataClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: DATA_API_BASE.into(),
        }
    }

    pub fn with_base_url(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl TradeSource for DataClient {
    /// Fetch the most recent trades, newest first. Rows missing a wallet or
    /// a usable id are dropped; everything else is normalized into `Trade`.
    async fn fetch_recent_trades(&self, limit: u32) -> Result<Vec<Trade>, SourceError> {
        let url = format!("{}/trades", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("limit", limit.to_string())])
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }

        let resp = resp
            .error_for_status()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let raw: Vec<ApiTrade> = resp
            .json()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let fetched = raw.len();
        let trades: Vec<Trade> = raw.into_iter().filter_map(normalize_trade).collect();

        tracing::debug!(
            fetched,
            normalized = trades.len(),
            "Fetched recent trades"
        );

        Ok(trades)
    }
}

/// Turn a raw API row into a pipeline trade, or drop it.
fn normalize_trade(raw: ApiTrade) -> Option<Trade> {
    // A trade without an id cannot be deduplicated; fall back to the tx hash.
    let trade_id = raw.id.or(raw.transaction_hash)?;

    let wallet = raw.maker_address.filter(|w| !w.is_empty())?.to_lowercase();

    let side = Side::from_api_str(raw.side.as_deref().unwrap_or("BUY"))?;

    let size = raw.size.unwrap_or(Decimal::ZERO);
    let price = raw.price.unwrap_or(Decimal::ZERO);

    let timestamp = parse_trade_timestamp(raw.timestamp.as_ref()).unwrap_or_else(Utc::now);

    Some(Trade {
        trade_id,
        wallet,
        market_id: raw.market.unwrap_or_else(|| "unknown".into()),
        outcome: raw.outcome.unwrap_or_default(),
        side,
        size,
        price,
        notional: size * price,
        timestamp,
    })
}

/// The API reports timestamps as epoch seconds, epoch millis, or RFC3339
/// strings depending on endpoint version.
fn parse_trade_timestamp(ts: Option<&serde_json::Value>) -> Option<DateTime<Utc>> {
    ts.and_then(|t| match t {
        serde_json::Value::Number(n) => {
            let secs = n.as_i64()?;
            // If >1e12, it's milliseconds
            if secs > 1_000_000_000_000 {
                DateTime::from_timestamp(secs / 1000, ((secs % 1000) * 1_000_000) as u32)
            } else {
                DateTime::from_timestamp(secs, 0)
            }
        }
        serde_json::Value::String(s) => {
            if let Ok(secs) = s.parse::<i64>() {
                if secs > 1_000_000_000_000 {
                    return DateTime::from_timestamp(
                        secs / 1000,
                        ((secs % 1000) * 1_000_000) as u32,
                    );
                }
                return DateTime::from_timestamp(secs, 0);
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        _ => None,
    })
}
