use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw trade row from the Data API. Everything is optional: the feed is
/// permissive and rows with missing fields are dropped during normalization
/// rather than failing the whole batch.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiTrade {
    pub id: Option<String>,
    pub market: Option<String>,
    pub asset_id: Option<String>,
    pub side: Option<String>,
    pub outcome: Option<String>,
    pub size: Option<Decimal>,
    pub price: Option<Decimal>,
    pub maker_address: Option<String>,
    pub taker_address: Option<String>,
    /// Epoch seconds, epoch millis, or RFC3339 — the API is inconsistent.
    pub timestamp: Option<serde_json::Value>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}
