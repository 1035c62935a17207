use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BUY" | "0" => Some(Side::Buy),
            "SELL" | "1" => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

// ---------------------------------------------------------------------------
// Trade — core pipeline message
// ---------------------------------------------------------------------------

/// One normalized trade from the venue feed. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Venue-unique trade identifier, used for deduplication.
    pub trade_id: String,
    pub wallet: String,
    pub market_id: String,
    pub outcome: String,
    pub side: Side,
    pub size: Decimal,
    pub price: Decimal,
    /// USDC value of the trade (`size * price`).
    pub notional: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade: wallet={} market={} side={} notional={}",
            &self.wallet[..8.min(self.wallet.len())],
            &self.market_id[..8.min(self.market_id.len())],
            self.side,
            self.notional,
        )
    }
}

// ---------------------------------------------------------------------------
// Market details (enrichment)
// ---------------------------------------------------------------------------

/// Human-readable market details fetched from the metadata API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDetails {
    pub question: String,
    pub outcomes: Vec<String>,
}

impl MarketDetails {
    /// Placeholder used when the metadata lookup fails. A signal is never
    /// dropped just because enrichment was unavailable.
    pub fn unknown() -> Self {
        Self {
            question: "Unknown market".into(),
            outcomes: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// A qualifying copy-trade signal: a large trade from a recently first-seen
/// wallet, enriched with market details and handed off to the sinks.
#[derive(Debug, Clone)]
pub struct Signal {
    pub trade: Trade,
    pub market: MarketDetails,
    /// How long the wallet had been known when the signal was generated.
    pub wallet_age: Duration,
    pub generated_at: DateTime<Utc>,
}
