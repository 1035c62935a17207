use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::detection::{MarketMetadata, MetadataError};
use crate::models::MarketDetails;

const GAMMA_API_BASE: &str = "https://gamma-api.polymarket.com";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GammaMarket {
    pub question: String,
    /// JSON array of outcome labels, e.g. ["Yes","No"] — the API returns it
    /// as a stringified array.
    #[serde(default)]
    pub outcomes: Option<String>,
}

impl GammaMarket {
    fn parse_outcomes(&self) -> Vec<String> {
        self.outcomes
            .as_deref()
            .and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
            .unwrap_or_default()
    }
}

/// Polymarket Gamma API client — the market metadata adapter.
#[derive(Debug, Clone)]
pub struct GammaClient {
    http: Client,
    base_url: String,
}

impl GammaClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: GAMMA_API_BASE.into(),
        }
    }

    pub fn with_base_url(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl MarketMetadata for GammaClient {
    async fn fetch_market(&self, market_id: &str) -> Result<MarketDetails, MetadataError> {
        let url = format!("{}/markets/{}", self.base_url, market_id);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MetadataError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| MetadataError::Unavailable(e.to_string()))?;

        let market: GammaMarket = resp
            .json()
            .await
            .map_err(|e| MetadataError::Unavailable(e.to_string()))?;

        Ok(MarketDetails {
            outcomes: market.parse_outcomes(),
            question: market.question,
        })
    }
}
