use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use crate::config::RapidApiConfig;
use crate::error::Result;
use crate::rapidapi::{build_client, upstream_error};

/// Status the extractor answers with when it cannot read text from the page.
pub const STATUS_EXTRACTION_FAILED: u16 = 503;

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarizes the article at `url` into `length` paragraphs.
    async fn summarize(&self, url: &str, length: u8) -> Result<String>;
}

#[derive(Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    summary: Option<String>,
}

/// Article Extractor and Summarizer on RapidAPI.
pub struct RapidSummarizer {
    client: Client,
    config: RapidApiConfig,
}

impl RapidSummarizer {
    pub fn new(config: RapidApiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            config,
        })
    }
}

#[async_trait]
impl Summarizer for RapidSummarizer {
    async fn summarize(&self, url: &str, length: u8) -> Result<String> {
        let endpoint = self.config.endpoint("summarize");
        debug!("Requesting summary of {} from {}", url, endpoint);

        let length = length.to_string();
        let response = self
            .client
            .get(&endpoint)
            .query(&[("url", url), ("length", length.as_str())])
            .header("X-RapidAPI-Key", self.config.api_key.as_str())
            .header("X-RapidAPI-Host", self.config.host.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let body: SummaryResponse = response.json().await?;
        Ok(body.summary.unwrap_or_default())
    }
}
