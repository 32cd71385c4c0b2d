use super::util::{RetryPolicy, with_retry};
use crate::core::{PriceFeed, PriceObservation};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, error, instrument};

/// Reads the whole price feed as one JSON array of observations.
pub struct HttpPriceFeed {
    url: String,
    retry: RetryPolicy,
}

impl HttpPriceFeed {
    pub fn new(url: &str, retry: RetryPolicy) -> Self {
        HttpPriceFeed {
            url: url.to_string(),
            retry,
        }
    }
}

#[async_trait]
impl PriceFeed for HttpPriceFeed {
    #[instrument(name = "PriceFeedFetch", skip(self), fields(url = %self.url))]
    async fn fetch_observations(&self) -> Result<Vec<PriceObservation>> {
        debug!("Requesting price feed from {}", self.url);

        let client = reqwest::Client::builder()
            .user_agent("swapdesk/0.1")
            .build()?;
        let response = with_retry(self.retry, || async {
            client
                .get(&self.url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
        })
        .await
        .with_context(|| format!("Price feed request failed: {}", self.url))?;

        let response_text = response
            .text()
            .await
            .context("Failed to read price feed response")?;

        let observations: Vec<PriceObservation> = match serde_json::from_str(&response_text) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %response_text,
                    "Failed to parse price feed response"
                );
                return Err(e).context("Failed to parse price feed response");
            }
        };

        debug!("Received {} observations", observations.len());
        Ok(observations)
    }
}
