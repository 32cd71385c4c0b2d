//! Price feed abstractions and aggregation of raw observations

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// A single dated price record for one currency, as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub currency: String,
    pub date: String,
    pub price: f64,
}

/// The current price of one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPrice {
    pub symbol: String,
    pub price: f64,
}

impl AssetPrice {
    pub fn new(symbol: &str, price: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            price,
        }
    }
}

#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch_observations(&self) -> Result<Vec<PriceObservation>>;
}

/// Fetches the feed once and reduces it to current prices.
pub async fn fetch_prices(feed: &(dyn PriceFeed + Send + Sync)) -> Result<Vec<AssetPrice>> {
    let observations = feed.fetch_observations().await?;
    Ok(aggregate(&observations))
}

/// Sort key for an observation date.
///
/// RFC 3339 timestamps are rewritten as UTC with fixed nanosecond precision
/// so differing offsets or fractional digits order as instants. Anything else
/// is kept verbatim. All keys then compare as plain strings, which keeps the
/// order total when the feed mixes formats.
fn date_key(date: &str) -> Cow<'_, str> {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => Cow::Owned(
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Nanos, true),
        ),
        Err(_) => Cow::Borrowed(date),
    }
}

/// Reduces an observation sequence to one price per currency.
///
/// The latest date wins. An observation only replaces the stored one when its
/// date is strictly greater, so for equal dates the earliest observation in
/// input order is kept. The result is sorted by symbol.
pub fn aggregate(observations: &[PriceObservation]) -> Vec<AssetPrice> {
    let mut latest: BTreeMap<&str, (Cow<'_, str>, f64)> = BTreeMap::new();

    for observation in observations {
        let key = date_key(&observation.date);
        let replace = match latest.get(observation.currency.as_str()) {
            Some((current, _)) => key > *current,
            None => true,
        };
        if replace {
            latest.insert(observation.currency.as_str(), (key, observation.price));
        }
    }

    debug!(
        "Aggregated {} observations into {} assets",
        observations.len(),
        latest.len()
    );

    latest
        .into_iter()
        .map(|(symbol, (_, price))| AssetPrice::new(symbol, price))
        .collect()
}

/// Builds the icon location for an asset symbol.
pub fn icon_url(base_url: &str, symbol: &str) -> String {
    format!("{}/{}.svg", base_url.trim_end_matches('/'), symbol)
}

/// Price-by-currency lookup used to value balances.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<String, f64>,
}

impl PriceTable {
    pub fn from_assets(assets: &[AssetPrice]) -> Self {
        Self {
            prices: assets
                .iter()
                .map(|a| (a.symbol.clone(), a.price))
                .collect(),
        }
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        self.prices.get(currency).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
