//! Stateful swap form: asset selection, amount entry and the simulated transfer.
//!
//! A [`SwapSession`] has a single owner and is mutated one event at a time.
//! Every event that changes the amount or the selected pair recomputes the
//! output synchronously, so the displayed quote is never stale.
use crate::core::error::{TransferError, ValidationError};
use crate::core::price::{AssetPrice, PriceFeed, fetch_prices};
use crate::core::swap::{SwapRequest, compute_swap, exchange_rate};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Availability of the asset list.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    Loading,
    Ready,
    Unavailable(String),
}

/// Proof that a transfer was accepted and is pending completion.
#[derive(Debug)]
pub struct TransferTicket {
    pay_amount: String,
    pay_symbol: String,
    receive_amount: Option<f64>,
    receive_symbol: String,
}

/// Success notification for a completed transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub pay_amount: String,
    pub pay_symbol: String,
    pub receive_amount: Option<f64>,
    pub receive_symbol: String,
}

impl fmt::Display for TransferReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let received = self
            .receive_amount
            .map_or(String::new(), |v| format!("{v:.4}"));
        write!(
            f,
            "You swapped {} {} for {} {}",
            self.pay_amount, self.pay_symbol, received, self.receive_symbol
        )
    }
}

/// Clears the pending flag of a transfer that never completed.
struct PendingGuard<'a> {
    session: &'a mut SwapSession,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.session.pending {
            debug!("Transfer abandoned before completion");
            self.session.pending = false;
        }
    }
}

#[derive(Debug)]
pub struct SwapSession {
    assets: Vec<AssetPrice>,
    feed_status: FeedStatus,
    pay: Option<AssetPrice>,
    receive: Option<AssetPrice>,
    pay_amount: String,
    receive_amount: Option<f64>,
    error: Option<ValidationError>,
    balance: f64,
    pending: bool,
}

impl SwapSession {
    pub fn new(balance: f64) -> Self {
        Self {
            assets: Vec::new(),
            feed_status: FeedStatus::Loading,
            pay: None,
            receive: None,
            pay_amount: String::new(),
            receive_amount: None,
            error: None,
            balance,
            pending: false,
        }
    }

    /// Fetches the feed once and loads the aggregated prices.
    ///
    /// A failed fetch leaves the asset list empty and marks the feed
    /// unavailable instead of returning an error.
    pub async fn load_from_feed(&mut self, feed: &(dyn PriceFeed + Send + Sync)) {
        match fetch_prices(feed).await {
            Ok(assets) => self.load_assets(assets),
            Err(e) => {
                warn!(error = %e, "Price feed unavailable");
                self.assets.clear();
                self.feed_status = FeedStatus::Unavailable(e.to_string());
            }
        }
    }

    /// Replaces the known assets, keeping any existing selection.
    pub fn load_assets(&mut self, assets: Vec<AssetPrice>) {
        if self.pay.is_none() {
            self.pay = assets.first().cloned();
        }
        if self.receive.is_none() {
            self.receive = assets.get(1).or_else(|| assets.first()).cloned();
        }
        debug!("Loaded {} assets", assets.len());
        self.assets = assets;
        self.feed_status = FeedStatus::Ready;
        self.recompute();
    }

    pub fn set_pay_amount(&mut self, text: &str) {
        self.pay_amount = text.to_string();
        self.recompute();
    }

    pub fn select_pay(&mut self, symbol: &str) {
        if let Some(asset) = self.find(symbol) {
            self.pay = Some(asset);
            self.recompute();
        } else {
            debug!("Ignoring unknown pay asset {symbol}");
        }
    }

    pub fn select_receive(&mut self, symbol: &str) {
        if let Some(asset) = self.find(symbol) {
            self.receive = Some(asset);
            self.recompute();
        } else {
            debug!("Ignoring unknown receive asset {symbol}");
        }
    }

    /// Exchanges the pay and receive assets and requotes the current amount.
    pub fn swap_assets(&mut self) {
        std::mem::swap(&mut self.pay, &mut self.receive);
        self.recompute();
    }

    pub fn exchange_rate(&self) -> Result<f64, ValidationError> {
        exchange_rate(self.pay.as_ref(), self.receive.as_ref())
    }

    /// Accepts a transfer of the current quote and enters the pending state.
    pub fn begin_transfer(&mut self) -> Result<TransferTicket, TransferError> {
        if self.pending {
            return Err(TransferError::InProgress);
        }
        if self.pay_amount.is_empty() {
            return Err(TransferError::AmountRequired);
        }
        if let Some(error) = &self.error {
            return Err(TransferError::Blocked(error.clone()));
        }
        let (Some(pay), Some(receive)) = (&self.pay, &self.receive) else {
            return Err(TransferError::NoSelection);
        };

        let ticket = TransferTicket {
            pay_amount: self.pay_amount.clone(),
            pay_symbol: pay.symbol.clone(),
            receive_amount: self.receive_amount,
            receive_symbol: receive.symbol.clone(),
        };
        self.pending = true;
        debug!(?ticket, "Transfer pending");
        Ok(ticket)
    }

    /// Finishes a pending transfer and resets the form.
    pub fn complete_transfer(&mut self, ticket: TransferTicket) -> TransferReceipt {
        self.pending = false;
        self.pay_amount.clear();
        self.receive_amount = None;
        self.error = None;

        let receipt = TransferReceipt {
            pay_amount: ticket.pay_amount,
            pay_symbol: ticket.pay_symbol,
            receive_amount: ticket.receive_amount,
            receive_symbol: ticket.receive_symbol,
        };
        info!("Transfer successful: {receipt}");
        receipt
    }

    /// Runs the simulated transfer, completing after `delay`.
    ///
    /// Dropping the future before it completes abandons the transfer and
    /// leaves the form untouched.
    pub async fn transfer(&mut self, delay: Duration) -> Result<TransferReceipt, TransferError> {
        let ticket = self.begin_transfer()?;
        let guard = PendingGuard { session: self };
        tokio::time::sleep(delay).await;
        Ok(guard.session.complete_transfer(ticket))
    }

    pub fn assets(&self) -> &[AssetPrice] {
        &self.assets
    }

    pub fn feed_status(&self) -> &FeedStatus {
        &self.feed_status
    }

    pub fn pay(&self) -> Option<&AssetPrice> {
        self.pay.as_ref()
    }

    pub fn receive(&self) -> Option<&AssetPrice> {
        self.receive.as_ref()
    }

    pub fn pay_amount(&self) -> &str {
        &self.pay_amount
    }

    pub fn receive_amount(&self) -> Option<f64> {
        self.receive_amount
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    fn find(&self, symbol: &str) -> Option<AssetPrice> {
        self.assets.iter().find(|a| a.symbol == symbol).cloned()
    }

    fn recompute(&mut self) {
        // Nothing to quote until the feed has produced a pair
        let (Some(pay), Some(receive)) = (&self.pay, &self.receive) else {
            return;
        };
        let result = compute_swap(&SwapRequest {
            input_amount: &self.pay_amount,
            source: pay,
            target: receive,
            balance_ceiling: self.balance,
        });
        self.receive_amount = result.output_amount;
        self.error = result.error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use crate::core::price::PriceObservation;

    fn session() -> SwapSession {
        let mut session = SwapSession::new(1000.0);
        session.load_assets(vec![
            AssetPrice::new("ETH", 2.0),
            AssetPrice::new("USDC", 0.5),
            AssetPrice::new("BAD", 0.0),
        ]);
        session
    }

    struct StaticFeed(Vec<PriceObservation>);

    #[async_trait]
    impl PriceFeed for StaticFeed {
        async fn fetch_observations(&self) -> Result<Vec<PriceObservation>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenFeed;

    #[async_trait]
    impl PriceFeed for BrokenFeed {
        async fn fetch_observations(&self) -> Result<Vec<PriceObservation>> {
            Err(anyhow!("connection refused"))
        }
    }

    #[test]
    fn test_no_assets_yet() {
        let mut session = SwapSession::new(1000.0);
        session.set_pay_amount("10");
        assert_eq!(session.feed_status(), &FeedStatus::Loading);
        assert_eq!(session.exchange_rate(), Ok(0.0));
        assert!(session.receive_amount().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_default_selection() {
        let session = session();
        assert_eq!(session.pay().unwrap().symbol, "ETH");
        assert_eq!(session.receive().unwrap().symbol, "USDC");

        let mut single = SwapSession::new(1000.0);
        single.load_assets(vec![AssetPrice::new("ETH", 2.0)]);
        assert_eq!(single.pay().unwrap().symbol, "ETH");
        assert_eq!(single.receive().unwrap().symbol, "ETH");
    }

    #[test]
    fn test_amount_entry_recomputes() {
        let mut session = session();
        session.set_pay_amount("100");
        assert_eq!(session.receive_amount(), Some(400.0));

        session.set_pay_amount("");
        assert!(session.receive_amount().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_unknown_symbol_is_ignored() {
        let mut session = session();
        session.select_pay("DOGE");
        session.select_receive("DOGE");
        assert_eq!(session.pay().unwrap().symbol, "ETH");
        assert_eq!(session.receive().unwrap().symbol, "USDC");
    }

    #[test]
    fn test_swap_assets_recomputes_immediately() {
        let mut session = session();
        session.set_pay_amount("100");
        let rate = session.exchange_rate().unwrap();

        session.swap_assets();
        assert_eq!(session.pay().unwrap().symbol, "USDC");
        assert_eq!(session.exchange_rate().unwrap(), 1.0 / rate);
        assert_eq!(session.receive_amount(), Some(25.0));
    }

    #[test]
    fn test_zero_price_selection() {
        let mut session = session();
        session.set_pay_amount("1");
        session.select_receive("BAD");
        assert!(matches!(
            session.exchange_rate(),
            Err(ValidationError::InvalidRate { .. })
        ));
        assert!(matches!(
            session.error(),
            Some(ValidationError::InvalidRate { .. })
        ));
        assert!(session.receive_amount().is_none());
    }

    #[test]
    fn test_transfer_requires_amount() {
        let mut session = session();
        assert_eq!(
            session.begin_transfer().unwrap_err(),
            TransferError::AmountRequired
        );
        assert!(!session.is_pending());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_transfer_blocked_by_validation_error() {
        let mut session = session();
        session.set_pay_amount("1001");
        let err = session.begin_transfer().unwrap_err();
        assert!(matches!(
            err,
            TransferError::Blocked(ValidationError::InsufficientBalance { .. })
        ));
        assert_eq!(session.pay_amount(), "1001");
        assert_eq!(session.receive_amount(), Some(4004.0));
        assert!(!session.is_pending());
    }

    #[test]
    fn test_reentrant_transfer_is_rejected() {
        let mut session = session();
        session.set_pay_amount("10");
        let ticket = session.begin_transfer().unwrap();
        assert_eq!(
            session.begin_transfer().unwrap_err(),
            TransferError::InProgress
        );

        let receipt = session.complete_transfer(ticket);
        assert_eq!(receipt.to_string(), "You swapped 10 ETH for 40.0000 USDC");
        assert!(!session.is_pending());
        assert_eq!(session.pay_amount(), "");
        assert!(session.receive_amount().is_none());
    }

    #[test]
    fn test_transfer_requires_selection() {
        let mut session = SwapSession::new(1000.0);
        session.set_pay_amount("10");
        assert_eq!(
            session.begin_transfer().unwrap_err(),
            TransferError::NoSelection
        );
        assert!(!session.is_pending());
        assert_eq!(session.pay_amount(), "10");
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_transfer_releases_pending() {
        let mut session = session();
        session.set_pay_amount("10");

        let result = tokio::time::timeout(
            Duration::from_millis(10),
            session.transfer(Duration::from_millis(1500)),
        )
        .await;
        assert!(result.is_err());
        assert!(!session.is_pending());
        assert_eq!(session.pay_amount(), "10");

        let ticket = session.begin_transfer().unwrap();
        let receipt = session.complete_transfer(ticket);
        assert_eq!(receipt.receive_amount, Some(40.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transfer_resets_form() {
        let mut session = session();
        session.set_pay_amount("100");

        let receipt = session
            .transfer(Duration::from_millis(1500))
            .await
            .unwrap();
        assert_eq!(receipt.pay_amount, "100");
        assert_eq!(receipt.pay_symbol, "ETH");
        assert_eq!(receipt.receive_amount, Some(400.0));
        assert_eq!(receipt.receive_symbol, "USDC");
        assert_eq!(session.pay_amount(), "");
        assert!(session.receive_amount().is_none());
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_load_from_feed() {
        let feed = StaticFeed(vec![
            PriceObservation {
                currency: "USD".to_string(),
                date: "2024-01-01".to_string(),
                price: 1.0,
            },
            PriceObservation {
                currency: "USD".to_string(),
                date: "2024-01-02".to_string(),
                price: 1.02,
            },
        ]);
        let mut session = SwapSession::new(1000.0);
        session.load_from_feed(&feed).await;
        assert_eq!(session.feed_status(), &FeedStatus::Ready);
        assert_eq!(session.assets(), &[AssetPrice::new("USD", 1.02)]);
    }

    #[tokio::test]
    async fn test_feed_failure_degrades_to_empty() {
        let mut session = SwapSession::new(1000.0);
        session.load_from_feed(&BrokenFeed).await;
        assert!(session.assets().is_empty());
        assert!(matches!(session.feed_status(), FeedStatus::Unavailable(_)));
        assert_eq!(session.exchange_rate(), Ok(0.0));
    }
}
