//! Filters and orders wallet balances by blockchain priority for display.
use crate::core::error::ValidationError;
use crate::core::price::PriceTable;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::debug;

/// Priority assigned to any blockchain outside the known table.
///
/// Balances must score strictly above this to be shown, so unknown chains are
/// always hidden. A listed chain scoring exactly -99 would be hidden too.
pub const MIN_PRIORITY: i32 = -99;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub currency: String,
    pub amount: f64,
    pub blockchain: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedBalance {
    pub balance: WalletBalance,
    pub priority: i32,
}

impl RankedBalance {
    /// Value of the balance in the feed's quote unit.
    pub fn usd_value(&self, prices: &PriceTable) -> Result<f64, ValidationError> {
        prices
            .get(&self.balance.currency)
            .map(|price| price * self.balance.amount)
            .ok_or_else(|| ValidationError::UnknownPrice {
                currency: self.balance.currency.clone(),
            })
    }
}

pub fn blockchain_priority(blockchain: &str) -> i32 {
    match blockchain {
        "Osmosis" => 100,
        "Ethereum" => 50,
        "Arbitrum" => 30,
        "Zilliqa" | "Neo" => 20,
        _ => MIN_PRIORITY,
    }
}

/// Keeps positive balances on known blockchains, highest priority first.
///
/// Equal priorities are ordered by currency symbol, then by input order.
pub fn rank(balances: &[WalletBalance]) -> Vec<RankedBalance> {
    let mut ranked: Vec<RankedBalance> = balances
        .iter()
        .map(|balance| RankedBalance {
            priority: blockchain_priority(&balance.blockchain),
            balance: balance.clone(),
        })
        .filter(|r| r.priority > MIN_PRIORITY && r.balance.amount > 0.0)
        .collect();

    ranked.sort_by(|a, b| {
        Reverse(a.priority)
            .cmp(&Reverse(b.priority))
            .then_with(|| a.balance.currency.cmp(&b.balance.currency))
    });

    debug!("Ranked {} of {} balances", ranked.len(), balances.len());
    ranked
}
