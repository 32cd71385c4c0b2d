//! Validation and transfer errors raised by the swap and ranking logic.

use thiserror::Error;

/// Problems with an entered amount, a rate or a price lookup.
///
/// These are attached to the current quote as values and shown next to the
/// relevant input. They never abort the surrounding computation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,
    #[error("Insufficient balance: {amount} requested, {balance} available")]
    InsufficientBalance { amount: f64, balance: f64 },
    #[error("No valid exchange rate from {from} to {to}")]
    InvalidRate { from: String, to: String },
    #[error("No price available for {currency}")]
    UnknownPrice { currency: String },
}

/// Reasons a transfer request is refused. None of them change session state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransferError {
    #[error("Amount is required")]
    AmountRequired,
    #[error(transparent)]
    Blocked(#[from] ValidationError),
    #[error("A transfer is already in progress")]
    InProgress,
    #[error("Select both a pay and a receive asset")]
    NoSelection,
}
