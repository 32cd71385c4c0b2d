//! Core business logic: price aggregation, swap quoting and balance ranking

pub mod config;
pub mod error;
pub mod log;
pub mod price;
pub mod ranking;
pub mod session;
pub mod swap;

// Re-export main types for cleaner imports
pub use error::{TransferError, ValidationError};
pub use price::{AssetPrice, PriceFeed, PriceObservation, PriceTable};
pub use ranking::{RankedBalance, WalletBalance};
pub use session::{FeedStatus, SwapSession, TransferReceipt};
