//! Terminal front end for the swap and ranking logic

pub mod balances;
pub mod prices;
pub mod quote;
pub mod setup;
pub mod transfer;
pub mod ui;

use crate::core::{FeedStatus, PriceFeed, SwapSession};

/// Loads the feed into a fresh session, showing a spinner while waiting.
pub(crate) async fn open_session(
    feed: &(dyn PriceFeed + Send + Sync),
    balance: f64,
) -> SwapSession {
    let pb = ui::new_spinner("Fetching prices...");
    let mut session = SwapSession::new(balance);
    session.load_from_feed(feed).await;
    pb.finish_and_clear();

    if let FeedStatus::Unavailable(reason) = session.feed_status() {
        eprintln!(
            "{}",
            ui::style_text(
                &format!("Price feed unavailable: {reason}"),
                ui::StyleType::Error
            )
        );
    }
    session
}
