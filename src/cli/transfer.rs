use super::ui;
use crate::core::{PriceFeed, SwapSession};
use anyhow::{Result, bail};
use std::time::Duration;

/// Refuses to move funds on a pair other than the one asked for.
///
/// An empty side is left to the session, which reports it as a missing selection.
fn ensure_pair(session: &SwapSession, pay: &str, receive: &str) -> Result<()> {
    for (side, wanted, selected) in [
        ("pay", pay, session.pay()),
        ("receive", receive, session.receive()),
    ] {
        if selected.is_some_and(|a| a.symbol != wanted) {
            bail!("Unknown {side} asset {wanted}");
        }
    }
    Ok(())
}

pub async fn run(
    feed: &(dyn PriceFeed + Send + Sync),
    balance: f64,
    pay: &str,
    receive: &str,
    amount: &str,
    delay: Duration,
) -> Result<()> {
    let mut session = super::open_session(feed, balance).await;
    session.select_pay(pay);
    session.select_receive(receive);
    if let Err(e) = ensure_pair(&session, pay, receive) {
        eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
        return Err(e);
    }
    session.set_pay_amount(amount);

    let pb = ui::new_spinner("Transferring...");
    let result = session.transfer(delay).await;
    pb.finish_and_clear();

    match result {
        Ok(receipt) => {
            println!(
                "{}\n{}",
                ui::style_text("Transfer successful", ui::StyleType::TotalValue),
                receipt
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            Err(e.into())
        }
    }
}
