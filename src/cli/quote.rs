use super::ui;
use crate::core::{PriceFeed, SwapSession};
use anyhow::Result;

/// Selects the requested pair, warning about symbols the feed does not know.
fn select_pair(session: &mut SwapSession, pay: &str, receive: &str) {
    session.select_pay(pay);
    session.select_receive(receive);

    for (side, wanted, selected) in [
        ("pay", pay, session.pay()),
        ("receive", receive, session.receive()),
    ] {
        if let Some(selected) = selected.filter(|a| a.symbol != wanted) {
            eprintln!(
                "{}",
                ui::style_text(
                    &format!(
                        "Unknown {side} asset {wanted}, keeping {}",
                        selected.symbol
                    ),
                    ui::StyleType::Subtle
                )
            );
        }
    }
}

/// Renders the rate line, the quoted amounts and any validation error.
pub fn display_quote(session: &SwapSession) -> String {
    let (Some(pay), Some(receive)) = (session.pay(), session.receive()) else {
        return ui::style_text("No assets available to quote", ui::StyleType::Error);
    };

    let rate_line = match session.exchange_rate() {
        Ok(rate) => format!("1 {} = {} {}", pay.symbol, rate, receive.symbol),
        Err(e) => ui::style_text(&e.to_string(), ui::StyleType::Error),
    };

    let received = session
        .receive_amount()
        .map_or("N/A".to_string(), |v| format!("{v:.4}"));
    let mut output = format!(
        "{}\n\nYou pay:     {} {}\nYou receive: {} {}\n{}",
        ui::style_text("Quote", ui::StyleType::Title),
        session.pay_amount(),
        pay.symbol,
        ui::style_text(&received, ui::StyleType::TotalValue),
        receive.symbol,
        ui::style_text(
            &format!("Balance: {} {}", session.balance(), pay.symbol),
            ui::StyleType::Subtle
        ),
    );
    output.push_str(&format!("\n\n{rate_line}"));

    if let Some(error) = session.error() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(&error.to_string(), ui::StyleType::Error)
        ));
    }
    output
}

pub async fn run(
    feed: &(dyn PriceFeed + Send + Sync),
    balance: f64,
    pay: &str,
    receive: &str,
    amount: &str,
    flip: bool,
) -> Result<()> {
    let mut session = super::open_session(feed, balance).await;
    select_pair(&mut session, pay, receive);
    session.set_pay_amount(amount);
    if flip {
        session.swap_assets();
    }

    println!("{}", display_quote(&session));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AssetPrice;

    fn session() -> SwapSession {
        let mut session = SwapSession::new(1000.0);
        session.load_assets(vec![
            AssetPrice::new("ATOM", 2.0),
            AssetPrice::new("OSMO", 0.5),
        ]);
        session
    }

    #[test]
    fn test_display_valid_quote() {
        let mut session = session();
        session.set_pay_amount("100");
        let output = display_quote(&session);
        assert!(output.contains("400.0000"));
        assert!(output.contains("1 ATOM = 4 OSMO"));
    }

    #[test]
    fn test_display_over_balance_quote() {
        let mut session = session();
        session.set_pay_amount("2000");
        let output = display_quote(&session);
        assert!(output.contains("8000.0000"));
        assert!(output.contains("Insufficient balance"));
    }

    #[test]
    fn test_select_pair_keeps_selection_for_unknown_symbol() {
        let mut session = session();
        select_pair(&mut session, "OSMO", "DOGE");
        assert_eq!(session.pay().unwrap().symbol, "OSMO");
        assert_eq!(session.receive().unwrap().symbol, "OSMO");
    }

    #[test]
    fn test_display_without_assets() {
        let session = SwapSession::new(1000.0);
        assert!(display_quote(&session).contains("No assets available"));
    }
}
