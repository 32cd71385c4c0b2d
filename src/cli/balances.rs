use super::ui;
use crate::core::price::fetch_prices;
use crate::core::ranking::rank;
use crate::core::{PriceFeed, PriceTable, WalletBalance};
use anyhow::Result;
use comfy_table::Cell;
use tracing::warn;

/// Renders ranked balances with their value from the price table.
pub fn display_balances(balances: &[WalletBalance], prices: &PriceTable) -> String {
    let ranked = rank(balances);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Blockchain"),
        ui::header_cell("Priority"),
        ui::header_cell("Amount"),
        ui::header_cell("Value (USD)"),
    ]);

    let mut total = 0.0;
    let mut all_priced = true;
    for row in &ranked {
        let value_cell = match row.usd_value(prices) {
            Ok(value) => {
                total += value;
                ui::number_cell(format!("{value:.2}"))
            }
            Err(_) => {
                all_priced = false;
                ui::na_cell(true)
            }
        };
        table.add_row(vec![
            Cell::new(&row.balance.currency),
            Cell::new(&row.balance.blockchain),
            ui::number_cell(row.priority.to_string()),
            ui::number_cell(format!("{:.4}", row.balance.amount)),
            value_cell,
        ]);
    }

    let (total_text, total_style) = if all_priced {
        (format!("{total:.2}"), ui::StyleType::TotalValue)
    } else {
        ("N/A".to_string(), ui::StyleType::Error)
    };

    format!(
        "{}\n\n{}\n\n{}: {}",
        ui::style_text("Balances", ui::StyleType::Title),
        table,
        ui::style_text("Total Value (USD)", ui::StyleType::TotalLabel),
        ui::style_text(&total_text, total_style)
    )
}

pub async fn run(feed: &(dyn PriceFeed + Send + Sync), wallet: &[WalletBalance]) -> Result<()> {
    if wallet.is_empty() {
        println!("No wallet balances configured.");
        return Ok(());
    }

    let pb = ui::new_spinner("Fetching prices...");
    let assets = fetch_prices(feed).await.unwrap_or_else(|e| {
        warn!(error = %e, "Price feed unavailable, balances will not be valued");
        Vec::new()
    });
    pb.finish_and_clear();

    let prices = PriceTable::from_assets(&assets);
    println!("{}", display_balances(wallet, &prices));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AssetPrice;

    fn balance(currency: &str, amount: f64, blockchain: &str) -> WalletBalance {
        WalletBalance {
            currency: currency.to_string(),
            amount,
            blockchain: blockchain.to_string(),
        }
    }

    #[test]
    fn test_display_balances() {
        let prices = PriceTable::from_assets(&[
            AssetPrice::new("ETH", 1600.0),
            AssetPrice::new("ARB", 1.5),
        ]);
        let output = display_balances(
            &[
                balance("ARB", 3.0, "Arbitrum"),
                balance("X", 1.0, "Unknown"),
                balance("ETH", 5.0, "Ethereum"),
            ],
            &prices,
        );

        let eth = output.find("ETH").unwrap();
        let arb = output.find("ARB").unwrap();
        assert!(eth < arb);
        assert!(!output.contains("Unknown"));
        assert!(output.contains("8000.00"));
        assert!(output.contains("8004.50"));
    }

    #[test]
    fn test_missing_price_shows_na() {
        let output = display_balances(&[balance("ZIL", 10.0, "Zilliqa")], &PriceTable::default());
        assert!(output.contains("N/A"));
    }
}
