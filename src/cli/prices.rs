use super::ui;
use crate::core::price::{AssetPrice, icon_url};
use crate::core::PriceFeed;
use anyhow::Result;
use comfy_table::Cell;

/// Renders the aggregated price table.
pub fn display_prices(assets: &[AssetPrice], icon_base_url: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Asset"),
        ui::header_cell("Price"),
        ui::header_cell("Icon"),
    ]);

    for asset in assets {
        table.add_row(vec![
            Cell::new(&asset.symbol),
            ui::number_cell(format!("{:.4}", asset.price)),
            Cell::new(icon_url(icon_base_url, &asset.symbol)),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Prices", ui::StyleType::Title),
        table
    )
}

pub async fn run(feed: &(dyn PriceFeed + Send + Sync), icon_base_url: &str) -> Result<()> {
    let session = super::open_session(feed, 0.0).await;

    if session.assets().is_empty() {
        println!("No prices available.");
        return Ok(());
    }

    println!("{}", display_prices(session.assets(), icon_base_url));
    Ok(())
}
