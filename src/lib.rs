pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info};

/// Commands that need a loaded configuration.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Prices,
    Quote {
        pay: String,
        receive: String,
        amount: String,
        flip: bool,
    },
    Transfer {
        pay: String,
        receive: String,
        amount: String,
    },
    Balances,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("swapdesk starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let retry = providers::RetryPolicy::new(
        config.feed.retries,
        Duration::from_millis(config.feed.retry_delay_ms),
    );
    let feed = providers::HttpPriceFeed::new(&config.feed.url, retry);

    match command {
        AppCommand::Prices => cli::prices::run(&feed, &config.icons.base_url).await,
        AppCommand::Quote {
            pay,
            receive,
            amount,
            flip,
        } => cli::quote::run(&feed, config.balance, &pay, &receive, &amount, flip).await,
        AppCommand::Transfer {
            pay,
            receive,
            amount,
        } => {
            cli::transfer::run(
                &feed,
                config.balance,
                &pay,
                &receive,
                &amount,
                Duration::from_millis(config.transfer_delay_ms),
            )
            .await
        }
        AppCommand::Balances => cli::balances::run(&feed, &config.wallet).await,
    }
}
