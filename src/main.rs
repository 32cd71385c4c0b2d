use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use swapdesk::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for swapdesk::AppCommand {
    fn from(cmd: Commands) -> swapdesk::AppCommand {
        match cmd {
            Commands::Prices => swapdesk::AppCommand::Prices,
            Commands::Quote {
                pay,
                receive,
                amount,
                flip,
            } => swapdesk::AppCommand::Quote {
                pay,
                receive,
                amount,
                flip,
            },
            Commands::Transfer {
                pay,
                receive,
                amount,
            } => swapdesk::AppCommand::Transfer {
                pay,
                receive,
                amount,
            },
            Commands::Balances => swapdesk::AppCommand::Balances,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the current price of every asset in the feed
    Prices,
    /// Quote a swap between two assets
    Quote {
        /// Asset to pay with
        #[arg(long)]
        pay: String,
        /// Asset to receive
        #[arg(long)]
        receive: String,
        /// Amount of the pay asset
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// Exchange the pay and receive assets before quoting
        #[arg(long)]
        flip: bool,
    },
    /// Run a simulated transfer for a swap
    Transfer {
        /// Asset to pay with
        #[arg(long)]
        pay: String,
        /// Asset to receive
        #[arg(long)]
        receive: String,
        /// Amount of the pay asset
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },
    /// Display wallet balances ranked by blockchain priority
    Balances,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => swapdesk::cli::setup::setup(),
        Some(cmd) => swapdesk::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
