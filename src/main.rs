use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ratecast::core::log::init_logging;

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

impl From<Commands> for ratecast::AppCommand {
    fn from(cmd: Commands) -> ratecast::AppCommand {
        match cmd {
            Commands::List => ratecast::AppCommand::List,
            Commands::Convert { left, right } => ratecast::AppCommand::Convert { left, right },
            Commands::Watch => ratecast::AppCommand::Watch,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List available currencies and their ratios
    List,
    /// Show the conversion ratio between two currency codes
    Convert {
        /// Code of the currency to convert from
        left: String,
        /// Code of the currency to convert to
        right: String,
    },
    /// Keep rates fresh and pick currencies interactively
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ratecast::cli::setup::setup(),
        Some(cmd) => ratecast::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
