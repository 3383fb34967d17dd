//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use crate::config::Settings;
use crate::logging::{self, LogTarget};
use crate::models::Period;


/// Fraudboard - terminal dashboard for spending and fraud analytics
#[derive(Parser)]
#[command(name = "fraudboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "FRAUDBOARD_ENDPOINT")]
    endpoint: Option<String>,

    /// Settings file (default: <config dir>/fraudboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand)]
enum Commands {
    /// Live dashboard with period filters (7, 3, a) and reload (r)
    Watch {
        /// Period to load first: 7, 30 or all
        #[arg(short, long, default_value = Period::ALL)]
        period: Period,
    },

    /// Fetch once and print the dashboard as text
    Print {
        /// Period to fetch: 7, 30 or all (default: all)
        #[arg(short, long)]
        period: Option<Period>,
    },

    /// Export every chart as PNG or SVG
    Export {
        /// Period to fetch: 7, 30 or all (default: all)
        #[arg(short, long)]
        period: Option<Period>,

        /// Export as SVG instead of PNG
        #[arg(long)]
        svg: bool,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the output directory after export
        #[arg(long)]
        open: bool,
    },
}


/// Run the CLI
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint = endpoint;
    }

    match command {
        Commands::Watch { period } => {
            let log_path = settings.log_file_path();
            logging::init(LogTarget::File(&log_path), cli.verbose)?;
            commands::watch::run(&settings, period).await
        }
        Commands::Print { period } => {
            logging::init(LogTarget::Stderr, cli.verbose)?;
            commands::print::run(&settings, period).await
        }
        Commands::Export { period, svg, output, open } => {
            logging::init(LogTarget::Stderr, cli.verbose)?;
            commands::export::run(&settings, period, svg, output, open).await
        }
    }
}
