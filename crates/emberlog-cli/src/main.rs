//! Emberlog command-line interface.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "emberlog", version, about = "A one-tap daily check-in journal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's check-in
    Checkin(commands::checkin::CheckinArgs),
    /// Show recent entries
    History(commands::history::HistoryArgs),
    /// Show where the habit stands
    Streak,
    /// Reconcile local entries with the cloud mirror
    Sync,
    /// Weekly recap insights
    Recap(commands::recap::RecapArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Checkin(args) => commands::checkin::run(args),
        Commands::History(args) => commands::history::run(args),
        Commands::Streak => commands::streak::run(),
        Commands::Sync => commands::sync::run(),
        Commands::Recap(args) => commands::recap::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
