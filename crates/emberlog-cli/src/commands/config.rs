//! Config command: settings management.

use std::error::Error;

use clap::Subcommand;
use emberlog_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show a setting
    Get { key: String },
    /// Change a setting
    Set { key: String, value: String },
    /// List all settings
    List,
    /// Restore defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default();
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("Unknown key: {key}");
                    eprintln!("Known keys: depth, remote.url, remote.anon_key, remote_insights");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            println!("{key} = {value}");
            if key == "depth" {
                println!("{}: {}", config.depth.title(), config.depth.description());
            }
        }
        ConfigAction::List => {
            let config = Config::load_or_default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("Configuration reset to defaults.");
        }
    }
    Ok(())
}
