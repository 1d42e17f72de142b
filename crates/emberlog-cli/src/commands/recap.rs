//! Recap command: weekly insights.

use std::error::Error;

use clap::Args;
use emberlog_core::{insights, Config, DepthLevel, InsightClient};

use crate::common;

#[derive(Args)]
pub struct RecapArgs {
    /// Override the configured depth level (light, reflect, deep)
    #[arg(long)]
    pub depth: Option<DepthLevel>,

    /// Skip the remote generator and use the local heuristic
    #[arg(long)]
    pub local: bool,
}

pub fn run(args: RecapArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default();
    let depth = args.depth.unwrap_or(config.depth);

    let journal = common::open_journal_offline()?;
    let entries = journal.last_n_days(7);

    let client = if args.local || !config.remote_insights {
        None
    } else {
        InsightClient::from_config(&config.remote)
    };

    let lines = match client {
        Some(client) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(insights::summarize(Some(&client), &entries, depth))
        }
        None => insights::heuristic_insights(&entries, depth),
    };

    for line in &lines {
        println!("{line}");
    }

    if !journal.has_n_days(7) {
        println!();
        println!("Recaps get richer once a full week of check-ins is in.");
    }
    Ok(())
}
