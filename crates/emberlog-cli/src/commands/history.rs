//! History command: recent entries as text or JSON.

use std::error::Error;

use clap::Args;
use emberlog_core::prompts;

use crate::common;

#[derive(Args)]
pub struct HistoryArgs {
    /// How many days back to include
    #[arg(long, default_value_t = 7)]
    pub days: u32,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: HistoryArgs) -> Result<(), Box<dyn Error>> {
    let journal = common::open_journal_offline()?;
    let entries = journal.last_n_days(args.days);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No check-ins in the last {} days.", args.days);
        return Ok(());
    }

    for entry in &entries {
        match prompts::by_id(&entry.prompt_id) {
            Some(prompt) => println!("{}  {} {}", entry.date, prompt.text, entry.choice),
            None => println!("{}  {}", entry.date, entry.choice),
        }
        if let Some(response) = entry.context_response() {
            println!("            {response}");
        }
        if let Some(response) = entry.deep_response() {
            println!("            {response}");
        }
    }
    Ok(())
}
