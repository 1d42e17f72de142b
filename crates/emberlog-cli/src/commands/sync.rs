//! Sync command: full reconciliation with the cloud mirror.

use std::error::Error;

use emberlog_core::Config;

use crate::common;

pub fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default();
    if !config.remote.is_configured() {
        println!("Remote sync is not configured.");
        println!("Set the endpoint first:");
        println!("  emberlog config set remote.url <url>");
        println!("  emberlog config set remote.anon_key <key>");
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let journal = common::open_journal(&config)?;
        println!("Device: {}", journal.device_id());

        let report = journal.full_sync().await?;

        if !report.remote_reachable {
            println!("Could not reach the mirror; local entries are untouched.");
        }
        println!("Fetched {} remote entries.", report.fetched);
        println!("Journal holds {} entries.", report.merged);
        println!("Pushed {} entries.", report.uploaded);
        if report.upload_failures > 0 {
            println!(
                "{} entries failed to push and will retry on the next sync.",
                report.upload_failures
            );
        }

        journal.shutdown().await;
        Ok(())
    })
}
