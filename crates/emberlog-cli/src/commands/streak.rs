//! Streak command: where the habit stands.

use std::error::Error;

use emberlog_core::MAX_FORGIVENESS_PER_MONTH;

use crate::common;

pub fn run() -> Result<(), Box<dyn Error>> {
    let journal = common::open_journal_offline()?;
    let state = journal.streak();

    let Some(last) = state.last_check_in else {
        println!("No check-ins yet. Today is a fine day to start.");
        return Ok(());
    };

    let day_word = if state.current_streak == 1 { "day" } else { "days" };
    println!("Current streak: {} {day_word}", state.current_streak);
    println!("Last check-in: {last}");
    println!(
        "Forgiveness left this month: {} of {}",
        state.forgiveness_remaining(),
        MAX_FORGIVENESS_PER_MONTH
    );

    if let Some(message) = journal.streak_message() {
        println!();
        println!("{message}");
    }
    if let Some(message) = journal.streak_reset_message() {
        println!();
        println!("{message}");
    }
    Ok(())
}
