//! Check-in command: show today's prompt or record an answer.

use std::error::Error;

use chrono::NaiveDate;
use clap::Args;
use emberlog_core::{dates, prompts, streak, Config, Entry, FollowUp, Reflection};

use crate::common;

#[derive(Args)]
pub struct CheckinArgs {
    /// Answer number for today's prompt (1-3); omit to see the prompt
    #[arg(long)]
    pub choice: Option<usize>,

    /// Answer number for the follow-up prompt (depth reflect and deeper)
    #[arg(long)]
    pub context: Option<usize>,

    /// Answer number for the deep follow-up prompt (depth deep only)
    #[arg(long)]
    pub deep: Option<usize>,
}

pub fn run(args: CheckinArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default();
    let today = dates::today();
    let primary = prompts::primary_for(today);

    let Some(choice_number) = args.choice else {
        print_prompt(&config, today)?;
        return Ok(());
    };

    let choice = primary.option(choice_number).ok_or_else(|| {
        format!("--choice must be between 1 and {}", primary.options.len())
    })?;
    let reflection = build_reflection(&config, today, args.context, args.deep)?;
    let entry = Entry::for_date(today, primary.id, choice).with_reflection(reflection);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let journal = common::open_journal(&config)?;
        let replacing = journal.today_entry().is_some();

        let state = journal.record_check_in(entry)?;

        if replacing {
            println!("Updated today's check-in: {choice}");
        } else {
            println!("Saved today's check-in: {choice}");
        }
        let day_word = if state.current_streak == 1 { "day" } else { "days" };
        println!("Current streak: {} {day_word}", state.current_streak);
        if let Some(message) = streak::message(&state) {
            println!("{message}");
        }

        // Let the background push finish before the process exits; its
        // outcome never changes what was printed above.
        journal.shutdown().await;
        Ok(())
    })
}

fn print_prompt(config: &Config, today: NaiveDate) -> Result<(), Box<dyn Error>> {
    let journal = common::open_journal_offline()?;
    if let Some(existing) = journal.today_entry() {
        println!("Already checked in today: {}", existing.choice);
        println!("Answering again replaces it.");
        println!();
    }

    let primary = prompts::primary_for(today);
    println!("{}", primary.text);
    for (i, option) in primary.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    println!();
    println!("Answer with: emberlog checkin --choice <n>");

    if config.depth.max_prompt_level() >= 2 {
        let context = prompts::context_for(today);
        println!();
        println!("Follow-up (--context <n>): {}", context.text);
        for (i, option) in context.options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }
    }
    if config.depth.max_prompt_level() >= 3 {
        let deep = prompts::deep_for(today);
        println!();
        println!("Deep follow-up (--deep <n>): {}", deep.text);
        for (i, option) in deep.options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }
    }
    Ok(())
}

fn build_reflection(
    config: &Config,
    today: NaiveDate,
    context: Option<usize>,
    deep: Option<usize>,
) -> Result<Reflection, Box<dyn Error>> {
    if deep.is_some() && context.is_none() {
        return Err("--deep requires --context".into());
    }

    let Some(context_number) = context else {
        return Ok(Reflection::None);
    };

    if config.depth.max_prompt_level() < 2 {
        return Err(
            "follow-ups are off at depth light; run `emberlog config set depth reflect`".into(),
        );
    }

    let context_prompt = prompts::context_for(today);
    let context_answer = context_prompt.option(context_number).ok_or_else(|| {
        format!(
            "--context must be between 1 and {}",
            context_prompt.options.len()
        )
    })?;
    let context_pair = FollowUp::new(context_prompt.id, context_answer);

    let Some(deep_number) = deep else {
        return Ok(Reflection::Context(context_pair));
    };

    if config.depth.max_prompt_level() < 3 {
        return Err("the deep follow-up needs depth deep; run `emberlog config set depth deep`".into());
    }

    let deep_prompt = prompts::deep_for(today);
    let deep_answer = deep_prompt.option(deep_number).ok_or_else(|| {
        format!("--deep must be between 1 and {}", deep_prompt.options.len())
    })?;

    Ok(Reflection::Deep {
        context: context_pair,
        deep: FollowUp::new(deep_prompt.id, deep_answer),
    })
}
