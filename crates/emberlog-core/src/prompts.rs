//! Canned check-in prompts and their daily rotation.
//!
//! Every response is a pick from a short fixed list; there is no free
//! text anywhere. Rotation is keyed off the day of the year so each
//! device shows the same prompt on the same date without coordination.

use chrono::{Datelike, NaiveDate};

/// One selectable question with its canned responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    pub id: &'static str,
    pub text: &'static str,
    pub options: &'static [&'static str],
    /// 1 = asked at every depth, 2 = Reflect and up, 3 = Deep only.
    pub level: u8,
}

impl Prompt {
    /// Option text for a 1-based pick, as shown in numbered lists.
    pub fn option(&self, number: usize) -> Option<&'static str> {
        if number == 0 {
            return None;
        }
        self.options.get(number - 1).copied()
    }
}

/// Primary prompts, one shown per day on a 7-day cycle.
pub const PRIMARY: &[Prompt] = &[
    Prompt {
        id: "today_felt",
        text: "Today felt:",
        options: &["😌 Calm", "😐 Neutral", "😵‍💫 Heavy"],
        level: 1,
    },
    Prompt {
        id: "energy",
        text: "Energy today:",
        options: &["⚡ High", "🔋 Okay", "🪫 Low"],
        level: 1,
    },
    Prompt {
        id: "mood",
        text: "Mood right now:",
        options: &["🙂 Good", "😐 Meh", "😔 Down"],
        level: 1,
    },
    Prompt {
        id: "stress",
        text: "Stress level:",
        options: &["🟢 Low", "🟡 Medium", "🔴 High"],
        level: 1,
    },
    Prompt {
        id: "clarity",
        text: "I feel:",
        options: &["🧠 Clear", "🌫 Foggy", "🔥 Overwhelmed"],
        level: 1,
    },
    Prompt {
        id: "trend",
        text: "Today was:",
        options: &["👍 Better", "➖ Same", "👎 Worse"],
        level: 1,
    },
    Prompt {
        id: "tomorrow",
        text: "Tomorrow I want:",
        options: &["🌱 Rest", "🎯 Focus", "🤝 Connect"],
        level: 1,
    },
];

/// Context follow-ups, asked at Reflect depth and above.
pub const FOLLOW_UP_CONTEXT: &[Prompt] = &[
    Prompt {
        id: "influence",
        text: "What shaped today most?",
        options: &["💼 Work", "👥 People", "🏠 Home"],
        level: 2,
    },
    Prompt {
        id: "pace",
        text: "The day felt:",
        options: &["🏃 Busy", "⚖️ Steady", "🐢 Slow"],
        level: 2,
    },
    Prompt {
        id: "focus_area",
        text: "Where did today land?",
        options: &["💼 Work", "❤️ Personal", "🔄 Both"],
        level: 2,
    },
    Prompt {
        id: "connection",
        text: "Today I felt:",
        options: &["🤝 Connected", "🧍 Solo", "😶 Distant"],
        level: 2,
    },
];

/// Deep follow-ups, asked only at Deep depth.
pub const FOLLOW_UP_DEEP: &[Prompt] = &[
    Prompt {
        id: "body",
        text: "Your body felt:",
        options: &["😌 Relaxed", "😬 Tense", "😩 Drained"],
        level: 3,
    },
    Prompt {
        id: "sleep",
        text: "Sleep last night:",
        options: &["😴 Good", "😐 Okay", "😵 Poor"],
        level: 3,
    },
    Prompt {
        id: "rest",
        text: "Did you get rest?",
        options: &["✅ Yes", "🤷 Some", "❌ No"],
        level: 3,
    },
    Prompt {
        id: "carry",
        text: "Carrying anything heavy?",
        options: &["🪶 Light", "📦 Some", "🏋️ A lot"],
        level: 3,
    },
];

/// The primary prompt for a given date.
pub fn primary_for(date: NaiveDate) -> &'static Prompt {
    let day = date.ordinal() as usize; // 1-based day of year
    &PRIMARY[(day - 1) % PRIMARY.len()]
}

/// The context follow-up for a given date. Offset from the primary cycle
/// so the pairings drift instead of repeating in lockstep.
pub fn context_for(date: NaiveDate) -> &'static Prompt {
    let day = date.ordinal() as usize;
    &FOLLOW_UP_CONTEXT[(day + 2) % FOLLOW_UP_CONTEXT.len()]
}

/// The deep follow-up for a given date.
pub fn deep_for(date: NaiveDate) -> &'static Prompt {
    let day = date.ordinal() as usize;
    &FOLLOW_UP_DEEP[(day + 4) % FOLLOW_UP_DEEP.len()]
}

/// Look up any prompt by id across the three catalogs.
pub fn by_id(id: &str) -> Option<&'static Prompt> {
    PRIMARY
        .iter()
        .chain(FOLLOW_UP_CONTEXT)
        .chain(FOLLOW_UP_DEEP)
        .find(|prompt| prompt.id == id)
}
