pub mod checkin;
pub mod config;
pub mod history;
pub mod recap;
pub mod streak;
pub mod sync;
