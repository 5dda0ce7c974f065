pub mod about;
pub mod analyze;
pub mod completions;
pub mod config;
pub mod history;
pub mod mbti;
pub mod traits;
