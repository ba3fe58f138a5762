pub mod utils;

use crossterm::style::Stylize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// Something the session wants the user to see
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

pub fn print_message(message: &Message) {
    match message.level {
        Level::Info => println!("  {}", message.text),
        Level::Error => println!("  {} {}", "Error:".red().bold(), message.text),
    }
}

/// Format seconds as m:ss (or h:mm:ss past the hour)
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}
