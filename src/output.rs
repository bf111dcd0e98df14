//! Timestamped, line-oriented console output.

use chrono::Local;
use colored::Colorize;

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Print one `[timestamp] message` line to stdout
pub fn log_line(message: &str) {
    println!("[{}] {}", timestamp(), message);
}

/// Non-fatal diagnostic
pub fn warn(message: &str) {
    log_line(&format!("{} {}", "[WARN]".yellow().bold(), message));
}

pub fn pass(message: &str) {
    log_line(&format!("{} {}", "[PASS]".green(), message));
}

pub fn fail(message: &str) {
    log_line(&format!("{} {}", "[FAIL]".red(), message));
}

/// Fatal error line, printed to stderr just before exit
pub fn error(message: &str) {
    eprintln!("[{}] {} {}", timestamp(), "Error:".red().bold(), message);
}
