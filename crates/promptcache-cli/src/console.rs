//! Colored terminal output

use colored::*;

pub fn header(title: &str) {
    println!("{}", title.bold().underline());
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn field(label: &str, value: &str) {
    println!("  {:<18} {}", format!("{}:", label).dimmed(), value);
}
