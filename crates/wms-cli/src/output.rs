//! Terminal output for CLI commands: tables, JSON and status lines.

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows as a table, or as a JSON array.
pub fn print_list<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table if rows.is_empty() => println!("(no rows)"),
        OutputFormat::Table => {
            println!("{}", Table::new(rows));
            println!("{} row(s)", rows.len());
        }
    }
}

/// Pretty-print any serializable value.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => print_error(&format!("Could not encode output: {e}")),
    }
}

/// Underlined heading above a block of key/value lines.
pub fn print_heading(title: &str) {
    println!("{title}");
    println!("{}", "-".repeat(title.chars().count()));
}

pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// One aligned `key: value` line.
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {value}", format!("{key}:"));
}

/// Dash for absent optional values.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
