//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dimmed progress or hint line to stderr.
pub fn hint(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a list item: a bold id, a title and optional dimmed details.
pub fn item(id: i64, title: &str, details: &[String]) {
    let id = format!("#{}", id);
    if details.is_empty() {
        println!("{} {}", id.bold(), title);
    } else {
        println!("{} {}  {}", id.bold(), title, details.join("  ").dimmed());
    }
}

/// Print the position within a paged listing.
pub fn page_footer(page_number: u32, total_pages: u32, total_elements: u64) {
    if total_pages > 1 {
        hint(&format!(
            "Page {} of {} ({} results)",
            page_number + 1,
            total_pages,
            total_elements
        ));
    }
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
