//! Shared helper functions for CLI commands

use std::path::Path;

use miette::Result;

use crate::core::Database;

/// Open a data directory, turning a missing directory into a diagnostic
pub fn open_database(data_dir: &Path) -> Result<Database> {
    Database::open(data_dir).map_err(|e| {
        miette::miette!(
            help = "pass the directory that holds main.json and the table folders",
            "{}",
            e
        )
    })
}

/// `1 record`, `3 records`
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Truncate a string to `max_chars`, adding "..." if truncated
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
