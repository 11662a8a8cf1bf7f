//! `mathdb check` command - Validate data files, schemas and references

use console::style;
use miette::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::cli::helpers::{open_database, plural};
use crate::cli::GlobalOpts;
use crate::core::reference::find_hashtags;
use crate::core::site::SiteConfig;
use crate::core::{Database, EntityStore};
use crate::json::diagnostics::{read_with_diagnostics, JsonError};
use crate::schema::SchemaValidator;
use crate::tables;

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Data directory holding main.json and one folder per table
    pub data_dir: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Default)]
struct CheckStats {
    files_checked: usize,
    errors: usize,
    warnings: usize,
}

impl CheckStats {
    fn error(&mut self, path: &Path, message: impl std::fmt::Display) {
        self.errors += 1;
        println!("{} {} - {}", style("✗").red(), path.display(), message);
    }

    fn warning(&mut self, location: impl std::fmt::Display, message: impl std::fmt::Display) {
        self.warnings += 1;
        println!("{} {} - {}", style("!").yellow(), location, message);
    }

    /// Parse a JSON file, printing the diagnostic on failure
    fn read_json(&mut self, path: &Path) -> Option<Value> {
        self.files_checked += 1;
        match read_with_diagnostics(path) {
            Ok(value) => Some(value),
            Err(JsonError::Io(e)) => {
                self.error(path, e);
                None
            }
            Err(e) => {
                self.errors += 1;
                println!("{} {}", style("✗").red(), path.display());
                eprintln!("{:?}", miette::Report::new(e));
                None
            }
        }
    }
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let db = open_database(&args.data_dir)?;
    let validator = SchemaValidator::new().map_err(|e| miette::miette!("invalid table meta-schema: {}", e))?;
    let mut stats = CheckStats::default();

    if !global.quiet {
        println!("{} Checking {}\n", style("→").blue(), style(args.data_dir.display()).dim());
    }

    check_site_config(&db, &mut stats);

    for table in db.tables() {
        let schema_path = db.project().schema_path(&table);
        if schema_path.exists() {
            if let Some(document) = stats.read_json(&schema_path) {
                for issue in validator.validate(&document) {
                    stats.error(&schema_path, issue);
                }
            }
        } else {
            stats.warning(&table, "no schema.json; the table is skipped by build");
        }

        for path in db.project().iter_entity_files(&table) {
            if let Some(value) = stats.read_json(&path) {
                if !value.is_object() {
                    stats.error(&path, "expected a JSON object");
                }
            }
        }

        for (key, reference) in unresolved_references(db.store(), &table) {
            stats.warning(format!("{}/{}", table, key), format!("unresolved reference {}", reference));
        }
    }

    println!();
    let summary = format!(
        "{} checked, {}, {}",
        plural(stats.files_checked, "file"),
        plural(stats.errors, "error"),
        plural(stats.warnings, "warning")
    );
    let failed = stats.errors > 0 || (args.strict && stats.warnings > 0);
    if failed {
        println!("{} {}", style("✗").red(), summary);
        Err(miette::miette!("check failed"))
    } else {
        println!("{} {}", style("✓").green(), summary);
        Ok(())
    }
}

/// `main.json` syntax, shape and graph registrations
fn check_site_config(db: &Database, stats: &mut CheckStats) {
    let path = db.project().main_json_path();
    if !path.exists() {
        stats.warning(path.display(), "no main.json; using default site settings");
        return;
    }
    let Some(value) = stats.read_json(&path) else {
        return;
    };
    if let Err(e) = serde_json::from_value::<SiteConfig>(value) {
        stats.error(&path, e);
        return;
    }

    for graph in &db.site().graphs {
        if !db.has_table(&graph.table) {
            stats.error(&path, format!("graph '{}' names missing table '{}'", graph.short_name, graph.table));
        } else if tables::capabilities(&graph.table).build_graph.is_none() {
            stats.error(&path, format!("graph '{}': table '{}' has no graph builder", graph.short_name, graph.table));
        }
    }
}

/// `(entity key, reference)` for every `#` reference in a table that does not resolve
///
/// Looks at string fields, string array elements and hashtags inside text.
fn unresolved_references(store: &EntityStore, table: &str) -> Vec<(String, String)> {
    let mut found = Vec::new();
    for entity in store.entries(table) {
        let key = entity.key().unwrap_or_else(|| "?".to_string());
        for (_, value) in entity.fields() {
            let strings: Vec<&str> = match value {
                Value::String(s) => vec![s.as_str()],
                Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                _ => continue,
            };
            for text in strings {
                for (_, reference) in find_hashtags(text) {
                    let reference = reference.to_string();
                    if store.resolve_reference(&reference).is_none() {
                        found.push((key.clone(), reference));
                    }
                }
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_unresolved_references() {
        let tmp = tempdir().unwrap();
        let m = tmp.path().join("mathematicians");
        let e = tmp.path().join("equations");
        fs::create_dir_all(&m).unwrap();
        fs::create_dir_all(&e).unwrap();
        fs::write(m.join("001_euler.json"), r#"{"id": 1, "short_name": "euler"}"#).unwrap();
        fs::write(
            e.join("001_identity.json"),
            r##"{"id": 1, "short_name": "identity",
                "description": "Due to #euler, generalised by #gauss.",
                "related": ["#mathematicians/euler", "#equations/nope"]}"##,
        )
        .unwrap();
        let db = Database::open(tmp.path()).unwrap();

        let found = unresolved_references(db.store(), "equations");
        assert_eq!(
            found,
            vec![
                ("identity".to_string(), "#gauss".to_string()),
                ("identity".to_string(), "#equations/nope".to_string()),
            ]
        );
        assert!(unresolved_references(db.store(), "mathematicians").is_empty());
    }
}
