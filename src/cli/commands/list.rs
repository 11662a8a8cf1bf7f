//! `mathdb list` command - Markdown table of the data directory's tables

use miette::Result;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{open_database, truncate_str};
use crate::core::TableInfo;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Data directory holding main.json and one folder per table
    pub data_dir: PathBuf,
}

pub fn run(args: ListArgs) -> Result<()> {
    let db = open_database(&args.data_dir)?;
    println!("{}", tables_markdown(&db.table_infos()));
    Ok(())
}

fn tables_markdown(infos: &[TableInfo]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Table", "Title", "Description", "Records", "Schema"]);
    for info in infos {
        builder.push_record([
            info.name.clone(),
            info.title.clone(),
            truncate_str(&info.description, 40),
            info.count.to_string(),
            if info.has_schema { "yes" } else { "no" }.to_string(),
        ]);
    }
    builder.build().with(Style::markdown()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_markdown() {
        let infos = vec![TableInfo {
            name: "equations".to_string(),
            title: "Equations".to_string(),
            description: "Famous equations".to_string(),
            count: 3,
            has_schema: true,
        }];
        let table = tables_markdown(&infos);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("| Table"));
        assert!(lines[1].starts_with("|-"));
        assert!(lines[2].contains("| equations"));
        assert!(lines[2].contains("| yes"));
    }
}
