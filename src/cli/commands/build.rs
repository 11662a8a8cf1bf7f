//! `mathdb build` command - Write the static site

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::helpers::{open_database, plural};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::site::{build_site, BuildOptions};

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Data directory holding main.json and one folder per table
    pub data_dir: PathBuf,

    /// Output directory (default: docs/ next to the data directory)
    #[arg(long = "output_dir", visible_alias = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Write absolute links using the configured deploy URL
    #[arg(long)]
    pub deploy: bool,
}

pub fn run(args: BuildArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let db = open_database(&args.data_dir)?;

    let output_dir = args
        .output_dir
        .or(config.output_dir.clone())
        .unwrap_or_else(|| db.project().default_output_dir());

    let base_url = if args.deploy {
        let url = match config.deploy_url.clone().or_else(|| db.site().deploy_url.clone()) {
            Some(url) => url,
            None => file_url(&output_dir)?,
        };
        if !global.quiet {
            println!("{} Deploying with base URL {}", style("→").blue(), style(&url).cyan());
        }
        Some(url)
    } else {
        None
    };

    let report = build_site(
        &db,
        &BuildOptions {
            output_dir: output_dir.clone(),
            base_url,
        },
    )
    .map_err(|e| miette::miette!("build failed: {}", e))?;

    if global.quiet {
        return Ok(());
    }

    for table in &report.tables {
        let count = db.store().entries(table).len();
        println!("{} {} ({})", style("✓").green(), table, plural(count, "record"));
    }
    for (table, reason) in &report.skipped {
        println!("{} {} skipped: {}", style("!").yellow(), table, reason);
    }
    for graph in &report.graphs {
        println!("{} graph {}", style("✓").green(), graph);
    }
    if report.bibliography {
        println!("{} bibliography", style("✓").green());
    }

    println!();
    println!(
        "Wrote {} to {}",
        style(plural(report.pages, "page")).bold(),
        style(output_dir.display()).dim()
    );
    Ok(())
}

/// `file:///abs/path/` of the output directory, creating it first
fn file_url(dir: &Path) -> Result<String> {
    std::fs::create_dir_all(dir).into_diagnostic()?;
    let absolute = dir.canonicalize().into_diagnostic()?;
    let path = absolute.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        Ok(format!("file://{}/", path.trim_end_matches('/')))
    } else {
        Ok(format!("file:///{}/", path.trim_end_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_is_absolute() {
        let tmp = tempfile::tempdir().unwrap();
        let url = file_url(&tmp.path().join("docs")).unwrap();
        assert!(url.starts_with("file:///"));
        assert!(url.ends_with("/docs/"));
        assert!(tmp.path().join("docs").is_dir());
    }
}
