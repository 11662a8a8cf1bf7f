//! `mathdb serve` command - Run the CRUD server

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::open_database;
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::server;

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Data directory (default: data)
    #[arg(long = "data_dir", visible_alias = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Address to bind (default: 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (default: 8080)
    #[arg(long)]
    pub port: Option<u16>,
}

pub fn run(args: ServeArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let data_dir = args.data_dir.unwrap_or_else(|| config.data_dir());
    let host = args.host.unwrap_or_else(|| config.host());
    let port = args.port.unwrap_or_else(|| config.port());

    let db = open_database(&data_dir)?;
    if !global.quiet {
        println!(
            "{} Serving {} on {}",
            style("→").blue(),
            style(data_dir.display()).dim(),
            style(format!("http://{}:{}/", host, port)).cyan()
        );
    }

    let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;
    runtime
        .block_on(server::serve(db, &host, port))
        .map_err(|e| miette::miette!("server error: {}", e))
}
