//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};

use crate::cli::commands::{
    build::BuildArgs, check::CheckArgs, completions::CompletionsArgs, list::ListArgs, serve::ServeArgs,
};

#[derive(Parser)]
#[command(name = "mathdb")]
#[command(author, version, about = "Static site and CRUD server for a JSON database of equations and mathematicians")]
#[command(
    long_about = "Builds a static HTML site from a data directory of JSON tables (one folder per table, \
                  each with a schema.json), or serves the same pages with add/edit/delete forms."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the static site
    Build(BuildArgs),

    /// Run the CRUD server
    Serve(ServeArgs),

    /// Check JSON files, schemas and references
    Check(CheckArgs),

    /// List the tables of a data directory
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
