//! mathdb: a static-site generator and CRUD server for a JSON database
//!
//! A data directory holds `main.json` plus one folder per table. Each table
//! folder has a `schema.json` describing its columns and one JSON file per
//! record. Records link to each other with `#key` / `#table/key` references.

pub mod cli;
pub mod core;
pub mod graph;
pub mod json;
pub mod render;
pub mod schema;
pub mod server;
pub mod site;
pub mod tables;
