//! Core module - data directory, entities, store and configuration

pub mod bibtex;
pub mod config;
pub mod database;
pub mod entity;
pub mod loader;
pub mod project;
pub mod reference;
pub mod site;
pub mod store;

pub use config::Config;
pub use database::{Database, EntryError, TableInfo};
pub use entity::Entity;
pub use project::{Project, ProjectError};
pub use reference::Reference;
pub use site::SiteConfig;
pub use store::EntityStore;
