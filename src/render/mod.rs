//! HTML rendering of cards, forms and pages

pub mod card;
pub mod form;
pub mod html;
pub mod markdown;
pub mod page;
pub mod reference;

pub use card::render_card;
pub use form::render_entry_form;
pub use page::{PageError, PageRenderer};
pub use reference::{render_reference, reverse_references};

use crate::core::{Database, Entity, EntityStore, TableInfo};
use crate::schema::SchemaRegistry;

/// Where the rendered HTML ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Files written by `mathdb build`
    Static,
    /// Pages served by `mathdb serve`; adds edit controls
    Server,
}

/// Everything a renderer needs besides the entity itself
#[derive(Clone)]
pub struct RenderContext<'a> {
    pub db: &'a Database,
    /// Prefix for every generated link; empty or ending in `/`
    pub base_url: String,
    pub mode: RenderMode,
    /// Tables linked from navigation and the index; `None` lists all
    listed: Option<Vec<String>>,
}

impl<'a> RenderContext<'a> {
    pub fn new(db: &'a Database, base_url: impl Into<String>, mode: RenderMode) -> Self {
        let mut base_url = base_url.into();
        if !base_url.is_empty() && !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            db,
            base_url,
            mode,
            listed: None,
        }
    }

    /// Same database, mode and table list, different link prefix
    pub fn with_base(&self, base_url: impl Into<String>) -> Self {
        Self {
            listed: self.listed.clone(),
            ..Self::new(self.db, base_url, self.mode)
        }
    }

    /// Restrict navigation and the index to these tables
    pub fn with_tables(mut self, tables: Vec<String>) -> Self {
        self.listed = Some(tables);
        self
    }

    /// Summaries of the tables pages should link to
    pub fn listed_tables(&self) -> Vec<TableInfo> {
        let infos = self.db.table_infos();
        match &self.listed {
            Some(names) => infos.into_iter().filter(|info| names.contains(&info.name)).collect(),
            None => infos,
        }
    }

    pub fn store(&self) -> &'a EntityStore {
        self.db.store()
    }

    pub fn schemas(&self) -> &'a SchemaRegistry {
        self.db.schemas()
    }

    pub fn is_server(&self) -> bool {
        self.mode == RenderMode::Server
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn table_url(&self, table: &str) -> String {
        self.url(&format!("{}/index.html", table))
    }

    /// Page of one entity, `<base><table>/<short_name or id>.html`
    pub fn entity_url(&self, table: &str, entity: &Entity) -> String {
        match entity.key() {
            Some(key) => self.url(&format!("{}/{}.html", table, key)),
            None => self.table_url(table),
        }
    }
}
