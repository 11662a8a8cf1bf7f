//! In-memory entity store over the file-backed tables
//!
//! The store loads a table from disk the first time it is requested and is
//! the source of truth afterwards. Mutations only touch the cache; writing
//! or deleting the backing file is the caller's job. Edits made on disk
//! behind the store's back are not picked up until the process restarts.

use std::collections::BTreeMap;

use crate::core::entity::Entity;
use crate::core::loader;
use crate::core::project::Project;
use crate::core::reference::Reference;

#[derive(Debug)]
pub struct EntityStore {
    project: Project,
    /// Loaded tables, ordered by name so bare-reference scans are deterministic
    tables: BTreeMap<String, Vec<Entity>>,
}

impl EntityStore {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            tables: BTreeMap::new(),
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Read a table from disk without touching the cache
    pub fn load(&self, table: &str) -> Vec<Entity> {
        loader::load_table(&self.project, table)
    }

    /// Get a table's entities, loading it on first access
    pub fn get(&mut self, table: &str) -> &[Entity] {
        self.table_mut(table)
    }

    /// Load every table of the data directory into the cache
    pub fn preload(&mut self) {
        for table in self.project.tables() {
            self.get(&table);
        }
    }

    /// Cached entities of a table (empty if the table was never loaded)
    pub fn entries(&self, table: &str) -> &[Entity] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append an entity
    pub fn add(&mut self, table: &str, entity: Entity) {
        self.table_mut(table).push(entity);
    }

    /// Replace the first entity sharing the new entity's id or short_name, or
    /// append it if none does
    ///
    /// Later entries that share the identity are dropped so the table holds
    /// exactly one copy afterwards. Callers writing files check short_name
    /// ownership first (see `Database::save_entry`).
    pub fn update(&mut self, table: &str, entity: Entity) {
        let entries = self.table_mut(table);
        match entries.iter().position(|e| e.same_identity(&entity)) {
            Some(index) => {
                let mut i = 0;
                entries.retain(|e| {
                    let keep = i <= index || !e.same_identity(&entity);
                    i += 1;
                    keep
                });
                entries[index] = entity;
            }
            None => entries.push(entity),
        }
    }

    /// Remove every entity whose id or short_name equals `key`
    ///
    /// Returns the number of removed entities.
    pub fn remove(&mut self, table: &str, key: &str) -> usize {
        let entries = self.table_mut(table);
        let before = entries.len();
        entries.retain(|e| !e.matches_key(key));
        before - entries.len()
    }

    /// Drop a table from the cache so the next access reloads it from disk
    pub fn clear(&mut self, table: &str) {
        self.tables.remove(table);
    }

    pub fn lookup_by_short_name(&self, table: &str, short_name: &str) -> Option<&Entity> {
        self.entries(table)
            .iter()
            .find(|e| e.short_name() == Some(short_name))
    }

    pub fn lookup_by_id(&self, table: &str, id: i64) -> Option<&Entity> {
        self.entries(table).iter().find(|e| e.id() == Some(id))
    }

    /// Find by short_name first, then by numeric id
    pub fn lookup_by_key(&self, table: &str, key: &str) -> Option<&Entity> {
        self.lookup_by_short_name(table, key).or_else(|| {
            key.trim()
                .parse::<i64>()
                .ok()
                .and_then(|id| self.lookup_by_id(table, id))
        })
    }

    /// Resolve a `#key` or `#table/key` reference string
    ///
    /// Bare keys scan the loaded tables in name order and the first match
    /// wins; a short_name reused across tables therefore resolves to the
    /// alphabetically first table.
    pub fn resolve_reference(&self, value: &str) -> Option<(&str, &Entity)> {
        match Reference::parse(value)? {
            Reference::Qualified { table, key } => {
                let (name, _) = self.tables.get_key_value(table.as_str())?;
                self.lookup_by_key(name, &key).map(|e| (name.as_str(), e))
            }
            Reference::Bare(key) => self.tables.keys().find_map(|name| {
                self.lookup_by_key(name, &key).map(|e| (name.as_str(), e))
            }),
        }
    }

    /// Resolve a value that may be a reference or a plain key into `table`
    pub fn resolve_in(&self, table: &str, value: &str) -> Option<(&str, &Entity)> {
        if Reference::parse(value).is_some() {
            return self.resolve_reference(value);
        }
        let (name, _) = self.tables.get_key_value(table)?;
        self.lookup_by_key(name, value).map(|e| (name.as_str(), e))
    }

    /// Highest id in a table, used to suggest the next id for new entries
    pub fn max_id(&self, table: &str) -> Option<i64> {
        self.entries(table).iter().filter_map(Entity::id).max()
    }

    fn table_mut(&mut self, table: &str) -> &mut Vec<Entity> {
        if !self.tables.contains_key(table) {
            let entities = self.load(table);
            tracing::debug!("loaded {} entities from table {}", entities.len(), table);
            self.tables.insert(table.to_string(), entities);
        }
        self.tables.entry(table.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn entity(value: serde_json::Value) -> Entity {
        serde_json::from_value(value).unwrap()
    }

    fn write(dir: &std::path::Path, name: &str, value: serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_string(&value).unwrap()).unwrap();
    }

    fn setup() -> (TempDir, EntityStore) {
        let tmp = tempdir().unwrap();
        let math = tmp.path().join("mathematicians");
        let eqs = tmp.path().join("equations");
        fs::create_dir(&math).unwrap();
        fs::create_dir(&eqs).unwrap();
        write(&math, "001_euler.json", json!({"id": 1, "short_name": "euler", "name": "Leonhard Euler"}));
        write(&math, "002_gauss.json", json!({"id": 2, "short_name": "gauss", "name": "Carl Friedrich Gauss"}));
        write(
            &eqs,
            "010_eulers-identity.json",
            json!({"id": 10, "short_name": "eulers-identity", "name": "Euler's Identity", "author": "euler"}),
        );

        let mut store = EntityStore::new(Project::open(tmp.path()).unwrap());
        store.preload();
        (tmp, store)
    }

    #[test]
    fn test_get_populates_cache_once() {
        let (tmp, mut store) = setup();
        assert_eq!(store.get("mathematicians").len(), 2);

        // Files written after the first load are not seen
        write(
            &tmp.path().join("mathematicians"),
            "003_riemann.json",
            json!({"id": 3, "short_name": "riemann"}),
        );
        assert_eq!(store.get("mathematicians").len(), 2);

        store.clear("mathematicians");
        assert_eq!(store.get("mathematicians").len(), 3);
    }

    #[test]
    fn test_missing_table_is_empty() {
        let (_tmp, mut store) = setup();
        assert!(store.get("theorems").is_empty());
    }

    #[test]
    fn test_short_name_id_round_trip() {
        let (_tmp, store) = setup();
        for e in store.entries("mathematicians") {
            let short = e.short_name().unwrap();
            let by_name = store.lookup_by_short_name("mathematicians", short).unwrap();
            let by_id = store.lookup_by_id("mathematicians", by_name.id().unwrap()).unwrap();
            assert_eq!(by_name, by_id);
        }
    }

    #[test]
    fn test_update_replaces_matching_entity() {
        let (_tmp, mut store) = setup();
        store.update(
            "mathematicians",
            entity(json!({"id": 1, "short_name": "euler", "name": "L. Euler"})),
        );

        let matches: Vec<_> = store
            .entries("mathematicians")
            .iter()
            .filter(|e| e.matches_key("euler"))
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].get_str("name"), Some("L. Euler"));
        assert_eq!(store.entries("mathematicians").len(), 2);
    }

    #[test]
    fn test_update_appends_when_missing() {
        let (_tmp, mut store) = setup();
        store.update("mathematicians", entity(json!({"id": 3, "short_name": "riemann"})));
        assert_eq!(store.entries("mathematicians").len(), 3);

        // Idempotent
        store.update("mathematicians", entity(json!({"id": 3, "short_name": "riemann"})));
        assert_eq!(store.entries("mathematicians").len(), 3);
    }

    #[test]
    fn test_update_collapses_duplicate_identities() {
        let (_tmp, mut store) = setup();
        store.add("mathematicians", entity(json!({"id": 1, "short_name": "dup"})));
        store.update("mathematicians", entity(json!({"id": 1, "short_name": "euler", "name": "E"})));

        let ones: Vec<_> = store
            .entries("mathematicians")
            .iter()
            .filter(|e| e.id() == Some(1))
            .collect();
        assert_eq!(ones.len(), 1);
        assert_eq!(ones[0].get_str("name"), Some("E"));
    }

    #[test]
    fn test_remove_by_id_or_short_name() {
        let (_tmp, mut store) = setup();
        assert_eq!(store.remove("mathematicians", "1"), 1);
        assert!(store.lookup_by_short_name("mathematicians", "euler").is_none());
        assert!(store.lookup_by_short_name("mathematicians", "gauss").is_some());

        assert_eq!(store.remove("mathematicians", "gauss"), 1);
        assert!(store.entries("mathematicians").is_empty());
        assert_eq!(store.remove("mathematicians", "nobody"), 0);
    }

    #[test]
    fn test_remove_keeps_referencing_entities() {
        let (_tmp, mut store) = setup();
        store.remove("mathematicians", "1");
        let eq = store.lookup_by_short_name("equations", "eulers-identity").unwrap();
        assert_eq!(eq.get_str("author"), Some("euler"));
        assert!(store.resolve_in("mathematicians", "euler").is_none());
    }

    #[test]
    fn test_resolve_qualified_reference() {
        let (_tmp, store) = setup();
        let (table, e) = store.resolve_reference("#mathematicians/euler").unwrap();
        assert_eq!(table, "mathematicians");
        assert_eq!(e.id(), Some(1));

        let (_, e) = store.resolve_reference("#equations/10").unwrap();
        assert_eq!(e.short_name(), Some("eulers-identity"));

        assert!(store.resolve_reference("#equations/e1").is_none());
        assert!(store.resolve_reference("#nosuchtable/euler").is_none());
    }

    #[test]
    fn test_resolve_bare_reference_first_table_wins() {
        let (_tmp, mut store) = setup();
        let (table, _) = store.resolve_reference("#gauss").unwrap();
        assert_eq!(table, "mathematicians");

        // "equations" sorts before "mathematicians"
        store.add("equations", entity(json!({"id": 99, "short_name": "gauss"})));
        let (table, e) = store.resolve_reference("#gauss").unwrap();
        assert_eq!(table, "equations");
        assert_eq!(e.id(), Some(99));
    }

    #[test]
    fn test_resolve_in_accepts_plain_keys() {
        let (_tmp, store) = setup();
        let (table, e) = store.resolve_in("mathematicians", "euler").unwrap();
        assert_eq!(table, "mathematicians");
        assert_eq!(e.display_name(), "Leonhard Euler");
        assert!(store.resolve_in("mathematicians", "#gauss").is_some());
    }

    #[test]
    fn test_max_id() {
        let (_tmp, store) = setup();
        assert_eq!(store.max_id("mathematicians"), Some(2));
        assert_eq!(store.max_id("nothing"), None);
    }
}
