//! `mathematicians` table hooks

use serde_json::Value;

use crate::core::Entity;
use crate::tables::TableCapabilities;

pub const CAPABILITIES: TableCapabilities = TableCapabilities {
    render_card_override: None,
    make_title: Some(make_title),
    build_graph: None,
};

/// `"Leonhard Euler (1707–1783)"`
///
/// A missing birth year shows as `?`, a missing death year as `present`.
pub fn make_title(entity: &Entity) -> String {
    let birth = year(entity.get("birth_year")).unwrap_or_else(|| "?".to_string());
    let death = year(entity.get("death_year")).unwrap_or_else(|| "present".to_string());
    format!("{} ({}–{})", entity.display_name(), birth, death)
}

fn year(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
