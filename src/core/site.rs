//! Site-wide settings from `data/main.json`

use serde::{Deserialize, Serialize};

use crate::core::loader::load_json_file;
use crate::core::project::Project;

/// Contents of `main.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub header: String,
    pub subtitle: String,
    pub description: String,
    pub footer: String,
    /// Base URL used by `build --deploy`
    pub deploy_url: Option<String>,
    /// Extra navigation links shown on every page
    pub nav: Vec<NavLink>,
    /// Registered relationship graphs
    pub graphs: Vec<GraphInfo>,
    pub bibliography: Option<BibliographyInfo>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Mathematics Database".to_string(),
            header: "Mathematics Database".to_string(),
            subtitle: String::new(),
            description: String::new(),
            footer: String::new(),
            deploy_url: None,
            nav: Vec::new(),
            graphs: Vec::new(),
            bibliography: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub title: String,
    pub url: String,
}

/// A graph registered in `main.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphInfo {
    pub short_name: String,
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Table whose graph builder produces this graph
    pub table: String,
}

impl GraphInfo {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.short_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BibliographyInfo {
    /// BibTeX file, relative to the data directory
    pub bibfile: String,
    pub title: Option<String>,
}

impl BibliographyInfo {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Bibliography")
    }
}

impl SiteConfig {
    /// Load `main.json`; a missing or malformed file gives the defaults
    pub fn load(project: &Project) -> Self {
        let path = project.main_json_path();
        if !path.exists() {
            tracing::warn!("{} not found, using default site settings", path.display());
            return Self::default();
        }
        match load_json_file(&path) {
            Ok(site) => site,
            Err(e) => {
                tracing::warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn graph(&self, short_name: &str) -> Option<&GraphInfo> {
        self.graphs.iter().find(|g| g.short_name == short_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_main_json() {
        let tmp = tempdir().unwrap();
        std::fs::write(
            tmp.path().join("main.json"),
            r#"{
                "title": "Math DB",
                "header": "Welcome",
                "graphs": [{"short_name": "authors", "table": "equations"}],
                "bibliography": {"bibfile": "refs.bib"}
            }"#,
        )
        .unwrap();

        let site = SiteConfig::load(&Project::open(tmp.path()).unwrap());
        assert_eq!(site.title, "Math DB");
        assert_eq!(site.footer, "");
        assert_eq!(site.graph("authors").unwrap().display_name(), "authors");
        assert_eq!(site.bibliography.unwrap().title(), "Bibliography");
    }

    #[test]
    fn test_missing_main_json_uses_defaults() {
        let tmp = tempdir().unwrap();
        let site = SiteConfig::load(&Project::open(tmp.path()).unwrap());
        assert_eq!(site, SiteConfig::default());
    }
}
