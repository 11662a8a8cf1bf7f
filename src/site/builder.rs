//! Writes the static site for a data directory

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::bibtex::load_bibliography;
use crate::core::project::is_path_segment;
use crate::core::Database;
use crate::graph::render_named_graph;
use crate::render::{PageError, PageRenderer, RenderContext, RenderMode};
use crate::site::stylesheet;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no tables were built")]
    NothingBuilt,

    #[error("cannot write {path}: {message}")]
    Io { path: String, message: String },

    #[error(transparent)]
    Page(#[from] PageError),
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub output_dir: PathBuf,
    /// Absolute base URL for links; `None` writes relative links
    pub base_url: Option<String>,
}

/// What a build did, for the command's summary
#[derive(Debug, Default)]
pub struct BuildReport {
    pub tables: Vec<String>,
    /// Tables that were skipped or failed, with the reason
    pub skipped: Vec<(String, String)>,
    pub graphs: Vec<String>,
    pub pages: usize,
    pub bibliography: bool,
}

/// Build every table, the index, graphs and bibliography
///
/// A table without a schema, or one that fails to render, is skipped and
/// the build goes on. The build fails only when no table was built.
pub fn build_site(db: &Database, options: &BuildOptions) -> Result<BuildReport, BuildError> {
    let pages = PageRenderer::new()?;
    let mut report = BuildReport::default();
    let out = options.output_dir.as_path();

    let (root_base, nested_base) = match &options.base_url {
        Some(base) => (base.clone(), base.clone()),
        None => (String::new(), "../".to_string()),
    };
    let (with_schema, without_schema): (Vec<String>, Vec<String>) =
        db.tables().into_iter().partition(|t| db.schemas().has_schema(t));
    for table in without_schema {
        tracing::warn!("skipping table {}: no schema", table);
        report.skipped.push((table, "no schema".to_string()));
    }

    let root = RenderContext::new(db, root_base, RenderMode::Static).with_tables(with_schema.clone());
    let nested = root.with_base(nested_base.as_str());

    for table in with_schema {
        match build_table(&pages, &nested, out, &table) {
            Ok(written) => {
                tracing::info!("built table {} ({} pages)", table, written);
                report.pages += written;
                report.tables.push(table);
            }
            Err(e) => {
                tracing::warn!("skipping table {}: {}", table, e);
                report.skipped.push((table, e.to_string()));
            }
        }
    }

    if report.tables.is_empty() {
        return Err(BuildError::NothingBuilt);
    }

    let root = root.with_tables(report.tables.clone());
    let nested = root.with_base(nested_base);
    write_file(&out.join("index.html"), &pages.render_index(&root)?)?;
    write_file(&out.join("styles.css"), &stylesheet())?;
    report.pages += 1;

    for info in &db.site().graphs {
        let page = render_named_graph(&nested, &info.short_name)
            .map_err(|e| e.to_string())
            .and_then(|(registered, html)| {
                pages
                    .render_graph_page(&nested, &registered, &html)
                    .map_err(|e| e.to_string())
            });
        match page {
            Ok(html) => {
                write_file(&out.join("graphs").join(format!("{}.html", info.short_name)), &html)?;
                report.pages += 1;
                report.graphs.push(info.short_name.clone());
            }
            Err(e) => tracing::warn!("skipping graph {}: {}", info.short_name, e),
        }
    }

    if let Some(bib) = &db.site().bibliography {
        match load_bibliography(&db.project().root().join(&bib.bibfile)) {
            Ok(entries) => {
                let html = pages.render_bibliography_page(&root, bib.title(), &entries, "")?;
                write_file(&out.join("bibliography.html"), &html)?;
                report.pages += 1;
                report.bibliography = true;
            }
            Err(e) => tracing::warn!("skipping bibliography: {}", e),
        }
    }

    Ok(report)
}

/// `<table>/index.html` and one page per keyed entity
fn build_table(pages: &PageRenderer, ctx: &RenderContext<'_>, out: &Path, table: &str) -> Result<usize, BuildError> {
    let dir = out.join(table);
    write_file(&dir.join("index.html"), &pages.render_table_page(ctx, table)?)?;
    let mut written = 1;

    for entity in ctx.store().entries(table) {
        let Some(key) = entity.key() else {
            tracing::warn!("table {}: entry without id or short_name has no page", table);
            continue;
        };
        if !is_path_segment(&key) {
            tracing::warn!("table {}: entry key {:?} is not a valid file name, no page written", table, key);
            continue;
        }
        let html = pages.render_row_page(ctx, table, entity)?;
        write_file(&dir.join(format!("{}.html", key)), &html)?;
        written += 1;
    }
    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    let io_error = |e: std::io::Error| BuildError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, contents).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn data_dir(root: &Path) -> PathBuf {
        let data = root.join("data");
        let m = data.join("mathematicians");
        let t = data.join("theorems");
        fs::create_dir_all(&m).unwrap();
        fs::create_dir_all(&t).unwrap();
        fs::write(
            data.join("main.json"),
            r#"{"graphs": [{"short_name": "nothing", "table": "theorems"}]}"#,
        )
        .unwrap();
        fs::write(m.join("schema.json"), r#"{"columns": [{"name": "name", "type": "string"}]}"#).unwrap();
        fs::write(
            m.join("001_euler.json"),
            r#"{"id": 1, "short_name": "euler", "name": "Leonhard Euler"}"#,
        )
        .unwrap();
        fs::write(m.join("002.json"), r#"{"id": 2, "name": "Anonymous"}"#).unwrap();
        fs::write(t.join("001.json"), r#"{"id": 1}"#).unwrap();
        data
    }

    #[test]
    fn test_build_writes_pages() {
        let tmp = tempdir().unwrap();
        let data = data_dir(tmp.path());
        let db = Database::open(&data).unwrap();
        let out = tmp.path().join("docs");

        let report = build_site(
            &db,
            &BuildOptions {
                output_dir: out.clone(),
                base_url: None,
            },
        )
        .unwrap();

        assert_eq!(report.tables, vec!["mathematicians"]);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.graphs.is_empty());
        assert!(out.join("index.html").exists());
        assert!(out.join("styles.css").exists());
        assert!(out.join("mathematicians/index.html").exists());
        assert!(out.join("mathematicians/euler.html").exists());
        assert!(out.join("mathematicians/2.html").exists());
        assert!(!out.join("theorems").exists());

        let page = fs::read_to_string(out.join("mathematicians/euler.html")).unwrap();
        assert!(page.contains("href=\"../styles.css\""));
    }

    #[test]
    fn test_index_and_nav_link_only_built_tables() {
        let tmp = tempdir().unwrap();
        let db = Database::open(&data_dir(tmp.path())).unwrap();
        let out = tmp.path().join("docs");
        build_site(
            &db,
            &BuildOptions {
                output_dir: out.clone(),
                base_url: None,
            },
        )
        .unwrap();

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("href=\"mathematicians/index.html\""));
        assert!(!index.contains("theorems/index.html"));
        let page = fs::read_to_string(out.join("mathematicians/euler.html")).unwrap();
        assert!(!page.contains("theorems/index.html"));
    }

    #[test]
    fn test_entries_with_unsafe_keys_get_no_page() {
        let tmp = tempdir().unwrap();
        let data = data_dir(tmp.path());
        fs::write(
            data.join("mathematicians/003_x.json"),
            r#"{"id": 3, "short_name": "../../escaped", "name": "X"}"#,
        )
        .unwrap();
        let db = Database::open(&data).unwrap();
        let out = tmp.path().join("docs");

        let report = build_site(
            &db,
            &BuildOptions {
                output_dir: out.clone(),
                base_url: None,
            },
        )
        .unwrap();

        assert_eq!(report.tables, vec!["mathematicians"]);
        assert!(!tmp.path().join("escaped.html").exists());
        assert!(!out.join("escaped.html").exists());
        assert!(out.join("mathematicians/euler.html").exists());
    }

    #[test]
    fn test_deploy_base_url() {
        let tmp = tempdir().unwrap();
        let db = Database::open(&data_dir(tmp.path())).unwrap();
        let out = tmp.path().join("site");
        build_site(
            &db,
            &BuildOptions {
                output_dir: out.clone(),
                base_url: Some("https://example.org/math".to_string()),
            },
        )
        .unwrap();

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("href=\"https://example.org/math/mathematicians/index.html\""));
    }

    #[test]
    fn test_nothing_built_is_an_error() {
        let tmp = tempdir().unwrap();
        fs::create_dir(tmp.path().join("theorems")).unwrap();
        let db = Database::open(tmp.path()).unwrap();
        let result = build_site(
            &db,
            &BuildOptions {
                output_dir: tmp.path().join("docs"),
                base_url: None,
            },
        );
        assert!(matches!(result, Err(BuildError::NothingBuilt)));
    }
}
