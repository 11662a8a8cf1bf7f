//! Full pages: the embedded Tera templates around cards, forms and graphs

use chrono::Utc;
use rust_embed::Embed;
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::core::bibtex::BibEntry;
use crate::core::site::GraphInfo;
use crate::core::Entity;
use crate::render::{render_card, render_entry_form, RenderContext};
use crate::tables;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("template error: {0}")]
    Template(String),

    #[error("table '{0}' not found")]
    TableNotFound(String),
}

#[derive(Serialize)]
struct GraphLink<'a> {
    short_name: &'a str,
    title: &'a str,
    description: &'a str,
}

/// Renders the site's pages
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, PageError> {
        let mut templates = Vec::new();
        for file in EmbeddedTemplates::iter() {
            let name = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(name) {
                let source = String::from_utf8_lossy(&content.data).into_owned();
                templates.push((name.to_string(), source));
            }
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| PageError::Template(format_tera_error(&e)))?;
        Ok(Self { tera })
    }

    /// Navigation and site fields shared by every page
    fn base_context(&self, ctx: &RenderContext<'_>, page_title: &str, current_table: &str) -> Context {
        let site = ctx.db.site();
        let graphs: Vec<GraphLink<'_>> = site
            .graphs
            .iter()
            .map(|g| GraphLink {
                short_name: &g.short_name,
                title: g.display_name(),
                description: &g.description,
            })
            .collect();

        let mut context = Context::new();
        context.insert("site", site);
        context.insert("base_url", &ctx.base_url);
        context.insert("page_title", page_title);
        context.insert("current_table", current_table);
        context.insert("tables", &ctx.listed_tables());
        context.insert("graphs", &graphs);
        context.insert(
            "bibliography_title",
            site.bibliography.as_ref().map_or("", |b| b.title()),
        );
        context.insert("server", &ctx.is_server());
        context.insert("generated", &Utc::now().format("%Y-%m-%d %H:%M UTC").to_string());
        context
    }

    fn render(&self, template: &str, context: &Context) -> Result<String, PageError> {
        self.tera
            .render(template, context)
            .map_err(|e| PageError::Template(format_tera_error(&e)))
    }

    pub fn render_index(&self, ctx: &RenderContext<'_>) -> Result<String, PageError> {
        let context = self.base_context(ctx, &ctx.db.site().title, "");
        self.render("index.html", &context)
    }

    /// All cards of a table
    pub fn render_table_page(&self, ctx: &RenderContext<'_>, table: &str) -> Result<String, PageError> {
        if !ctx.db.has_table(table) {
            return Err(PageError::TableNotFound(table.to_string()));
        }
        let info = ctx.db.table_info(table);
        let schema = ctx.schemas().schema(table);
        let cards: Vec<String> = ctx
            .store()
            .entries(table)
            .iter()
            .map(|entity| render_card(ctx, table, schema, entity))
            .collect();

        let mut context = self.base_context(ctx, &info.title, table);
        context.insert("description", &info.description);
        context.insert("cards", &cards);
        self.render("table.html", &context)
    }

    pub fn render_row_page(&self, ctx: &RenderContext<'_>, table: &str, entity: &Entity) -> Result<String, PageError> {
        let info = ctx.db.table_info(table);
        let card = render_card(ctx, table, ctx.schemas().schema(table), entity);

        let mut context = self.base_context(ctx, &tables::make_title(table, entity), table);
        context.insert("table_title", &info.title);
        context.insert("card", &card);
        self.render("row.html", &context)
    }

    pub fn render_form_page(
        &self,
        ctx: &RenderContext<'_>,
        table: &str,
        entity: &Entity,
        is_new: bool,
    ) -> Result<String, PageError> {
        let info = ctx.db.table_info(table);
        let form = render_entry_form(ctx, table, ctx.schemas().schema(table), entity, is_new);
        let title = if is_new {
            format!("Add to {}", info.title)
        } else {
            format!("Edit {}", tables::make_title(table, entity))
        };

        let mut context = self.base_context(ctx, &title, table);
        context.insert("table_title", &info.title);
        context.insert("form", &form);
        self.render("form.html", &context)
    }

    /// Wrap a fragment from [`crate::graph::render_graph`]
    pub fn render_graph_page(&self, ctx: &RenderContext<'_>, info: &GraphInfo, graph_html: &str) -> Result<String, PageError> {
        let mut context = self.base_context(ctx, info.display_name(), "");
        context.insert("description", &info.description);
        context.insert("graph", graph_html);
        self.render("graph.html", &context)
    }

    pub fn render_bibliography_page(
        &self,
        ctx: &RenderContext<'_>,
        title: &str,
        entries: &[BibEntry],
        message: &str,
    ) -> Result<String, PageError> {
        let mut context = self.base_context(ctx, title, "");
        context.insert("entries", entries);
        context.insert("message", message);
        self.render("bibliography.html", &context)
    }

    pub fn render_error_page(&self, ctx: &RenderContext<'_>, title: &str, message: &str) -> Result<String, PageError> {
        let mut context = self.base_context(ctx, title, "");
        context.insert("message", message);
        self.render("error.html", &context)
    }
}

/// Tera nests the useful part of an error in its source chain
fn format_tera_error(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
