//! Route handlers

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde_json::{json, Value};

use crate::core::bibtex::load_bibliography;
use crate::core::project::is_valid_table_name;
use crate::core::Database;
use crate::graph::render_named_graph;
use crate::render::form::new_entry_defaults;
use crate::render::{RenderContext, RenderMode};
use crate::schema::coerce_submission;
use crate::server::error::{HtmlError, ServerError};
use crate::server::AppState;
use crate::site::stylesheet;

type PageResult = Result<Html<String>, HtmlError>;

fn server_context(db: &Database) -> RenderContext<'_> {
    RenderContext::new(db, "/", RenderMode::Server)
}

/// Render an error through the site chrome, falling back to plain text
fn html_error(state: &AppState, ctx: &RenderContext<'_>, error: ServerError) -> HtmlError {
    let status = error.status();
    let title = status.canonical_reason().unwrap_or("Error");
    let html = state
        .pages
        .render_error_page(ctx, title, &error.to_string())
        .unwrap_or_else(|_| error.to_string());
    HtmlError { status, html }
}

fn require_table(db: &Database, table: &str) -> Result<(), ServerError> {
    if is_valid_table_name(table) && db.has_table(table) {
        Ok(())
    } else {
        Err(ServerError::NotFound(format!("table '{}' not found", table)))
    }
}

pub async fn index(State(state): State<AppState>) -> PageResult {
    let db = state.db.read().await;
    let ctx = server_context(&db);
    state
        .pages
        .render_index(&ctx)
        .map(Html)
        .map_err(|e| html_error(&state, &ctx, e.into()))
}

pub async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], stylesheet())
}

pub async fn bibliography(State(state): State<AppState>) -> PageResult {
    let db = state.db.read().await;
    let ctx = server_context(&db);

    let rendered = match &db.site().bibliography {
        None => state
            .pages
            .render_bibliography_page(&ctx, "Bibliography", &[], "No bibliography configured."),
        Some(bib) => match load_bibliography(&db.project().root().join(&bib.bibfile)) {
            Ok(entries) => state.pages.render_bibliography_page(&ctx, bib.title(), &entries, ""),
            Err(e) => return Err(html_error(&state, &ctx, ServerError::Internal(e.to_string()))),
        },
    };
    rendered.map(Html).map_err(|e| html_error(&state, &ctx, e.into()))
}

/// `/graphs/<short_name>.html`
pub async fn graph(State(state): State<AppState>, Path(file): Path<String>) -> PageResult {
    let db = state.db.read().await;
    let ctx = server_context(&db);
    render_graph_file(&state, &ctx, &file)
        .map(Html)
        .map_err(|e| html_error(&state, &ctx, e))
}

fn render_graph_file(state: &AppState, ctx: &RenderContext<'_>, file: &str) -> Result<String, ServerError> {
    let short_name = file
        .strip_suffix(".html")
        .ok_or_else(|| ServerError::NotFound(format!("no page {}", file)))?;
    let (info, fragment) = render_named_graph(ctx, short_name)?;
    Ok(state.pages.render_graph_page(ctx, &info, &fragment)?)
}

/// `/<table>/index.html`, `add.html`, `edit_<row>.html` and `<row>.html`
pub async fn table_page(State(state): State<AppState>, Path((table, file)): Path<(String, String)>) -> PageResult {
    let db = state.db.read().await;
    let ctx = server_context(&db);
    render_table_file(&state, &ctx, &table, &file)
        .map(Html)
        .map_err(|e| html_error(&state, &ctx, e))
}

fn render_table_file(
    state: &AppState,
    ctx: &RenderContext<'_>,
    table: &str,
    file: &str,
) -> Result<String, ServerError> {
    let db = ctx.db;
    require_table(db, table)?;
    let name = file
        .strip_suffix(".html")
        .ok_or_else(|| ServerError::NotFound(format!("no page {}", file)))?;

    let find = |key: &str| {
        db.store()
            .lookup_by_key(table, key)
            .ok_or_else(|| ServerError::NotFound(format!("no entry '{}' in {}", key, table)))
    };

    let html = match name {
        "index" => state.pages.render_table_page(ctx, table)?,
        "add" => {
            let defaults = new_entry_defaults(db.store(), table);
            state.pages.render_form_page(ctx, table, &defaults, true)?
        }
        _ => match name.strip_prefix("edit_") {
            Some(key) => state.pages.render_form_page(ctx, table, find(key)?, false)?,
            None => state.pages.render_row_page(ctx, table, find(name)?)?,
        },
    };
    Ok(html)
}

/// `POST /api/save_entry/<table>` with the entry as a JSON body
pub async fn save_entry(
    State(state): State<AppState>,
    Path(table): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ServerError> {
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON: {}", e)))?;

    let mut db = state.db.write().await;
    require_table(&db, &table)?;
    let entity = coerce_submission(db.schemas().schema(&table), raw)?;
    let filename = db.save_entry(&table, entity)?;

    tracing::info!("saved {}/{}", table, filename);
    Ok(Json(json!({ "success": true, "filename": filename })))
}

/// `DELETE /api/delete_entry/<table>/<id or short_name>`
pub async fn delete_entry(
    State(state): State<AppState>,
    Path((table, key)): Path<(String, String)>,
) -> Result<Json<Value>, ServerError> {
    let mut db = state.db.write().await;
    require_table(&db, &table)?;
    let deleted = db.delete_entry(&table, &key)?;
    if deleted.is_empty() {
        return Err(ServerError::NotFound(format!("no entry '{}' in {}", key, table)));
    }

    let deleted = deleted.join(", ");
    tracing::info!("deleted {}/{}", table, deleted);
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}

pub async fn not_found(State(state): State<AppState>) -> HtmlError {
    let db = state.db.read().await;
    let ctx = server_context(&db);
    html_error(&state, &ctx, ServerError::NotFound("page not found".to_string()))
}
