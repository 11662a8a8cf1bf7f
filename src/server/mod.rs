//! CRUD server: the site rendered per request, plus save and delete

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::core::Database;
use crate::render::{PageError, PageRenderer};

pub use error::ServerError;

/// Shared by all handlers
///
/// Reads take the lock shared and writes exclusively, so a save never
/// interleaves with another request's rendering.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<RwLock<Database>>,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(db: Database) -> Result<Self, PageError> {
        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            pages: Arc::new(PageRenderer::new()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/index.html", get(routes::index))
        .route("/styles.css", get(routes::styles))
        .route("/bibliography.html", get(routes::bibliography))
        .route("/graphs/{file}", get(routes::graph))
        .route("/{table}/{file}", get(routes::table_page))
        .route("/api/save_entry/{table}", post(routes::save_entry))
        .route("/api/delete_entry/{table}/{key}", delete(routes::delete_entry))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn serve(db: Database, host: &str, port: u16) -> Result<(), ServerError> {
    let state = AppState::new(db).map_err(|e| ServerError::Internal(e.to_string()))?;
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::Internal(format!("cannot bind {}: {}", addr, e)))?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
