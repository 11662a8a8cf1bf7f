//! Error responses of the CRUD server

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::core::EntryError;
use crate::graph::GraphError;
use crate::render::PageError;
use crate::schema::SubmissionError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API routes answer `{"error": "..."}`
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!("{}", self);
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<SubmissionError> for ServerError {
    fn from(e: SubmissionError) -> Self {
        ServerError::BadRequest(e.to_string())
    }
}

impl From<EntryError> for ServerError {
    fn from(e: EntryError) -> Self {
        match e {
            EntryError::NoFileName => ServerError::BadRequest(e.to_string()),
            EntryError::ShortNameTaken { .. } => ServerError::Conflict(e.to_string()),
            EntryError::Io(_) => ServerError::Internal(e.to_string()),
        }
    }
}

impl From<PageError> for ServerError {
    fn from(e: PageError) -> Self {
        match e {
            PageError::TableNotFound(_) => ServerError::NotFound(e.to_string()),
            PageError::Template(_) => ServerError::Internal(e.to_string()),
        }
    }
}

impl From<GraphError> for ServerError {
    fn from(e: GraphError) -> Self {
        ServerError::NotFound(e.to_string())
    }
}

/// A failed page request, already rendered as HTML
#[derive(Debug)]
pub struct HtmlError {
    pub status: StatusCode,
    pub html: String,
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        (self.status, Html(self.html)).into_response()
    }
}
