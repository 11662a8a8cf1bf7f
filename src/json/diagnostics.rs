//! JSON error diagnostics with source-annotated messages

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// JSON syntax error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("JSON syntax error: {message}")]
#[diagnostic(code(mathdb::json::syntax))]
pub struct JsonSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying error message
    message: String,
}

impl JsonSyntaxError {
    /// Create a syntax error from a serde_json error
    pub fn from_serde_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        let offset = line_col_to_offset(source, err.line().max(1), err.column().max(1));
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Generic JSON file error wrapper
#[derive(Debug, Error, Diagnostic)]
pub enum JsonError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] JsonSyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse JSON text, turning failures into a source-annotated diagnostic
pub fn parse_with_diagnostics(source: &str, filename: &str) -> Result<serde_json::Value, JsonError> {
    serde_json::from_str(source)
        .map_err(|e| JsonError::Syntax(JsonSyntaxError::from_serde_error(&e, source, filename)))
}

/// Read and parse a JSON file with diagnostics
pub fn read_with_diagnostics(path: &std::path::Path) -> Result<serde_json::Value, JsonError> {
    let source = std::fs::read_to_string(path)?;
    parse_with_diagnostics(&source, &path.display().to_string())
}

/// Convert a 1-based line/column to a byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (n, text) in source.split_inclusive('\n').enumerate() {
        if n + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            return (line_start + within).min(source.len().saturating_sub(1));
        }
        line_start += text.len();
    }
    source.len().saturating_sub(1)
}

/// Suggestions for the mistakes hand-edited JSON usually contains
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("trailing comma") {
        return Some("JSON does not allow a comma after the last item of an object or array.".to_string());
    }

    if msg_lower.contains("key must be a string") {
        return Some("Object keys must be double-quoted: {\"name\": ...}".to_string());
    }

    if msg_lower.contains("eof while parsing") {
        return Some("The file ends early - check for a missing closing '}' or ']'.".to_string());
    }

    if msg_lower.contains("control character") {
        return Some("Newlines and tabs inside strings must be escaped as \\n and \\t.".to_string());
    }

    if msg_lower.contains("invalid escape") {
        return Some("Backslashes in strings (e.g. LaTeX) must be doubled: \"\\\\frac\".".to_string());
    }

    None
}
