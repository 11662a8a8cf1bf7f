//! Schema module - table schema documents, registry and submission checks

pub mod coerce;
pub mod model;
pub mod registry;
pub mod validator;

pub use coerce::{coerce_submission, SubmissionError};
pub use model::{title_case, Column, ColumnKind, EnumOption, ReferenceTarget, Schema, SchemaError};
pub use registry::SchemaRegistry;
pub use validator::{SchemaValidator, ValidationIssue};
