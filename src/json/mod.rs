//! JSON helpers - error diagnostics for data files

pub mod diagnostics;

pub use diagnostics::{JsonError, JsonSyntaxError};
