//! Reference strings pointing at other entities
//!
//! A reference is a field value starting with `#`:
//! - `#key` searches every table for an entity whose short_name or id is `key`
//! - `#table/key` searches only `table`

use std::fmt;

/// The sigil that marks a reference string
pub const SIGIL: char = '#';

/// A parsed reference string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// `#key` - short_name or numeric id, searched across all tables
    Bare(String),
    /// `#table/key` - searched within a single table
    Qualified { table: String, key: String },
}

impl Reference {
    /// Parse a field value as a reference
    ///
    /// Returns `None` if the value is not a reference (no sigil, empty key,
    /// or whitespace inside the reference).
    pub fn parse(value: &str) -> Option<Self> {
        let body = value.trim().strip_prefix(SIGIL)?;
        if body.is_empty() || body.chars().any(char::is_whitespace) {
            return None;
        }

        match body.split_once('/') {
            Some((table, key)) => {
                if table.is_empty() || key.is_empty() {
                    return None;
                }
                Some(Reference::Qualified {
                    table: table.to_string(),
                    key: key.to_string(),
                })
            }
            None => Some(Reference::Bare(body.to_string())),
        }
    }

    /// Build a qualified reference
    pub fn qualified(table: impl Into<String>, key: impl Into<String>) -> Self {
        Reference::Qualified {
            table: table.into(),
            key: key.into(),
        }
    }

    /// The key part (short_name or id)
    pub fn key(&self) -> &str {
        match self {
            Reference::Bare(key) => key,
            Reference::Qualified { key, .. } => key,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Bare(key) => write!(f, "{}{}", SIGIL, key),
            Reference::Qualified { table, key } => write!(f, "{}{}/{}", SIGIL, table, key),
        }
    }
}

/// Find `#...` hashtag references embedded in free text
///
/// Returns `(byte_range, reference)` pairs in order. A hashtag must start
/// the text or follow a character that is not alphanumeric, `&` or `#`
/// (so HTML entities like `&#39;` and Markdown headings are left alone).
pub fn find_hashtags(text: &str) -> Vec<(std::ops::Range<usize>, Reference)> {
    let mut found = Vec::new();
    let mut prev: Option<char> = None;
    let mut iter = text.char_indices().peekable();

    while let Some((start, c)) = iter.next() {
        let boundary = prev.map_or(true, |p| !(p.is_alphanumeric() || p == '&' || p == SIGIL));
        prev = Some(c);
        if c != SIGIL || !boundary {
            continue;
        }

        let mut end = start + c.len_utf8();
        while let Some(&(i, next)) = iter.peek() {
            if is_hashtag_char(next) {
                end = i + next.len_utf8();
                prev = Some(next);
                iter.next();
            } else {
                break;
            }
        }

        // Trailing punctuation belongs to the sentence, not the reference
        let mut candidate = &text[start..end];
        while candidate.ends_with(['.', '/', '-']) {
            candidate = &candidate[..candidate.len() - 1];
        }
        if let Some(reference) = Reference::parse(candidate) {
            found.push((start..start + candidate.len(), reference));
        }
    }

    found
}

fn is_hashtag_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '/' | '.')
}
