//! Minimal BibTeX reader for the site bibliography

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::path::Path;
use std::str::CharIndices;

use serde::Serialize;
use thiserror::Error;

/// One `@type{key, field = value, ...}` entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BibEntry {
    pub entry_type: String,
    pub key: String,
    pub fields: BTreeMap<String, String>,
}

impl BibEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BibliographyError {
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("BibTeX syntax error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },
}

/// Read and parse a `.bib` file, sorted by author then year
pub fn load_bibliography(path: &Path) -> Result<Vec<BibEntry>, BibliographyError> {
    let source = std::fs::read_to_string(path).map_err(|e| BibliographyError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let mut entries = parse_bibtex(&source)?;
    sort_entries(&mut entries);
    Ok(entries)
}

pub fn sort_entries(entries: &mut [BibEntry]) {
    entries.sort_by_cached_key(|e| {
        (
            e.field("author").unwrap_or_default().to_lowercase(),
            e.field("year").unwrap_or_default().to_string(),
            e.key.clone(),
        )
    });
}

/// Parse BibTeX source
///
/// Text outside entries is ignored, as are `@comment`, `@preamble` and
/// `@string` blocks (string macros are not expanded). Field names are
/// lower-cased; braces inside values are dropped and whitespace collapsed.
pub fn parse_bibtex(source: &str) -> Result<Vec<BibEntry>, BibliographyError> {
    let mut parser = BibParser {
        source,
        chars: source.char_indices().peekable(),
    };
    let mut entries = Vec::new();

    while parser.skip_to('@') {
        let entry_type = parser.word().to_lowercase();
        parser.skip_whitespace();
        let close = match parser.next() {
            Some('{') => '}',
            Some('(') => ')',
            _ => return Err(parser.error("expected '{' or '(' after entry type")),
        };

        if matches!(entry_type.as_str(), "comment" | "preamble" | "string") {
            parser.skip_block(close)?;
            continue;
        }

        parser.skip_whitespace();
        let key = parser.take_until(|c| c == ',' || c == close).trim().to_string();
        let mut fields = BTreeMap::new();

        loop {
            parser.skip_whitespace_and(',');
            match parser.peek() {
                None => return Err(parser.error("unterminated entry")),
                Some(c) if c == close => {
                    parser.next();
                    break;
                }
                _ => {}
            }
            let name = parser.take_until(|c| c == '=' || c == close).trim().to_lowercase();
            if parser.next() != Some('=') {
                return Err(parser.error(&format!("field '{}' has no value", name)));
            }
            let value = parser.value(close)?;
            fields.insert(name, value);
        }

        entries.push(BibEntry {
            entry_type,
            key,
            fields,
        });
    }

    Ok(entries)
}

struct BibParser<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> BibParser<'a> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn next(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    fn error(&mut self, message: &str) -> BibliographyError {
        BibliographyError::Parse {
            offset: self.offset(),
            message: message.to_string(),
        }
    }

    /// Advance past the next `target`; false at end of input
    fn skip_to(&mut self, target: char) -> bool {
        while let Some(c) = self.next() {
            if c == target {
                return true;
            }
        }
        false
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next();
        }
    }

    fn skip_whitespace_and(&mut self, extra: char) {
        while self.peek().is_some_and(|c| c.is_whitespace() || c == extra) {
            self.next();
        }
    }

    fn word(&mut self) -> &'a str {
        let start = self.offset();
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.next();
        }
        let end = self.offset();
        &self.source[start..end]
    }

    fn take_until(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        let start = self.offset();
        while self.peek().is_some_and(|c| !stop(c)) {
            self.next();
        }
        let end = self.offset();
        &self.source[start..end]
    }

    /// Skip a block whose opening delimiter was consumed
    fn skip_block(&mut self, close: char) -> Result<(), BibliographyError> {
        let mut depth = 0usize;
        while let Some(c) = self.next() {
            match c {
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                c if c == close && depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error("unterminated block"))
    }

    /// Text up to the brace matching one already consumed
    fn braced(&mut self) -> Result<String, BibliographyError> {
        let mut depth = 0usize;
        let mut out = String::new();
        while let Some(c) = self.next() {
            match c {
                '{' => depth += 1,
                '}' if depth == 0 => return Ok(out),
                '}' => depth -= 1,
                c => out.push(c),
            }
        }
        Err(self.error("unterminated '{'"))
    }

    fn quoted(&mut self) -> Result<String, BibliographyError> {
        let mut depth = 0usize;
        let mut out = String::new();
        while let Some(c) = self.next() {
            match c {
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                '"' if depth == 0 => return Ok(out),
                c => out.push(c),
            }
        }
        Err(self.error("unterminated '\"'"))
    }

    /// A field value: `{...}`, `"..."` or a bare word, joined with `#`
    fn value(&mut self, close: char) -> Result<String, BibliographyError> {
        let mut out = String::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('{') => {
                    self.next();
                    out.push_str(&self.braced()?);
                }
                Some('"') => {
                    self.next();
                    out.push_str(&self.quoted()?);
                }
                Some(_) => {
                    let word = self.take_until(|c| c == ',' || c == '#' || c == close || c.is_whitespace());
                    out.push_str(word);
                }
                None => return Err(self.error("unterminated value")),
            }
            self.skip_whitespace();
            if self.peek() == Some('#') {
                self.next();
            } else {
                break;
            }
        }
        Ok(out.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIB: &str = r#"
% references
@comment{ ignored {nested} }
@book{gauss1801,
  author = {Gauss, Carl Friedrich},
  title = "Disquisitiones {Arithmeticae}",
  year = 1801,
}
@article{euler1748,
  Author = {Euler, Leonhard},
  Title  = {Introductio in analysin
            infinitorum},
  Year   = {1748}
}
"#;

    #[test]
    fn test_parse_entries() {
        let entries = parse_bibtex(BIB).unwrap();
        assert_eq!(entries.len(), 2);

        let gauss = &entries[0];
        assert_eq!(gauss.entry_type, "book");
        assert_eq!(gauss.key, "gauss1801");
        assert_eq!(gauss.field("title"), Some("Disquisitiones Arithmeticae"));
        assert_eq!(gauss.field("year"), Some("1801"));

        let euler = &entries[1];
        assert_eq!(euler.field("title"), Some("Introductio in analysin infinitorum"));
    }

    #[test]
    fn test_sorted_by_author_then_year() {
        let mut entries = parse_bibtex(BIB).unwrap();
        sort_entries(&mut entries);
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["euler1748", "gauss1801"]);
    }

    #[test]
    fn test_unterminated_entry_is_an_error() {
        let err = parse_bibtex("@book{x, title = {open").unwrap_err();
        assert!(matches!(err, BibliographyError::Parse { .. }));
    }
}
