//! Dialect trait and shared quoting helpers.

use crate::error::{SpecResult, ensure_not_blank};

/// Wrap `name` in `open`/`close`, doubling every occurrence of `close`.
pub fn quote_with(name: &str, open: char, close: char) -> SpecResult<String> {
    ensure_not_blank(name, "name")?;
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push(open);
    for c in name.chars() {
        if c == close {
            quoted.push(close);
        }
        quoted.push(c);
    }
    quoted.push(close);
    Ok(quoted)
}

/// Inverse of [`quote_with`]. Returns `None` when `quoted` is not a well-formed
/// quoted identifier (missing delimiters or an undoubled closing character).
pub fn unquote_with(quoted: &str, open: char, close: char) -> Option<String> {
    let inner = quoted.strip_prefix(open)?.strip_suffix(close)?;
    let mut name = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == close && chars.next() != Some(close) {
            return None;
        }
        name.push(c);
    }
    Some(name)
}

/// Trait for dialect-specific SQL generation.
///
/// Implementations are stateless unit structs; see [`crate::dialect::Dialect`].
pub trait SqlGenerator: Send + Sync {
    /// Display name of the dialect.
    fn name(&self) -> &'static str;
    /// Pagination fragment, always with a leading space.
    fn limit_offset(&self, skip: u64, take: u64) -> String;
    /// Wrap a `SELECT 1 ...` query into a boolean-producing query.
    fn exists_wrapper(&self, inner: &str) -> String;
    /// Boolean literal for inline use.
    fn bool_literal(&self, val: bool) -> &'static str;
    /// Quote and escape an identifier (table or column name).
    fn quote_identifier(&self, name: &str) -> SpecResult<String>;
    /// Strip quoting produced by [`SqlGenerator::quote_identifier`].
    fn unquote_identifier(&self, quoted: &str) -> Option<String>;
    /// Generate the positional placeholder (e.g., $1, ?, @p1) for a given index.
    fn placeholder(&self, index: usize) -> String;
    /// Whether a repeated named parameter may share one positional slot.
    fn reuses_placeholders(&self) -> bool {
        false
    }
    /// Marker preceding named parameters in generated SQL.
    fn parameter_prefix(&self) -> char {
        '@'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_with_escapes_closing_char() {
        assert_eq!(quote_with("a]b", '[', ']').unwrap(), "[a]]b]");
        assert_eq!(quote_with("a\"b", '"', '"').unwrap(), "\"a\"\"b\"");
    }

    #[test]
    fn test_unquote_rejects_malformed() {
        assert_eq!(unquote_with("[a]]b]", '[', ']').as_deref(), Some("a]b"));
        assert_eq!(unquote_with("[a]b]", '[', ']'), None);
        assert_eq!(unquote_with("plain", '"', '"'), None);
    }

    #[test]
    fn test_quote_rejects_blank() {
        let err = quote_with("  ", '`', '`').unwrap_err();
        assert_eq!(err.param(), Some("name"));
    }
}
