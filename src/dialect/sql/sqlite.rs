use crate::dialect::traits::{SqlGenerator, quote_with, unquote_with};
use crate::error::SpecResult;

pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn limit_offset(&self, skip: u64, take: u64) -> String {
        format!(" LIMIT {} OFFSET {}", take, skip)
    }

    fn exists_wrapper(&self, inner: &str) -> String {
        format!("SELECT EXISTS ({})", inner)
    }

    fn bool_literal(&self, val: bool) -> &'static str {
        if val { "1" } else { "0" }
    }

    fn quote_identifier(&self, name: &str) -> SpecResult<String> {
        quote_with(name, '"', '"')
    }

    fn unquote_identifier(&self, quoted: &str) -> Option<String> {
        unquote_with(quoted, '"', '"')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}
