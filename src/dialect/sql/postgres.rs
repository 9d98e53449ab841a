use crate::dialect::traits::{SqlGenerator, quote_with, unquote_with};
use crate::error::SpecResult;

pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn limit_offset(&self, skip: u64, take: u64) -> String {
        format!(" LIMIT {} OFFSET {}", take, skip)
    }

    fn exists_wrapper(&self, inner: &str) -> String {
        format!("SELECT CASE WHEN EXISTS ({}) THEN 1 ELSE 0 END", inner)
    }

    fn bool_literal(&self, val: bool) -> &'static str {
        if val { "TRUE" } else { "FALSE" }
    }

    fn quote_identifier(&self, name: &str) -> SpecResult<String> {
        quote_with(name, '"', '"')
    }

    fn unquote_identifier(&self, quoted: &str) -> Option<String> {
        unquote_with(quoted, '"', '"')
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn reuses_placeholders(&self) -> bool {
        true
    }
}
