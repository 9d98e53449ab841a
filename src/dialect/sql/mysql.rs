use crate::dialect::traits::{SqlGenerator, quote_with, unquote_with};
use crate::error::SpecResult;

/// MySQL Generator.
pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn limit_offset(&self, skip: u64, take: u64) -> String {
        // LIMIT [offset,] row_count
        format!(" LIMIT {}, {}", skip, take)
    }

    fn exists_wrapper(&self, inner: &str) -> String {
        format!("SELECT EXISTS ({})", inner)
    }

    fn bool_literal(&self, val: bool) -> &'static str {
        if val { "1" } else { "0" }
    }

    fn quote_identifier(&self, name: &str) -> SpecResult<String> {
        quote_with(name, '`', '`')
    }

    fn unquote_identifier(&self, quoted: &str) -> Option<String> {
        unquote_with(quoted, '`', '`')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}
