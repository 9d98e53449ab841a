use crate::dialect::traits::{SqlGenerator, quote_with, unquote_with};
use crate::error::SpecResult;

pub struct SqlServerGenerator;

impl SqlGenerator for SqlServerGenerator {
    fn name(&self) -> &'static str {
        "SQLServer"
    }

    fn limit_offset(&self, skip: u64, take: u64) -> String {
        // T-SQL only accepts OFFSET/FETCH after an ORDER BY; the caller supplies it.
        format!(" OFFSET {} ROWS FETCH NEXT {} ROWS ONLY", skip, take)
    }

    fn exists_wrapper(&self, inner: &str) -> String {
        format!("SELECT CASE WHEN EXISTS ({}) THEN 1 ELSE 0 END", inner)
    }

    fn bool_literal(&self, val: bool) -> &'static str {
        if val { "1" } else { "0" }
    }

    fn quote_identifier(&self, name: &str) -> SpecResult<String> {
        quote_with(name, '[', ']')
    }

    fn unquote_identifier(&self, quoted: &str) -> Option<String> {
        unquote_with(quoted, '[', ']')
    }

    fn placeholder(&self, index: usize) -> String {
        format!("@p{}", index)
    }

    fn reuses_placeholders(&self) -> bool {
        true
    }
}
