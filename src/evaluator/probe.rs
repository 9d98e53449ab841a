//! COUNT and EXISTS generation.
//!
//! Both read the base table with its joins and WHERE only. GROUP BY and HAVING are
//! ignored, so counting a grouped specification counts filtered base rows rather
//! than groups.

use super::CompiledQuery;
use crate::dialect::Dialect;
use crate::error::SpecResult;
use crate::spec::SpecData;

pub(crate) fn build_count(spec: &SpecData) -> SpecResult<CompiledQuery> {
    super::ensure_table(spec)?;
    let mut sql = format!("SELECT COUNT(*) FROM {}", spec.table_name);
    super::push_filters(&mut sql, spec);
    Ok(CompiledQuery {
        sql,
        params: spec.parameters.clone(),
    })
}

pub(crate) fn build_exists(spec: &SpecData, dialect: Dialect) -> SpecResult<CompiledQuery> {
    super::ensure_table(spec)?;
    let mut inner = format!("SELECT 1 FROM {}", spec.table_name);
    super::push_filters(&mut inner, spec);
    Ok(CompiledQuery {
        sql: dialect.exists_wrapper(&inner),
        params: spec.parameters.clone(),
    })
}
