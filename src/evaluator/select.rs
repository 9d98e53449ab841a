//! SELECT SQL generation (normal mode).

use tracing::trace;

use super::CompiledQuery;
use crate::dialect::Dialect;
use crate::error::{SpecError, SpecResult};
use crate::spec::{CommonTableExpression, Parameters, SpecData};

pub(crate) fn build_select(spec: &SpecData, dialect: Dialect) -> SpecResult<CompiledQuery> {
    super::ensure_table(spec)?;
    let generator = dialect.generator();
    let mut params = spec.parameters.clone();

    // WITH a AS (...), b AS (...)
    let mut sql = build_cte_prefix(spec, dialect, &mut params)?;

    push_core(&mut sql, spec, dialect, &mut params)?;

    // Members are reduced rebuilds: their ORDER BY and paging are never emitted.
    for member in &spec.unions {
        super::ensure_table(&member.query)?;
        sql.push_str(if member.all { " UNION ALL " } else { " UNION " });
        params.merge_nested(&member.query.parameters)?;
        push_core(&mut sql, &member.query, dialect, &mut params)?;
    }

    // Applies to the combined result when unions are present.
    if !spec.order_by.trim().is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&spec.order_by);
    }

    if let Some((skip, take)) = spec.paging() {
        sql.push_str(&generator.limit_offset(skip, take));
    }

    Ok(CompiledQuery { sql, params })
}

/// CTEs of the query followed by CTEs hoisted from its union members.
///
/// A name already emitted with an identical body is skipped, so branches can share
/// a CTE. The same name with a different body is rejected.
fn build_cte_prefix(
    spec: &SpecData,
    dialect: Dialect,
    params: &mut Parameters,
) -> SpecResult<String> {
    let ctes = spec
        .ctes
        .iter()
        .chain(spec.unions.iter().flat_map(|member| member.query.ctes.iter()));

    let mut emitted: Vec<&CommonTableExpression> = Vec::new();
    let mut parts = Vec::new();
    for cte in ctes {
        if let Some(seen) = emitted.iter().find(|seen| seen.name == cte.name) {
            if seen.query == cte.query {
                trace!(name = %cte.name, "skipping repeated common table expression");
                continue;
            }
            return Err(SpecError::invalid(
                "name",
                format!("common table expression '{}' is defined twice with different queries", cte.name),
            ));
        }

        trace!(name = %cte.name, "compiling common table expression");
        let compiled = build_select(&cte.query, dialect)?;
        params.merge_nested(&compiled.params)?;
        parts.push(format!("{} AS ({})", cte.name, compiled.sql));
        emitted.push(cte);
    }

    if parts.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("WITH {} ", parts.join(", ")))
    }
}

/// SELECT, FROM, JOIN, WHERE, GROUP BY and HAVING.
fn push_core(
    sql: &mut String,
    spec: &SpecData,
    dialect: Dialect,
    params: &mut Parameters,
) -> SpecResult<()> {
    sql.push_str(if spec.distinct { "SELECT DISTINCT " } else { "SELECT " });
    if spec.select_clause.trim().is_empty() {
        sql.push('*');
    } else {
        sql.push_str(&spec.select_clause);
    }

    sql.push_str(" FROM ");
    match &spec.from_subquery {
        Some(sub) => {
            trace!(alias = %sub.alias, "compiling FROM subquery");
            let compiled = build_select(&sub.query, dialect)?;
            params.merge_nested(&compiled.params)?;
            sql.push('(');
            sql.push_str(&compiled.sql);
            sql.push_str(") ");
            sql.push_str(&sub.alias);
        }
        None => sql.push_str(&spec.table_name),
    }

    super::push_filters(sql, spec);

    if !spec.group_by.trim().is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&spec.group_by);
    }

    if !spec.having.trim().is_empty() {
        sql.push_str(" HAVING ");
        sql.push_str(&spec.having);
    }

    Ok(())
}
