//! Specification compiler.
//!
//! Turns a [`Specification`] plus a [`Dialect`] into SQL text and a flat parameter
//! bag. Compilation is pure: the specification is only read, and compiling the same
//! specification twice yields identical output.
//!
//! Parameters of nested queries (CTEs, FROM subqueries, union members) are merged
//! into the outer bag. A name bound to the same value twice is kept once; a name
//! bound to two different values fails with [`SpecError::ParameterConflict`], since
//! both occurrences would read the same placeholder.

mod probe;
mod select;


use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{SpecError, SpecResult};
use crate::spec::{Parameters, SpecData, Specification};

/// What the compiled query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileMode {
    /// Rows.
    #[default]
    Normal,
    /// A single `COUNT(*)` scalar.
    Count,
    /// A single 0/1 scalar.
    Exists,
}

impl fmt::Display for CompileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompileMode::Normal => "normal",
            CompileMode::Count => "count",
            CompileMode::Exists => "exists",
        })
    }
}

/// SQL text and the parameters it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Parameters,
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Compile `spec` for `dialect`.
///
/// Clause state is checked with [`SpecData::validate`] first, so specifications
/// assembled without the builder are held to the same rules.
pub fn compile(spec: &SpecData, dialect: Dialect, mode: CompileMode) -> SpecResult<CompiledQuery> {
    spec.validate()?;
    let query = match mode {
        CompileMode::Normal => select::build_select(spec, dialect)?,
        CompileMode::Count => probe::build_count(spec)?,
        CompileMode::Exists => probe::build_exists(spec, dialect)?,
    };
    debug!(
        %dialect,
        %mode,
        params = query.params.len(),
        sql = %query.sql,
        "compiled specification"
    );
    Ok(query)
}

/// Trait for compiling query descriptions to SQL.
pub trait Compile {
    fn compile(&self, dialect: Dialect, mode: CompileMode) -> SpecResult<CompiledQuery>;

    fn to_sql(&self, dialect: Dialect) -> SpecResult<CompiledQuery> {
        self.compile(dialect, CompileMode::Normal)
    }

    fn to_count_sql(&self, dialect: Dialect) -> SpecResult<CompiledQuery> {
        self.compile(dialect, CompileMode::Count)
    }

    fn to_exists_sql(&self, dialect: Dialect) -> SpecResult<CompiledQuery> {
        self.compile(dialect, CompileMode::Exists)
    }
}

impl Compile for SpecData {
    fn compile(&self, dialect: Dialect, mode: CompileMode) -> SpecResult<CompiledQuery> {
        compile(self, dialect, mode)
    }
}

impl<T> Compile for Specification<T> {
    fn compile(&self, dialect: Dialect, mode: CompileMode) -> SpecResult<CompiledQuery> {
        compile(self.data(), dialect, mode)
    }
}

fn ensure_table(spec: &SpecData) -> SpecResult<()> {
    if spec.table_name.trim().is_empty() {
        return Err(SpecError::invalid(
            "table_name",
            "specification has no table name",
        ));
    }
    Ok(())
}

/// Join fragment and WHERE, shared by every mode.
fn push_filters(sql: &mut String, spec: &SpecData) {
    if !spec.join_clause.trim().is_empty() {
        if !spec.join_clause.starts_with(char::is_whitespace) {
            sql.push(' ');
        }
        sql.push_str(&spec.join_clause);
    }

    if !spec.where_clause.trim().is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&spec.where_clause);
    }
}
