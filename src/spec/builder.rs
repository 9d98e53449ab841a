//! Fluent builder methods for Specification.
//!
//! Every method consumes the specification and hands it back, so calls chain with
//! `?`. Clause arguments are validated here, at the call site; the table name is
//! only checked when the specification is compiled.

use serde::{Deserialize, Serialize};

use super::{
    CommonTableExpression, FromSubquery, ParamValue, SpecData, Specification, UnionMember,
};
use crate::error::{SpecError, SpecResult, ensure_not_blank};

/// Join keyword prefixed to a join fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

fn append(target: &mut String, separator: &str, clause: &str) {
    if target.is_empty() {
        target.push_str(clause);
    } else {
        target.push_str(separator);
        target.push_str(clause);
    }
}

impl<T> Specification<T> {
    pub fn set_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.data.table_name = table_name.into();
        self
    }

    pub fn set_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.data.primary_key = primary_key.into();
        self
    }

    /// Replace the projection list. An unset projection compiles to `*`.
    pub fn set_select(mut self, clause: impl AsRef<str>) -> SpecResult<Self> {
        let clause = clause.as_ref();
        ensure_not_blank(clause, "clause")?;
        self.data.select_clause = clause.to_string();
        Ok(self)
    }

    pub fn set_distinct(mut self) -> Self {
        self.data.distinct = true;
        self
    }

    /// Append a predicate with `AND`.
    pub fn add_where(mut self, clause: impl AsRef<str>) -> SpecResult<Self> {
        let clause = clause.as_ref();
        ensure_not_blank(clause, "clause")?;
        append(&mut self.data.where_clause, " AND ", clause);
        Ok(self)
    }

    /// Append a predicate with `AND` and merge the named fields of `params`.
    pub fn add_where_with<P: Serialize + ?Sized>(
        self,
        clause: impl AsRef<str>,
        params: &P,
    ) -> SpecResult<Self> {
        let mut spec = self.add_where(clause)?;
        spec.data.parameters.merge_object(params)?;
        Ok(spec)
    }

    /// Append a predicate with `OR`. No parentheses are added.
    pub fn add_where_or(mut self, clause: impl AsRef<str>) -> SpecResult<Self> {
        let clause = clause.as_ref();
        ensure_not_blank(clause, "clause")?;
        append(&mut self.data.where_clause, " OR ", clause);
        Ok(self)
    }

    pub fn add_where_or_with<P: Serialize + ?Sized>(
        self,
        clause: impl AsRef<str>,
        params: &P,
    ) -> SpecResult<Self> {
        let mut spec = self.add_where_or(clause)?;
        spec.data.parameters.merge_object(params)?;
        Ok(spec)
    }

    /// Append `" {KIND} JOIN {clause}"` to the join fragment.
    pub fn add_join(mut self, kind: JoinKind, clause: impl AsRef<str>) -> SpecResult<Self> {
        let clause = clause.as_ref();
        ensure_not_blank(clause, "clause")?;
        self.data.join_clause.push(' ');
        self.data.join_clause.push_str(kind.keyword());
        self.data.join_clause.push(' ');
        self.data.join_clause.push_str(clause);
        Ok(self)
    }

    /// Append a complete join fragment, keyword included.
    pub fn add_raw_join(mut self, clause: impl AsRef<str>) -> SpecResult<Self> {
        let clause = clause.as_ref();
        ensure_not_blank(clause, "clause")?;
        self.data.join_clause.push(' ');
        self.data.join_clause.push_str(clause);
        Ok(self)
    }

    pub fn add_inner_join(self, clause: impl AsRef<str>) -> SpecResult<Self> {
        self.add_join(JoinKind::Inner, clause)
    }

    pub fn add_left_join(self, clause: impl AsRef<str>) -> SpecResult<Self> {
        self.add_join(JoinKind::Left, clause)
    }

    pub fn add_right_join(self, clause: impl AsRef<str>) -> SpecResult<Self> {
        self.add_join(JoinKind::Right, clause)
    }

    pub fn add_full_join(self, clause: impl AsRef<str>) -> SpecResult<Self> {
        self.add_join(JoinKind::Full, clause)
    }

    pub fn add_cross_join(self, clause: impl AsRef<str>) -> SpecResult<Self> {
        self.add_join(JoinKind::Cross, clause)
    }

    pub fn add_group_by(mut self, clause: impl AsRef<str>) -> SpecResult<Self> {
        let clause = clause.as_ref();
        ensure_not_blank(clause, "clause")?;
        append(&mut self.data.group_by, ", ", clause);
        Ok(self)
    }

    pub fn add_having(mut self, clause: impl AsRef<str>) -> SpecResult<Self> {
        let clause = clause.as_ref();
        ensure_not_blank(clause, "clause")?;
        append(&mut self.data.having, " AND ", clause);
        Ok(self)
    }

    pub fn add_having_with<P: Serialize + ?Sized>(
        self,
        clause: impl AsRef<str>,
        params: &P,
    ) -> SpecResult<Self> {
        let mut spec = self.add_having(clause)?;
        spec.data.parameters.merge_object(params)?;
        Ok(spec)
    }

    pub fn add_order(mut self, clause: impl AsRef<str>) -> SpecResult<Self> {
        let clause = clause.as_ref();
        ensure_not_blank(clause, "clause")?;
        append(&mut self.data.order_by, ", ", clause);
        Ok(self)
    }

    /// Page the result. `skip` must be non-negative and `take` positive.
    pub fn set_paging(mut self, skip: i64, take: i64) -> SpecResult<Self> {
        if skip < 0 {
            return Err(SpecError::out_of_range("skip", skip, "must be non-negative"));
        }
        if take <= 0 {
            return Err(SpecError::out_of_range("take", take, "must be positive"));
        }
        self.data.skip = Some(skip as u64);
        self.data.take = Some(take as u64);
        Ok(self)
    }

    /// Set one named parameter directly.
    pub fn with_param(
        mut self,
        name: impl AsRef<str>,
        value: impl Into<ParamValue>,
    ) -> SpecResult<Self> {
        self.data.parameters.add(name, value)?;
        Ok(self)
    }

    /// Merge the named fields of `params` without touching any clause.
    pub fn with_params<P: Serialize + ?Sized>(mut self, params: &P) -> SpecResult<Self> {
        self.data.parameters.merge_object(params)?;
        Ok(self)
    }

    /// Combine with `UNION`.
    pub fn add_union(self, specification: Specification<T>) -> SpecResult<Self> {
        self.push_union(specification.into_data(), false)
    }

    /// Combine with `UNION ALL`.
    pub fn add_union_all(self, specification: Specification<T>) -> SpecResult<Self> {
        self.push_union(specification.into_data(), true)
    }

    /// Members are rebuilt from SELECT through HAVING only, so their own unions,
    /// ORDER BY and paging never reach the compiled SQL.
    fn push_union(mut self, query: SpecData, all: bool) -> SpecResult<Self> {
        self.data.unions.push(UnionMember { query, all });
        Ok(self)
    }

    /// Read from `(subquery) alias` instead of the table name.
    pub fn set_from_subquery<U>(
        mut self,
        subquery: Specification<U>,
        alias: impl AsRef<str>,
    ) -> SpecResult<Self> {
        let alias = alias.as_ref();
        ensure_not_blank(alias, "alias")?;
        self.data.from_subquery = Some(Box::new(FromSubquery {
            query: subquery.into_data(),
            alias: alias.to_string(),
        }));
        Ok(self)
    }

    /// Add `name AS (specification)` to the `WITH` list. Order is preserved.
    pub fn add_common_table_expression<U>(
        mut self,
        name: impl AsRef<str>,
        specification: Specification<U>,
    ) -> SpecResult<Self> {
        let name = name.as_ref();
        ensure_not_blank(name, "name")?;
        self.data.ctes.push(CommonTableExpression {
            name: name.to_string(),
            query: specification.into_data(),
        });
        Ok(self)
    }
}
