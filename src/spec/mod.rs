//! Query specifications.
//!
//! A [`Specification`] accumulates the structural fragments of one SELECT query.
//! Fragments are opaque strings; the builder only takes care of separators.
//!
//! ```
//! use qspec::prelude::*;
//!
//! let spec = Specification::<qspec::Row>::new("products")
//!     .add_where("price > @MinPrice")?
//!     .with_param("MinPrice", 100)?
//!     .add_order("price DESC")?
//!     .set_paging(0, 10)?;
//!
//! let query = spec.to_sql(Dialect::PostgreSql)?;
//! assert_eq!(
//!     query.sql,
//!     "SELECT * FROM products WHERE price > @MinPrice ORDER BY price DESC LIMIT 10 OFFSET 0"
//! );
//! # Ok::<(), qspec::SpecError>(())
//! ```

mod builder;
pub mod params;

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{SpecError, SpecResult, ensure_not_blank};

pub use builder::JoinKind;
pub use params::{ParamValue, Parameters};

/// Default row type: a JSON object keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Types that know which table they are read from.
pub trait Entity {
    const TABLE_NAME: &'static str;
    const PRIMARY_KEY: &'static str = "";
}

/// Clause state of one query, independent of its row type.
///
/// Nested queries (union members, FROM subqueries, CTEs) are stored in this form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecData {
    /// Table, optionally with an alias (`"products p"`).
    pub table_name: String,
    /// Informational only.
    pub primary_key: String,
    pub select_clause: String,
    pub distinct: bool,
    /// Join fragments, each starting with a space and its join keyword.
    pub join_clause: String,
    pub where_clause: String,
    pub group_by: String,
    pub having: String,
    pub order_by: String,
    pub skip: Option<u64>,
    pub take: Option<u64>,
    pub parameters: Parameters,
    pub unions: Vec<UnionMember>,
    pub from_subquery: Option<Box<FromSubquery>>,
    pub ctes: Vec<CommonTableExpression>,
}

impl SpecData {
    /// Paging bounds, when both are set.
    pub fn paging(&self) -> Option<(u64, u64)> {
        Some((self.skip?, self.take?))
    }

    /// Apply the builder's argument rules to clause state that did not come from the
    /// builder (deserialized files, [`Specification::from_data`]). Nested queries are
    /// checked too. The table name is left to compilation.
    pub fn validate(&self) -> SpecResult<()> {
        for fragment in [
            &self.select_clause,
            &self.join_clause,
            &self.where_clause,
            &self.group_by,
            &self.having,
            &self.order_by,
        ] {
            if !fragment.is_empty() {
                ensure_not_blank(fragment, "clause")?;
            }
        }

        match (self.skip, self.take) {
            (Some(skip), Some(take)) => {
                if take == 0 {
                    return Err(SpecError::out_of_range("take", 0, "must be positive"));
                }
                if i64::try_from(skip).is_err() {
                    return Err(SpecError::out_of_range("skip", i64::MAX, "too large"));
                }
                if i64::try_from(take).is_err() {
                    return Err(SpecError::out_of_range("take", i64::MAX, "too large"));
                }
            }
            (None, None) => {}
            (Some(_), None) => return Err(SpecError::invalid("take", "skip is set without take")),
            (None, Some(_)) => return Err(SpecError::invalid("skip", "take is set without skip")),
        }

        for member in &self.unions {
            member.query.validate()?;
        }
        if let Some(sub) = &self.from_subquery {
            ensure_not_blank(&sub.alias, "alias")?;
            sub.query.validate()?;
        }
        for cte in &self.ctes {
            ensure_not_blank(&cte.name, "name")?;
            cte.query.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionMember {
    pub query: SpecData,
    /// `UNION ALL` rather than `UNION`.
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromSubquery {
    pub query: SpecData,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpression {
    pub name: String,
    pub query: SpecData,
}

/// A declarative description of one query returning rows of type `T`.
///
/// `T` only matters at the execution boundary; compilation never looks at it.
///
/// WHERE fragments are joined with bare `AND`/`OR` in the order they were added and
/// are never parenthesized, so `a`, `OR b`, `AND c` yields `a OR b AND c`, which SQL
/// reads as `a OR (b AND c)`. Put parentheses inside the fragment when a different
/// grouping is meant.
#[derive(Serialize)]
#[serde(transparent, bound = "")]
pub struct Specification<T = Row> {
    data: SpecData,
    #[serde(skip)]
    _row: PhantomData<fn() -> T>,
}

impl<T> Specification<T> {
    /// Start a specification for `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self::from_data(SpecData {
            table_name: table_name.into(),
            ..SpecData::default()
        })
    }

    pub fn from_data(data: SpecData) -> Self {
        Self {
            data,
            _row: PhantomData,
        }
    }

    /// Read-only view of the accumulated clauses.
    pub fn data(&self) -> &SpecData {
        &self.data
    }

    pub fn into_data(self) -> SpecData {
        self.data
    }

    /// Reinterpret the rows produced by this specification as `U`.
    pub fn cast<U>(self) -> Specification<U> {
        Specification::from_data(self.data)
    }

    pub fn table_name(&self) -> &str {
        &self.data.table_name
    }

    pub fn primary_key(&self) -> &str {
        &self.data.primary_key
    }

    pub fn select_clause(&self) -> &str {
        &self.data.select_clause
    }

    pub fn is_distinct(&self) -> bool {
        self.data.distinct
    }

    pub fn join_clause(&self) -> &str {
        &self.data.join_clause
    }

    pub fn where_clause(&self) -> &str {
        &self.data.where_clause
    }

    pub fn group_by(&self) -> &str {
        &self.data.group_by
    }

    pub fn having(&self) -> &str {
        &self.data.having
    }

    pub fn order_by(&self) -> &str {
        &self.data.order_by
    }

    pub fn skip(&self) -> Option<u64> {
        self.data.skip
    }

    pub fn take(&self) -> Option<u64> {
        self.data.take
    }

    pub fn parameters(&self) -> &Parameters {
        &self.data.parameters
    }

    pub fn unions(&self) -> &[UnionMember] {
        &self.data.unions
    }

    pub fn from_subquery(&self) -> Option<&FromSubquery> {
        self.data.from_subquery.as_deref()
    }

    pub fn common_table_expressions(&self) -> &[CommonTableExpression] {
        &self.data.ctes
    }
}

impl<T: Entity> Specification<T> {
    /// Start a specification for the entity's table.
    pub fn for_entity() -> Self {
        Self::new(T::TABLE_NAME).set_primary_key(T::PRIMARY_KEY)
    }
}

impl<T> Default for Specification<T> {
    fn default() -> Self {
        Self::from_data(SpecData::default())
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Self::from_data(self.data.clone())
    }
}

impl<T> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("row", &std::any::type_name::<T>())
            .field("data", &self.data)
            .finish()
    }
}

impl<T> PartialEq for Specification<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<'de, T> Deserialize<'de> for Specification<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = SpecData::deserialize(deserializer)?;
        data.validate().map_err(serde::de::Error::custom)?;
        Ok(Self::from_data(data))
    }
}

impl<T> From<SpecData> for Specification<T> {
    fn from(data: SpecData) -> Self {
        Self::from_data(data)
    }
}
