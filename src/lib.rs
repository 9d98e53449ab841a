//! # qspec
//!
//! Declarative query specifications compiled to SQL for several dialects.
//!
//! A [`Specification`] collects the pieces of a SELECT (table, projection, joins,
//! filters, grouping, ordering, paging, unions, subqueries and CTEs) together with
//! named parameters. The evaluator turns it into SQL text for SQL Server,
//! PostgreSQL, MySQL or SQLite.
//!
//! ## Quick Example
//!
//! ```
//! use qspec::prelude::*;
//!
//! let spec = Specification::<Row>::new("orders")
//!     .add_where("status = @Status")?
//!     .with_param("Status", "open")?
//!     .add_order("created_at DESC")?
//!     .set_paging(20, 10)?;
//!
//! let query = spec.to_sql(Dialect::SqlServer)?;
//! assert_eq!(
//!     query.sql,
//!     "SELECT * FROM orders WHERE status = @Status ORDER BY created_at DESC \
//!      OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
//! );
//!
//! let count = spec.to_count_sql(Dialect::SqlServer)?;
//! assert_eq!(count.sql, "SELECT COUNT(*) FROM orders WHERE status = @Status");
//! # Ok::<(), qspec::SpecError>(())
//! ```
//!
//! ## Dialects
//!
//! | Dialect    | Paging                              | Quoting  |
//! |------------|-------------------------------------|----------|
//! | SQL Server | `OFFSET n ROWS FETCH NEXT m ROWS ONLY` | `[name]` |
//! | PostgreSQL | `LIMIT m OFFSET n`                  | `"name"` |
//! | MySQL      | `LIMIT n, m`                        | `` `name` `` |
//! | SQLite     | `LIMIT m OFFSET n`                  | `"name"` |

pub mod bind;
pub mod config;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod spec;

pub use dialect::{Dialect, SqlGenerator};
pub use error::{SpecError, SpecResult};
pub use evaluator::{Compile, CompileMode, CompiledQuery, compile};
pub use spec::{Entity, JoinKind, ParamValue, Parameters, Row, SpecData, Specification};

pub mod prelude {
    pub use crate::config::QspecConfig;
    pub use crate::dialect::Dialect;
    pub use crate::engine::SpecDb;
    pub use crate::error::*;
    pub use crate::evaluator::{Compile, CompileMode, CompiledQuery};
    pub use crate::spec::{Entity, JoinKind, ParamValue, Parameters, Row, Specification};
}
