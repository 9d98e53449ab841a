//! SQL dialects.
//!
//! Each [`Dialect`] resolves to a stateless [`SqlGenerator`] held in a `static`,
//! so dialects are `Copy` and can be shared across threads without ceremony.
//!
//! | Dialect    | Pagination                                 | Exists                       | Bool         | Quote    |
//! |------------|--------------------------------------------|------------------------------|--------------|----------|
//! | SQL Server | `OFFSET s ROWS FETCH NEXT t ROWS ONLY`     | `SELECT CASE WHEN EXISTS ..` | `1`/`0`      | `[x]`    |
//! | PostgreSQL | `LIMIT t OFFSET s`                         | `SELECT CASE WHEN EXISTS ..` | `TRUE`/`FALSE` | `"x"`  |
//! | MySQL      | `LIMIT s, t`                               | `SELECT EXISTS (..)`         | `1`/`0`      | `` `x` `` |
//! | SQLite     | `LIMIT t OFFSET s`                         | `SELECT EXISTS (..)`         | `1`/`0`      | `"x"`    |

pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use sql::mysql::MysqlGenerator;
use sql::postgres::PostgresGenerator;
use sql::sqlite::SqliteGenerator;
use sql::sqlserver::SqlServerGenerator;
pub use traits::SqlGenerator;

static SQL_SERVER: SqlServerGenerator = SqlServerGenerator;
static POSTGRES: PostgresGenerator = PostgresGenerator;
static MYSQL: MysqlGenerator = MysqlGenerator;
static SQLITE: SqliteGenerator = SqliteGenerator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "sqlserver", alias = "mssql")]
    SqlServer,
    #[default]
    #[serde(rename = "postgresql", alias = "postgres", alias = "pg")]
    PostgreSql,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "sqlite", alias = "sqlite3")]
    Sqlite,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::SqlServer,
        Dialect::PostgreSql,
        Dialect::MySql,
        Dialect::Sqlite,
    ];

    pub fn generator(&self) -> &'static dyn SqlGenerator {
        match self {
            Dialect::SqlServer => &SQL_SERVER,
            Dialect::PostgreSql => &POSTGRES,
            Dialect::MySql => &MYSQL,
            Dialect::Sqlite => &SQLITE,
        }
    }

    pub fn name(&self) -> &'static str {
        self.generator().name()
    }

    pub fn limit_offset(&self, skip: u64, take: u64) -> String {
        self.generator().limit_offset(skip, take)
    }

    pub fn exists_wrapper(&self, inner: &str) -> String {
        self.generator().exists_wrapper(inner)
    }

    pub fn bool_literal(&self, val: bool) -> &'static str {
        self.generator().bool_literal(val)
    }

    pub fn quote_identifier(&self, name: &str) -> SpecResult<String> {
        self.generator().quote_identifier(name)
    }

    pub fn unquote_identifier(&self, quoted: &str) -> Option<String> {
        self.generator().unquote_identifier(quoted)
    }

    pub fn parameter_prefix(&self) -> char {
        self.generator().parameter_prefix()
    }

    /// Guess the dialect from a connection URL scheme.
    ///
    /// ```
    /// use qspec::Dialect;
    ///
    /// assert_eq!(Dialect::from_url("postgres://localhost/shop"), Some(Dialect::PostgreSql));
    /// assert_eq!(Dialect::from_url("sqlite::memory:"), Some(Dialect::Sqlite));
    /// ```
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split(':').next()?.to_ascii_lowercase();
        match scheme.as_str() {
            "postgres" | "postgresql" => Some(Dialect::PostgreSql),
            "mysql" | "mariadb" => Some(Dialect::MySql),
            "sqlite" => Some(Dialect::Sqlite),
            "mssql" | "sqlserver" => Some(Dialect::SqlServer),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" | "tsql" => Ok(Dialect::SqlServer),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSql),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(SpecError::invalid(
                "dialect",
                format!(
                    "unknown dialect '{}'. Expected: sqlserver, postgresql, mysql, or sqlite",
                    other
                ),
            )),
        }
    }
}
