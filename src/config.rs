//! qspec configuration
//!
//! Looked up in `./qspec.toml`, then `<config dir>/qspec/config.toml`. Missing files
//! fall back to defaults.
//!
//! ```toml
//! dialect = "sqlite"
//! database_url = "sqlite::memory:"
//! max_connections = 1
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{SpecError, SpecResult};

const LOCAL_FILE: &str = "qspec.toml";

/// Main qspec configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QspecConfig {
    /// Dialect used when compiling without an explicit one
    pub dialect: Dialect,

    /// Database connection URL (optional)
    pub database_url: Option<String>,

    /// Pool size for the execution engine
    pub max_connections: u32,
}

impl Default for QspecConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::PostgreSql,
            database_url: None,
            max_connections: 5,
        }
    }
}

impl QspecConfig {
    /// Create a new configuration builder
    pub fn builder() -> QspecConfigBuilder {
        QspecConfigBuilder::default()
    }

    /// Load the first configuration file found, or defaults.
    pub fn load() -> SpecResult<Self> {
        match Self::search_paths().into_iter().find(|path| path.is_file()) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Candidate files, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("qspec").join("config.toml"));
        }
        paths
    }

    pub fn from_file(path: &Path) -> SpecResult<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading configuration");
        Self::from_toml_str(&content)
            .map_err(|e| SpecError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> SpecResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| SpecError::Config(e.to_string()))?;
        if config.max_connections == 0 {
            return Err(SpecError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Builder for QspecConfig
#[derive(Debug, Default)]
pub struct QspecConfigBuilder {
    config: QspecConfig,
}

impl QspecConfigBuilder {
    /// Set the default dialect
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Set the database URL
    pub fn database(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.config.max_connections = max.max(1);
        self
    }

    /// Build the configuration
    pub fn build(self) -> QspecConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = QspecConfig::default();
        assert_eq!(config.dialect, Dialect::PostgreSql);
        assert_eq!(config.database_url, None);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_parse_partial_file() {
        let config = QspecConfig::from_toml_str("dialect = \"mysql\"").unwrap();
        assert_eq!(config.dialect, Dialect::MySql);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_parse_full_file() {
        let config = QspecConfig::from_toml_str(
            r#"
            dialect = "sqlite"
            database_url = "sqlite::memory:"
            max_connections = 1
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            QspecConfig::builder()
                .dialect(Dialect::Sqlite)
                .database("sqlite::memory:")
                .max_connections(1)
                .build()
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            QspecConfig::from_toml_str("dialect = \"oracle\""),
            Err(SpecError::Config(_))
        ));
        assert!(matches!(
            QspecConfig::from_toml_str("max_connections = 0"),
            Err(SpecError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("qspec-config-{}.toml", std::process::id()));
        std::fs::write(&path, "dialect = \"sqlserver\"\n").unwrap();
        let config = QspecConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.dialect, Dialect::SqlServer);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = QspecConfig::from_file(Path::new("/nonexistent/qspec.toml")).unwrap_err();
        assert!(matches!(err, SpecError::Io(_)));
    }

    #[test]
    fn test_search_paths_start_local() {
        assert_eq!(QspecConfig::search_paths()[0], PathBuf::from("qspec.toml"));
    }
}
