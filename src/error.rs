//! Error types for qspec.

use thiserror::Error;

/// The main error type for qspec operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A required string argument was empty or whitespace.
    #[error("Invalid argument '{param}': {message}")]
    InvalidArgument {
        param: &'static str,
        message: String,
    },

    /// A numeric argument was outside its accepted range.
    #[error("Argument '{param}' out of range ({value}): {message}")]
    OutOfRange {
        param: &'static str,
        value: i64,
        message: &'static str,
    },

    /// Two nested specifications bind the same parameter name to different values.
    #[error("Parameter '@{name}' is bound to conflicting values")]
    ParameterConflict { name: String },

    /// A parameter object could not be turned into named parameters.
    #[error("Cannot convert parameters: {0}")]
    Serialize(String),

    /// SQL references a named parameter that is not in the bag.
    #[error("Missing value for parameter '@{0}'")]
    MissingParameter(String),

    /// No driver is available for the dialect.
    #[error("Dialect {0} is not supported by the execution engine")]
    UnsupportedDialect(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Row could not be decoded into the requested type.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    /// Create an invalid argument error.
    pub fn invalid(param: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param,
            message: message.into(),
        }
    }

    /// Create an out of range error.
    pub fn out_of_range(param: &'static str, value: i64, message: &'static str) -> Self {
        Self::OutOfRange {
            param,
            value,
            message,
        }
    }

    /// Name of the offending argument, for argument errors.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { param, .. } | Self::OutOfRange { param, .. } => Some(param),
            _ => None,
        }
    }
}

/// Fail with [`SpecError::InvalidArgument`] when `value` is empty or whitespace.
pub(crate) fn ensure_not_blank(value: &str, param: &'static str) -> SpecResult<()> {
    if value.trim().is_empty() {
        return Err(SpecError::invalid(param, "value cannot be empty or whitespace"));
    }
    Ok(())
}

/// Result type alias for qspec operations.
pub type SpecResult<T> = Result<T, SpecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpecError::out_of_range("skip", -1, "must be non-negative");
        assert_eq!(
            err.to_string(),
            "Argument 'skip' out of range (-1): must be non-negative"
        );
        assert_eq!(err.param(), Some("skip"));
    }

    #[test]
    fn test_blank_detection() {
        assert!(ensure_not_blank("price > 1", "clause").is_ok());
        let err = ensure_not_blank(" \t", "clause").unwrap_err();
        assert_eq!(err.param(), Some("clause"));
    }
}
