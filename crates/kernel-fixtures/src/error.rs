//! Fixture construction and validation error types.

use arrow::datatypes::DataType;
use arrow::error::ArrowError;

/// Errors produced while building an [`ExecBatch`](crate::ExecBatch) from JSON
/// or while validating a computed value.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The JSON text is not syntactically valid.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Row arity, payload layout, or shape list does not match the declared types.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A JSON literal cannot be converted into the declared type's value domain.
    #[error("row {row}, column {column} ({data_type}): {detail}")]
    TypeCoercion {
        /// Zero-based row index in the JSON payload.
        row: usize,
        /// Zero-based column index in the declared type list.
        column: usize,
        /// Declared type of the column.
        data_type: DataType,
        /// What went wrong, including any nested position.
        detail: String,
    },

    /// The declared type has no JSON literal encoding.
    #[error("column {column}: unsupported type {data_type}")]
    UnsupportedType { column: usize, data_type: DataType },

    /// A structural invariant of a computed value is violated.
    #[error("invalid output: {message}")]
    Validation { message: String },

    /// Invalid builder configuration.
    #[error("invalid config: {message}")]
    Config { message: String },

    /// Arrow refused to assemble an array from decoded parts.
    #[error("arrow: {0}")]
    Arrow(#[from] ArrowError),
}

impl FixtureError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, FixtureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_error_names_position_and_type() {
        let err = FixtureError::TypeCoercion {
            row: 2,
            column: 1,
            data_type: DataType::Int32,
            detail: "expected integer, got string \"x\"".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 2"), "got: {msg}");
        assert!(msg.contains("column 1"), "got: {msg}");
        assert!(msg.contains("Int32"), "got: {msg}");
    }

    #[test]
    fn parse_error_wraps_serde_json() {
        let inner = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let err = FixtureError::from(inner);
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn arrow_error_wraps() {
        let err = FixtureError::from(ArrowError::InvalidArgumentError("boom".into()));
        assert!(err.to_string().contains("boom"));
    }
}
