//! Error types for flight-delays.
//!
//! Empty slices and zero denominators are not errors; they surface as
//! ordinary zero/empty query results. Errors here cover bad selections,
//! unreadable sources and configuration problems.

use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// The main error type for flight-delays operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Selection Errors ===
    /// A selection value is outside its valid range or could not be parsed.
    #[error("invalid {field} '{value}': {reason}")]
    Validation {
        /// Which selection field was rejected.
        field: &'static str,
        /// The offending input, as given.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    // === Source Errors ===
    /// Failed to open the dataset file.
    #[error("failed to open dataset at {path}: {source}")]
    DatasetOpen {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from the source.
    #[error("column {0} not found")]
    MissingColumn(String),

    /// A column exists but does not have the expected Arrow type.
    #[error("column {name} is not {expected}")]
    ColumnType {
        /// Column name.
        name: String,
        /// Expected Arrow type, as text.
        expected: &'static str,
    },

    /// An Arrow compute or decode operation failed.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// A Parquet read failed.
    #[error("parquet error: {0}")]
    Parquet(#[from] ParquetError),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O and Serialization ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for flight-delays operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a selection validation error.
    #[must_use]
    pub fn validation(
        field: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a column type mismatch error.
    #[must_use]
    pub fn column_type(name: impl Into<String>, expected: &'static str) -> Self {
        Self::ColumnType {
            name: name.into(),
            expected,
        }
    }

    /// Check if this error is a rejected selection.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = Error::validation("month", 13, "must be between 1 and 12");
        assert_eq!(
            err.to_string(),
            "invalid month '13': must be between 1 and 12"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_missing_column_display() {
        let err = Error::MissingColumn("Dest".to_string());
        assert_eq!(err.to_string(), "column Dest not found");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_column_type_display() {
        let err = Error::column_type("Month", "Int64");
        assert_eq!(err.to_string(), "column Month is not Int64");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_arrow_error() {
        let err: Error = ArrowError::ComputeError("bad kernel".to_string()).into();
        assert!(matches!(err, Error::Arrow(_)));
        assert!(err.to_string().contains("bad kernel"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::ConfigValidation {
            message: "batch_size must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("batch_size"));
    }
}
