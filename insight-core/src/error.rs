//! Error types for the Insight dataset-analysis library.
//!
//! This module provides a comprehensive error handling strategy using `thiserror`
//! for automatic error trait implementations. All errors in the Insight library
//! are represented by the `InsightError` enum.
//!
//! Analysis errors are reported synchronously at the call that triggers them.
//! A failed analysis request is independent of every other request and never
//! corrupts analyzer state.

use thiserror::Error;

/// The main error type for the Insight library.
#[derive(Error, Debug)]
pub enum InsightError {
    /// A requested operation's target column is not classified as required
    /// for that operation (e.g. a frequency distribution over a column that
    /// is not qualitative).
    #[error("Column '{column}' is not classified as {expected}")]
    Classification {
        /// The column whose classification was checked
        column: String,
        /// The classification the operation requires ("Qualitative", "Quantitative")
        expected: &'static str,
    },

    /// A named column does not exist in the dataset.
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// Malformed or mismatched column metadata at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from data source operations.
    #[error("Data source error: {message}")]
    DataSource {
        /// Type of data source (e.g., "CSV")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when parsing or processing data.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, InsightError>`.
///
/// This is the standard `Result` type used throughout the Insight library.
///
/// # Examples
///
/// ```rust,ignore
/// use insight_core::error::Result;
///
/// fn analyze_data() -> Result<()> {
///     // analysis logic here
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, InsightError>;

impl InsightError {
    /// Creates a classification error for a column that should be qualitative.
    pub fn not_qualitative(column: impl Into<String>) -> Self {
        Self::Classification {
            column: column.into(),
            expected: "Qualitative",
        }
    }

    /// Creates a classification error for a column that should be quantitative.
    pub fn not_quantitative(column: impl Into<String>) -> Self {
        Self::Classification {
            column: column.into(),
            expected: "Quantitative",
        }
    }

    /// Creates a column-not-found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Creates a configuration error with the given message.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<InsightError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let base_error = e.into();
            InsightError::Internal(format!("{}: {}", msg, base_error))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            let base_error = e.into();
            InsightError::Internal(format!("{}: {}", msg, base_error))
        })
    }
}
