//! The dataset analyzer: column classification plus on-demand statistics.
//!
//! A [`DatasetAnalyzer`] is constructed once per analysis session from a
//! [`Dataset`] and optional column metadata. Construction finalizes the
//! classification of every column; after that the analyzer is immutable.
//! To reflect edited metadata or a type coercion, callers build a new
//! analyzer from the replacement dataset.
//!
//! ## Available analyses
//!
//! - Null-rate analysis (`nulls`): per-column and whole-dataset percentages
//! - Frequency distribution (`frequency`): counts and cumulative percentages
//!   for qualitative columns
//! - Concentration of items (`concentration`): disproportionately frequent
//!   categorical values
//! - Outlier detection (`outliers`): IQR fences over quantitative columns
//! - Descriptive statistics (`descriptive`): min/mean/median/std-dev and
//!   quartile metrics
//! - Cross-column analysis (`cross`): contingency tables, grouped totals and
//!   Pearson correlations

pub mod concentration;
pub mod cross;
pub mod descriptive;
pub mod frequency;
pub mod nulls;
pub mod outliers;
pub mod types;

pub use concentration::ConcentrationReport;
pub use cross::{
    Aggregation, CategoryTotal, ConfusionMatrix, CorrelationMatrix, CorrelationPair,
    DEFAULT_CORRELATION_THRESHOLD,
};
pub use descriptive::{DescriptiveReport, Metric};
pub use frequency::{FrequencyRow, FrequencyTable};
pub use nulls::NullReport;
pub use outliers::{iqr_outliers, OutlierReport, OutlierSummary};
pub use types::MetricValue;

use arrow::array::{Array, ArrayRef};
use arrow::util::display::array_value_to_string;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{InsightError, Result};
use crate::logging::LogConfig;
use crate::metadata::{Classification, ColumnMeta};

/// Analyzes a single in-memory dataset.
///
/// # Example
///
/// ```rust,ignore
/// use insight_core::analyzer::DatasetAnalyzer;
/// use insight_core::dataset::Dataset;
///
/// # async fn example(dataset: Dataset) -> insight_core::error::Result<()> {
/// let analyzer = DatasetAnalyzer::new(dataset)?;
/// let nulls = analyzer.null_percentage(None).await?;
/// println!("{}", nulls.text);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DatasetAnalyzer {
    dataset: Dataset,
    columns: Vec<ColumnMeta>,
    log_config: LogConfig,
}

impl DatasetAnalyzer {
    /// Creates an analyzer, inferring column metadata from the dataset's
    /// physical storage types.
    pub fn new(dataset: Dataset) -> Result<Self> {
        let columns = dataset
            .schema()
            .fields()
            .iter()
            .map(|f| ColumnMeta::infer(f.name(), f.data_type()))
            .collect();
        Self::finalize(dataset, columns)
    }

    /// Creates an analyzer from externally supplied (e.g. user-edited)
    /// metadata.
    ///
    /// Fails fast with a configuration error when the metadata row count
    /// does not match the dataset column count, or when any dataset column
    /// has no metadata entry. Classification is recomputed from the declared
    /// types regardless of what the supplied metadata contained.
    pub fn with_metadata(dataset: Dataset, metadata: Vec<ColumnMeta>) -> Result<Self> {
        if metadata.len() != dataset.column_count() {
            return Err(InsightError::configuration(format!(
                "metadata has {} rows but the dataset has {} columns",
                metadata.len(),
                dataset.column_count()
            )));
        }

        // Align metadata with the dataset's column order.
        let mut columns = Vec::with_capacity(metadata.len());
        for name in dataset.column_names() {
            let meta = metadata
                .iter()
                .find(|m| m.name == name)
                .cloned()
                .ok_or_else(|| {
                    InsightError::configuration(format!(
                        "metadata is missing an entry for column '{name}'"
                    ))
                })?;
            columns.push(meta);
        }

        Self::finalize(dataset, columns)
    }

    /// Classification is always derived state; recompute it for every column
    /// before the analyzer becomes visible.
    fn finalize(dataset: Dataset, mut columns: Vec<ColumnMeta>) -> Result<Self> {
        for meta in &mut columns {
            meta.reclassify();
        }
        debug!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "analyzer constructed"
        );
        Ok(Self {
            dataset,
            columns,
            log_config: LogConfig::default(),
        })
    }

    /// Replaces the logging configuration for this analyzer's analyses.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// The logging configuration in effect for this analyzer.
    pub fn log_config(&self) -> &LogConfig {
        &self.log_config
    }

    /// The dataset under analysis.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Metadata for every column, in dataset column order.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.dataset.row_count()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.dataset.column_count()
    }

    /// Approximate memory footprint of the dataset in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.dataset.memory_bytes()
    }

    /// Ordered list of all column names.
    pub fn column_names(&self) -> Vec<String> {
        self.dataset.column_names()
    }

    /// Names of columns classified as qualitative.
    pub fn qualitative_columns(&self) -> Vec<String> {
        self.columns_where(|c| c.is_qualitative())
    }

    /// Names of columns classified as quantitative.
    pub fn quantitative_columns(&self) -> Vec<String> {
        self.columns_where(|c| c.is_quantitative())
    }

    /// Names of columns classified as dates.
    pub fn date_columns(&self) -> Vec<String> {
        self.columns_where(|c| *c == Classification::Date)
    }

    /// Names of columns classified as date-times.
    pub fn datetime_columns(&self) -> Vec<String> {
        self.columns_where(|c| *c == Classification::DateTime)
    }

    /// Comma-joined listing of all column names.
    pub fn column_listing(&self) -> String {
        self.column_names().join(", ")
    }

    /// Comma-joined `name (type)` listing for all columns.
    pub fn columns_with_types(&self) -> String {
        self.columns
            .iter()
            .map(|m| m.labeled())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The first `rows` rows of the dataset.
    pub fn sample(&self, rows: usize) -> arrow::record_batch::RecordBatch {
        self.dataset.sample(rows)
    }

    fn columns_where(&self, pred: impl Fn(&Classification) -> bool) -> Vec<String> {
        self.columns
            .iter()
            .filter(|m| m.classification.as_ref().map(&pred).unwrap_or(false))
            .map(|m| m.name.clone())
            .collect()
    }

    // ---------------------------------------------------------------------
    // Shared column access

    pub(crate) fn column_index(&self, column: &str) -> Result<usize> {
        self.dataset
            .schema()
            .index_of(column)
            .map_err(|_| InsightError::column_not_found(column))
    }

    pub(crate) fn meta(&self, column: &str) -> Result<&ColumnMeta> {
        self.columns
            .iter()
            .find(|m| m.name == column)
            .ok_or_else(|| InsightError::column_not_found(column))
    }

    pub(crate) fn require_qualitative(&self, column: &str) -> Result<()> {
        let meta = self.meta(column)?;
        if meta
            .classification
            .map(|c| c.is_qualitative())
            .unwrap_or(false)
        {
            Ok(())
        } else {
            Err(InsightError::not_qualitative(column))
        }
    }

    pub(crate) fn require_quantitative(&self, column: &str) -> Result<()> {
        let meta = self.meta(column)?;
        if meta
            .classification
            .map(|c| c.is_quantitative())
            .unwrap_or(false)
        {
            Ok(())
        } else {
            Err(InsightError::not_quantitative(column))
        }
    }

    /// Collects a column's non-null values as `f64`, in row order.
    pub(crate) fn numeric_values(&self, column: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(column)?;
        let values = numeric_array_values(self.dataset.batch().column(idx))?;
        crate::log_data_op!(
            self.log_config,
            column = self.log_config.truncate_field(column),
            values = values.len(),
            "numeric column scanned"
        );
        Ok(values)
    }
}

/// Converts a numeric Arrow array to non-null `f64` values in row order.
pub(crate) fn numeric_array_values(column: &ArrayRef) -> Result<Vec<f64>> {
    macro_rules! collect_values {
        ($array_type:ty) => {{
            let array = column
                .as_any()
                .downcast_ref::<$array_type>()
                .expect("downcast matches data type");
            Ok((0..array.len())
                .filter(|&i| array.is_valid(i))
                .map(|i| array.value(i) as f64)
                .collect())
        }};
    }

    use arrow::datatypes::DataType;
    match column.data_type() {
        DataType::Float64 => collect_values!(arrow::array::Float64Array),
        DataType::Float32 => collect_values!(arrow::array::Float32Array),
        DataType::Int64 => collect_values!(arrow::array::Int64Array),
        DataType::Int32 => collect_values!(arrow::array::Int32Array),
        DataType::UInt64 => collect_values!(arrow::array::UInt64Array),
        DataType::UInt32 => collect_values!(arrow::array::UInt32Array),
        other => Err(InsightError::Internal(format!(
            "unsupported array type for numeric analysis: {other:?}"
        ))),
    }
}

/// Extracts the first value of a single-row numeric result column as `f64`.
pub(crate) fn scalar_f64(column: &ArrayRef) -> Result<f64> {
    if column.is_empty() || column.is_null(0) {
        return Ok(f64::NAN);
    }
    numeric_array_values(column)?
        .first()
        .copied()
        .ok_or_else(|| InsightError::Internal("empty aggregate result".to_string()))
}

/// Extracts the first value of a single-row count column as `i64`.
pub(crate) fn scalar_i64(column: &ArrayRef) -> Result<i64> {
    let array = column
        .as_any()
        .downcast_ref::<arrow::array::Int64Array>()
        .ok_or_else(|| {
            InsightError::Internal("expected Int64 array for count result".to_string())
        })?;
    if array.is_empty() {
        return Ok(0);
    }
    Ok(array.value(0))
}

/// Renders one cell of an Arrow array as a display string.
pub(crate) fn label_at(column: &ArrayRef, row: usize) -> Result<String> {
    Ok(array_value_to_string(column.as_ref(), row)?)
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::*;
    use super::*;
    use crate::metadata::ColumnType;

    #[test]
    fn test_inferred_classification() {
        let analyzer = mixed_analyzer();
        assert_eq!(analyzer.qualitative_columns(), vec!["Categoria"]);
        assert_eq!(analyzer.quantitative_columns(), vec!["Valores", "Pesos"]);
        assert!(analyzer.date_columns().is_empty());
        assert!(analyzer.datetime_columns().is_empty());
    }

    #[test]
    fn test_column_listings() {
        let analyzer = mixed_analyzer();
        assert_eq!(analyzer.column_listing(), "Categoria, Valores, Pesos");
        assert_eq!(
            analyzer.columns_with_types(),
            "Categoria (Text), Valores (Integer), Pesos (Decimal)"
        );
    }

    #[test]
    fn test_supplied_metadata_is_reclassified() {
        let dataset = mixed_dataset();
        let mut metadata = vec![
            ColumnMeta::new("Categoria", Some(ColumnType::Text)),
            ColumnMeta::new("Valores", Some(ColumnType::Decimal)),
            ColumnMeta::new("Pesos", Some(ColumnType::Decimal)),
        ];
        // Garbage classification supplied by the caller must be overwritten.
        metadata[1].classification = Some(Classification::QualitativeNominal);

        let analyzer = DatasetAnalyzer::with_metadata(dataset, metadata).unwrap();
        assert_eq!(
            analyzer.meta("Valores").unwrap().classification,
            Some(Classification::QuantitativeContinuous)
        );
    }

    #[test]
    fn test_metadata_count_mismatch_fails_fast() {
        let dataset = mixed_dataset();
        let metadata = vec![ColumnMeta::new("Categoria", Some(ColumnType::Text))];
        let err = DatasetAnalyzer::with_metadata(dataset, metadata).unwrap_err();
        assert!(matches!(err, InsightError::Configuration(_)));
    }

    #[test]
    fn test_metadata_missing_column_fails_fast() {
        let dataset = mixed_dataset();
        let metadata = vec![
            ColumnMeta::new("Categoria", Some(ColumnType::Text)),
            ColumnMeta::new("Valores", Some(ColumnType::Integer)),
            ColumnMeta::new("Nope", Some(ColumnType::Decimal)),
        ];
        let err = DatasetAnalyzer::with_metadata(dataset, metadata).unwrap_err();
        assert!(matches!(err, InsightError::Configuration(_)));
    }

    #[test]
    fn test_with_log_config_replaces_default() {
        let analyzer = mixed_analyzer().with_log_config(LogConfig::verbose());
        assert!(analyzer.log_config().log_analysis_details);
        assert_eq!(analyzer.log_config().base_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_analysis_runs_under_verbose_logging() {
        let analyzer = mixed_analyzer().with_log_config(LogConfig::verbose());
        let table = analyzer.frequency_distribution("Categoria").unwrap();
        assert_eq!(table.rows[0].value, "C");
        let values = analyzer.numeric_values("Valores").unwrap();
        assert_eq!(values.len(), 9);
    }

    #[test]
    fn test_unknown_column_lookup() {
        let analyzer = mixed_analyzer();
        let err = analyzer.numeric_values("Missing").unwrap_err();
        assert!(matches!(err, InsightError::ColumnNotFound { .. }));
    }
}
