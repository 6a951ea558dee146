//! Prelude for commonly used types and traits in insight-core.

pub use crate::analyzer::{
    Aggregation, ConcentrationReport, ConfusionMatrix, CorrelationMatrix, CorrelationPair,
    DatasetAnalyzer, DescriptiveReport, FrequencyTable, Metric, MetricValue, NullReport,
    OutlierReport,
};
pub use crate::dataset::Dataset;
pub use crate::error::{ErrorContext, InsightError, Result};
pub use crate::logging::LogConfig;
pub use crate::metadata::{Classification, ColumnMeta, ColumnType};
pub use crate::sources::{CsvOptions, CsvSource, DataSource, DecimalSeparator, Delimiter};
