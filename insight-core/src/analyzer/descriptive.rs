//! Descriptive statistics for quantitative columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::outliers::{iqr_outliers, quantile_sorted, DEFAULT_OUTLIER_MULTIPLIER};
use super::{DatasetAnalyzer, MetricValue};
use crate::error::Result;

/// The individual statistics a descriptive analysis can compute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Metric {
    /// Smallest value.
    Min,
    /// Arithmetic mean.
    Mean,
    /// 50th percentile.
    Median,
    /// Sample standard deviation (N-1 denominator).
    StdDev,
    /// Largest value.
    Max,
    /// 25th percentile.
    P25,
    /// 75th percentile.
    P75,
    /// Interquartile range (75th minus 25th percentile).
    Iqr,
    /// Number of IQR outliers.
    OutlierCount,
    /// Outliers as a percentage of non-null values.
    OutlierPercentage,
    /// The outlier values themselves.
    OutlierValues,
}

impl Metric {
    /// The default metric set: everything.
    pub fn all() -> &'static [Metric] {
        &[
            Metric::Min,
            Metric::Mean,
            Metric::Median,
            Metric::StdDev,
            Metric::Max,
            Metric::P25,
            Metric::P75,
            Metric::Iqr,
            Metric::OutlierCount,
            Metric::OutlierPercentage,
            Metric::OutlierValues,
        ]
    }
}

/// Result of a descriptive-statistics analysis. Metrics that were not
/// requested are absent from the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveReport {
    /// The analyzed column.
    pub column: String,
    /// Requested metrics and their values.
    pub metrics: BTreeMap<Metric, MetricValue>,
}

impl DescriptiveReport {
    /// Convenience accessor for a numeric metric.
    pub fn get_f64(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).and_then(|v| v.as_f64())
    }
}

impl DatasetAnalyzer {
    /// Computes the full default metric set for a quantitative column.
    pub fn descriptive_statistics(&self, column: &str) -> Result<DescriptiveReport> {
        self.descriptive_statistics_for(column, Metric::all())
    }

    /// Computes the requested metrics for a quantitative column.
    ///
    /// Nulls are dropped before any statistic is computed. The outlier
    /// metrics use the default 1.5 IQR fence multiplier.
    #[instrument(skip(self, metrics), fields(column = %column))]
    pub fn descriptive_statistics_for(
        &self,
        column: &str,
        metrics: &[Metric],
    ) -> Result<DescriptiveReport> {
        self.require_quantitative(column)?;
        let values = self.numeric_values(column)?;
        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);

        let n = values.len();
        let mean = if n == 0 {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / n as f64
        };

        let mut results = BTreeMap::new();
        for metric in metrics {
            let value = match metric {
                Metric::Min => MetricValue::Double(sorted.first().copied().unwrap_or(f64::NAN)),
                Metric::Max => MetricValue::Double(sorted.last().copied().unwrap_or(f64::NAN)),
                Metric::Mean => MetricValue::Double(mean),
                Metric::Median => MetricValue::Double(quantile_sorted(&sorted, 0.5)),
                Metric::P25 => MetricValue::Double(quantile_sorted(&sorted, 0.25)),
                Metric::P75 => MetricValue::Double(quantile_sorted(&sorted, 0.75)),
                Metric::Iqr => MetricValue::Double(
                    quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25),
                ),
                Metric::StdDev => {
                    if n < 2 {
                        MetricValue::Double(f64::NAN)
                    } else {
                        let variance = values
                            .iter()
                            .map(|v| (v - mean).powi(2))
                            .sum::<f64>()
                            / (n - 1) as f64;
                        MetricValue::Double(variance.sqrt())
                    }
                }
                Metric::OutlierCount | Metric::OutlierPercentage | Metric::OutlierValues => {
                    let summary = iqr_outliers(&values, DEFAULT_OUTLIER_MULTIPLIER);
                    match metric {
                        Metric::OutlierCount => MetricValue::Long(summary.outliers.len() as i64),
                        Metric::OutlierPercentage => {
                            if n == 0 {
                                MetricValue::Double(f64::NAN)
                            } else {
                                MetricValue::Double(
                                    summary.outliers.len() as f64 / n as f64 * 100.0,
                                )
                            }
                        }
                        Metric::OutlierValues => MetricValue::Values(summary.outliers),
                        _ => unreachable!(),
                    }
                }
            };
            results.insert(*metric, value);
        }

        Ok(DescriptiveReport {
            column: column.to_string(),
            metrics: results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::DatasetAnalyzer;
    use crate::dataset::Dataset;
    use crate::error::InsightError;
    use arrow::array::Int64Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn valores_analyzer() -> DatasetAnalyzer {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "Valores",
            DataType::Int64,
            true,
        )]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Int64Array::from(vec![
                10, 12, 14, 15, 18, 20, 22, 100,
            ]))],
        )
        .unwrap();
        DatasetAnalyzer::new(Dataset::new(batch).unwrap()).unwrap()
    }

    #[test]
    fn test_full_metric_set() {
        let report = valores_analyzer()
            .descriptive_statistics("Valores")
            .unwrap();

        assert_eq!(report.get_f64(Metric::Min), Some(10.0));
        assert_eq!(report.get_f64(Metric::Max), Some(100.0));
        assert_eq!(report.get_f64(Metric::Mean), Some(26.375));
        assert_eq!(report.get_f64(Metric::Median), Some(16.5));
        assert_eq!(report.get_f64(Metric::P25), Some(13.5));
        assert_eq!(report.get_f64(Metric::P75), Some(20.5));
        assert_eq!(report.get_f64(Metric::Iqr), Some(7.0));
        assert_eq!(report.get_f64(Metric::OutlierCount), Some(1.0));
        assert_eq!(report.get_f64(Metric::OutlierPercentage), Some(12.5));
        assert_eq!(
            report.metrics[&Metric::OutlierValues],
            MetricValue::Values(vec![100.0])
        );
    }

    #[test]
    fn test_sample_standard_deviation() {
        let report = valores_analyzer()
            .descriptive_statistics_for("Valores", &[Metric::StdDev])
            .unwrap();
        let std_dev = report.get_f64(Metric::StdDev).unwrap();
        assert!((std_dev - 30.018_744).abs() < 1e-3);
    }

    #[test]
    fn test_unrequested_metrics_are_absent() {
        let report = valores_analyzer()
            .descriptive_statistics_for("Valores", &[Metric::Min, Metric::Mean])
            .unwrap();
        assert_eq!(report.metrics.len(), 2);
        assert!(report.metrics.contains_key(&Metric::Min));
        assert!(!report.metrics.contains_key(&Metric::Median));
    }

    #[test]
    fn test_rejects_qualitative_column() {
        let analyzer = crate::analyzer::test_fixtures::mixed_analyzer();
        let err = analyzer.descriptive_statistics("Categoria").unwrap_err();
        assert!(matches!(err, InsightError::Classification { .. }));
    }
}
