//! IQR-based outlier detection for quantitative columns.
//!
//! The core math lives in [`iqr_outliers`], a pure function over a plain
//! numeric slice, so other analyses (notably concentration of items) can
//! reuse it without constructing a second analyzer.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::DatasetAnalyzer;
use crate::error::Result;

/// Default IQR fence multiplier.
pub const DEFAULT_OUTLIER_MULTIPLIER: f64 = 1.5;

/// Quartiles, fences and the outlier partition of one numeric sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    /// Lower fence: `q1 - multiplier * (q3 - q1)`.
    pub lower_bound: f64,
    /// Upper fence: `q3 + multiplier * (q3 - q1)`.
    pub upper_bound: f64,
    /// All outliers, sorted ascending. A value is an outlier iff it is
    /// strictly below the lower fence or strictly above the upper fence.
    pub outliers: Vec<f64>,
    /// Outliers greater than the LOWER fence. Each partition filters the
    /// outlier list against the opposite fence; since every outlier sits
    /// outside exactly one fence, the two lists still split the outliers.
    pub above: Vec<f64>,
    /// Outliers smaller than the UPPER fence (same opposite-fence filter).
    pub below: Vec<f64>,
}

/// Result of an outlier analysis over a dataset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    /// Number of outliers.
    pub value: usize,
    /// Formatted message.
    pub text: String,
    /// All outliers, sorted ascending.
    pub values: Vec<f64>,
    /// Count of the `above` partition.
    pub above_count: usize,
    /// Outliers greater than the lower fence.
    pub above: Vec<f64>,
    /// Count of the `below` partition.
    pub below_count: usize,
    /// Outliers smaller than the upper fence.
    pub below: Vec<f64>,
    /// Lower fence used for the detection.
    pub lower_bound: f64,
    /// Upper fence used for the detection.
    pub upper_bound: f64,
}

/// Quantile of an ascending-sorted sample with linear interpolation between
/// order statistics. Returns NaN for an empty sample.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Runs IQR outlier detection over a plain numeric sample.
///
/// Fences are `q1 - multiplier * iqr` and `q3 + multiplier * iqr`; values
/// strictly outside the fences are outliers.
pub fn iqr_outliers(values: &[f64], multiplier: f64) -> OutlierSummary {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower_bound = q1 - multiplier * iqr;
    let upper_bound = q3 + multiplier * iqr;

    let outliers: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_bound || *v > upper_bound)
        .collect();
    let above: Vec<f64> = outliers.iter().copied().filter(|v| *v > lower_bound).collect();
    let below: Vec<f64> = outliers.iter().copied().filter(|v| *v < upper_bound).collect();

    OutlierSummary {
        q1,
        q3,
        lower_bound,
        upper_bound,
        outliers,
        above,
        below,
    }
}

impl DatasetAnalyzer {
    /// Detects outliers in a quantitative column with the default 1.5 IQR
    /// fence multiplier.
    pub fn outliers(&self, column: &str) -> Result<OutlierReport> {
        self.outliers_with_multiplier(column, DEFAULT_OUTLIER_MULTIPLIER)
    }

    /// Detects outliers in a quantitative column.
    ///
    /// Nulls are dropped before quartiles are computed. The returned
    /// partitions mirror [`OutlierSummary`]: `above` holds outliers greater
    /// than the lower fence, `below` holds outliers smaller than the upper
    /// fence.
    #[instrument(skip(self), fields(column = %column, multiplier))]
    pub fn outliers_with_multiplier(
        &self,
        column: &str,
        multiplier: f64,
    ) -> Result<OutlierReport> {
        self.require_quantitative(column)?;
        let values = self.numeric_values(column)?;
        let summary = iqr_outliers(&values, multiplier);

        Ok(OutlierReport {
            value: summary.outliers.len(),
            text: format!("Outliers: {}", summary.outliers.len()),
            above_count: summary.above.len(),
            below_count: summary.below.len(),
            values: summary.outliers,
            above: summary.above,
            below: summary.below,
            lower_bound: summary.lower_bound,
            upper_bound: summary.upper_bound,
        })
    }
}
