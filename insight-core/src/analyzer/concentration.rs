//! Concentration analysis: categorical values that account for a
//! disproportionate share of rows.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{iqr_outliers, DatasetAnalyzer};
use crate::error::Result;

/// With only two distinct values the proportion sample is too small for
/// quartile-based detection; the top value is concentrated iff it reaches
/// this share.
const TWO_VALUE_THRESHOLD: f64 = 0.7;

/// Fence multiplier for the proportion sample: any share strictly above the
/// upper quartile of the per-value proportions counts as concentrated.
const CONCENTRATION_FENCE_MULTIPLIER: f64 = 0.0;

/// Result of a concentration-of-items analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationReport {
    /// Number of concentrated items (1 for the degenerate all-unique case).
    pub value: usize,
    /// Formatted message.
    pub text: String,
    /// The concentrated items, most frequent first.
    pub items: Vec<String>,
}

impl DatasetAnalyzer {
    /// Finds the values of a qualitative column that occur disproportionately
    /// more often than the rest.
    ///
    /// The per-value proportions are treated as a quantitative sample and run
    /// through the IQR outlier helper; the high-side outliers are the
    /// concentrated items. Columns with a single distinct value or with only
    /// unique values short-circuit to fixed answers.
    #[instrument(skip(self), fields(column = %column))]
    pub fn concentration_of_items(&self, column: &str) -> Result<ConcentrationReport> {
        self.require_qualitative(column)?;
        let table = self.frequency_distribution(column)?;

        if table.rows.len() == 1 {
            let item = table.rows[0].value.clone();
            return Ok(ConcentrationReport {
                value: 1,
                text: format!("The item '{item}' accounts for 100% of the rows."),
                items: vec![item],
            });
        }

        if table.rows.iter().all(|r| r.count == 1) {
            return Ok(ConcentrationReport {
                value: 1,
                text: "The column contains only unique values.".to_string(),
                items: Vec::new(),
            });
        }

        let total: u64 = table.rows.iter().map(|r| r.count).sum();
        let proportions: Vec<f64> = table
            .rows
            .iter()
            .map(|r| r.count as f64 / total as f64)
            .collect();

        let mut selected: Vec<String> = Vec::new();
        let mut share = 0.0;

        if table.rows.len() == 2 {
            if proportions[0] >= TWO_VALUE_THRESHOLD {
                selected.push(table.rows[0].value.clone());
                share = proportions[0];
            }
        } else {
            let summary = iqr_outliers(&proportions, CONCENTRATION_FENCE_MULTIPLIER);
            for (row, proportion) in table.rows.iter().zip(&proportions) {
                let is_outlier =
                    *proportion < summary.lower_bound || *proportion > summary.upper_bound;
                if is_outlier && *proportion > summary.lower_bound {
                    selected.push(row.value.clone());
                    share += proportion;
                }
            }
        }

        // Display-only cleanup for numeric-looking labels.
        let selected: Vec<String> = selected
            .into_iter()
            .map(|label| match label.strip_suffix(".0") {
                Some(stripped) => stripped.to_string(),
                None => label,
            })
            .collect();

        let report = match selected.len() {
            0 => ConcentrationReport {
                value: 0,
                text: "No concentration of items in this column.".to_string(),
                items: Vec::new(),
            },
            1 => ConcentrationReport {
                value: 1,
                text: format!(
                    "The item '{}' accounts for {:.2}% of the rows.",
                    selected[0],
                    share * 100.0
                ),
                items: selected,
            },
            n => ConcentrationReport {
                value: n,
                text: format!(
                    "The items '{}' account for {:.2}% of the rows.",
                    selected.join("', '"),
                    share * 100.0
                ),
                items: selected,
            },
        };

        Ok(report)
    }
}
