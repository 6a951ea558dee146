//! Cross-column analyses: contingency tables, grouped totals and Pearson
//! correlations.
//!
//! Everything here runs as SQL against the registered `data` table, with
//! rows containing a null in any participating column dropped before the
//! aggregation (pairwise deletion).

use std::collections::BTreeSet;

use arrow::array::Array;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{label_at, scalar_f64, scalar_i64, DatasetAnalyzer};
use crate::error::{InsightError, Result};
use crate::sql::escape_identifier;

/// Conventional cut-off for a correlation worth reporting.
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.7;

/// How to combine the quantitative column inside each category group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    /// Sum of values per category.
    #[default]
    Sum,
    /// Mean of values per category.
    Mean,
    /// Number of non-null values per category.
    Count,
}

impl Aggregation {
    /// Parses a user-facing aggregation name. Unrecognized names fall back
    /// to counting, which is always well defined.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "sum" | "total" => Aggregation::Sum,
            "mean" | "avg" | "average" => Aggregation::Mean,
            _ => Aggregation::Count,
        }
    }

    fn sql_expr(&self, escaped: &str) -> String {
        match self {
            Aggregation::Sum => format!("SUM(CAST({escaped} AS DOUBLE))"),
            Aggregation::Mean => format!("AVG(CAST({escaped} AS DOUBLE))"),
            Aggregation::Count => format!("CAST(COUNT({escaped}) AS DOUBLE)"),
        }
    }
}

/// One category and its aggregated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub value: f64,
}

/// A two-way contingency table between two qualitative columns.
///
/// `counts[i][j]` is the number of rows whose `row_column` value is
/// `row_labels[i]` and whose `col_column` value is `col_labels[j]`. Labels
/// are sorted ascending; rows with a null in either column are excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub row_column: String,
    pub col_column: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    /// Looks up a single cell by its labels.
    pub fn count(&self, row_label: &str, col_label: &str) -> Option<u64> {
        let i = self.row_labels.iter().position(|l| l == row_label)?;
        let j = self.col_labels.iter().position(|l| l == col_label)?;
        Some(self.counts[i][j])
    }
}

/// A symmetric Pearson correlation matrix over the quantitative columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Column names, in dataset order.
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation between `columns[i]` and
    /// `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Looks up the correlation between two named columns.
    pub fn get(&self, first: &str, second: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == first)?;
        let j = self.columns.iter().position(|c| c == second)?;
        Some(self.values[i][j])
    }
}

/// A pair of distinct columns whose correlation passed a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub value: f64,
}

impl DatasetAnalyzer {
    /// Builds a contingency table between two qualitative columns.
    #[instrument(skip(self), fields(rows = %row_column, cols = %col_column))]
    pub async fn confusion_matrix(
        &self,
        row_column: &str,
        col_column: &str,
    ) -> Result<ConfusionMatrix> {
        self.require_qualitative(row_column)?;
        self.require_qualitative(col_column)?;

        let rows_escaped = escape_identifier(row_column)?;
        let cols_escaped = escape_identifier(col_column)?;
        let sql = format!(
            "SELECT {rows_escaped} AS row_label, {cols_escaped} AS col_label, COUNT(*) AS n \
             FROM data \
             WHERE {rows_escaped} IS NOT NULL AND {cols_escaped} IS NOT NULL \
             GROUP BY {rows_escaped}, {cols_escaped}"
        );
        crate::log_analysis!(
            self.log_config,
            sql = self.log_config.truncate_field(&sql),
            "contingency query"
        );
        let batches = self.dataset.ctx().sql(&sql).await?.collect().await?;

        let mut cells = Vec::new();
        let mut row_set = BTreeSet::new();
        let mut col_set = BTreeSet::new();
        for batch in &batches {
            let counts = batch
                .column(2)
                .as_any()
                .downcast_ref::<arrow::array::Int64Array>()
                .ok_or_else(|| {
                    InsightError::Internal("expected Int64 counts in contingency result".into())
                })?;
            for row in 0..batch.num_rows() {
                let row_label = label_at(batch.column(0), row)?;
                let col_label = label_at(batch.column(1), row)?;
                row_set.insert(row_label.clone());
                col_set.insert(col_label.clone());
                cells.push((row_label, col_label, counts.value(row) as u64));
            }
        }

        let row_labels: Vec<String> = row_set.into_iter().collect();
        let col_labels: Vec<String> = col_set.into_iter().collect();
        let mut counts = vec![vec![0u64; col_labels.len()]; row_labels.len()];
        for (row_label, col_label, n) in cells {
            let i = row_labels.iter().position(|l| *l == row_label).unwrap();
            let j = col_labels.iter().position(|l| *l == col_label).unwrap();
            counts[i][j] = n;
        }

        Ok(ConfusionMatrix {
            row_column: row_column.to_string(),
            col_column: col_column.to_string(),
            row_labels,
            col_labels,
            counts,
        })
    }

    /// Aggregates a quantitative column per category of a qualitative
    /// column. Categories come back sorted ascending; null categories are
    /// dropped.
    #[instrument(skip(self), fields(category = %qualitative, value = %quantitative, agg = ?aggregation))]
    pub async fn total_by_category(
        &self,
        qualitative: &str,
        quantitative: &str,
        aggregation: Aggregation,
    ) -> Result<Vec<CategoryTotal>> {
        self.require_qualitative(qualitative)?;
        self.require_quantitative(quantitative)?;

        let category_escaped = escape_identifier(qualitative)?;
        let value_escaped = escape_identifier(quantitative)?;
        let agg_expr = aggregation.sql_expr(&value_escaped);
        let sql = format!(
            "SELECT {category_escaped} AS category, {agg_expr} AS agg_value \
             FROM data \
             WHERE {category_escaped} IS NOT NULL \
             GROUP BY {category_escaped} \
             ORDER BY {category_escaped}"
        );
        crate::log_analysis!(
            self.log_config,
            sql = self.log_config.truncate_field(&sql),
            "grouped aggregate query"
        );
        let batches = self.dataset.ctx().sql(&sql).await?.collect().await?;

        let mut totals = Vec::new();
        for batch in &batches {
            let values = batch
                .column(1)
                .as_any()
                .downcast_ref::<arrow::array::Float64Array>()
                .ok_or_else(|| {
                    InsightError::Internal("expected Float64 aggregate result".into())
                })?;
            for row in 0..batch.num_rows() {
                // An all-null group has no sum or mean.
                let value = if values.is_valid(row) {
                    values.value(row)
                } else {
                    f64::NAN
                };
                totals.push(CategoryTotal {
                    category: label_at(batch.column(0), row)?,
                    value,
                });
            }
        }
        Ok(totals)
    }

    /// Pearson correlation between two quantitative columns.
    ///
    /// Rows with a null in either column are excluded. Fewer than two
    /// surviving rows yield `NaN`; a constant column yields `0.0`.
    #[instrument(skip(self), fields(first = %first, second = %second))]
    pub async fn correlation_value(&self, first: &str, second: &str) -> Result<f64> {
        self.require_quantitative(first)?;
        self.require_quantitative(second)?;

        let first_escaped = escape_identifier(first)?;
        let second_escaped = escape_identifier(second)?;
        let sql = format!(
            "SELECT \
                COUNT(*) AS n, \
                SUM(CAST({first_escaped} AS DOUBLE)) AS sum_x, \
                SUM(CAST({second_escaped} AS DOUBLE)) AS sum_y, \
                SUM(CAST({first_escaped} AS DOUBLE) * CAST({first_escaped} AS DOUBLE)) AS sum_x2, \
                SUM(CAST({second_escaped} AS DOUBLE) * CAST({second_escaped} AS DOUBLE)) AS sum_y2, \
                SUM(CAST({first_escaped} AS DOUBLE) * CAST({second_escaped} AS DOUBLE)) AS sum_xy \
             FROM data \
             WHERE {first_escaped} IS NOT NULL AND {second_escaped} IS NOT NULL"
        );
        crate::log_analysis!(
            self.log_config,
            sql = self.log_config.truncate_field(&sql),
            "correlation sums query"
        );
        let batches = self.dataset.ctx().sql(&sql).await?.collect().await?;
        let batch = batches
            .first()
            .ok_or_else(|| InsightError::Internal("empty correlation result".into()))?;

        let n = scalar_i64(batch.column(0))?;
        if n < 2 {
            return Ok(f64::NAN);
        }
        let n = n as f64;
        let sum_x = scalar_f64(batch.column(1))?;
        let sum_y = scalar_f64(batch.column(2))?;
        let sum_x2 = scalar_f64(batch.column(3))?;
        let sum_y2 = scalar_f64(batch.column(4))?;
        let sum_xy = scalar_f64(batch.column(5))?;

        let numerator = n * sum_xy - sum_x * sum_y;
        let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();
        if denominator <= 0.0 || !denominator.is_finite() {
            return Ok(0.0);
        }
        Ok(numerator / denominator)
    }

    /// Pairwise Pearson correlations over every quantitative column.
    ///
    /// Returns `None` when the dataset has fewer than two quantitative
    /// columns, since a matrix would be meaningless.
    #[instrument(skip(self))]
    pub async fn correlation_matrix(&self) -> Result<Option<CorrelationMatrix>> {
        let columns = self.quantitative_columns();
        if columns.len() < 2 {
            return Ok(None);
        }

        let size = columns.len();
        let mut values = vec![vec![0.0; size]; size];
        for i in 0..size {
            for j in i..size {
                let r = self.correlation_value(&columns[i], &columns[j]).await?;
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Ok(Some(CorrelationMatrix { columns, values }))
    }

    /// The correlations whose magnitude reaches `threshold`
    /// ([`DEFAULT_CORRELATION_THRESHOLD`] is the conventional choice),
    /// strongest first. Both orderings of each pair are reported. Returns
    /// `None` when no correlation matrix can be built.
    #[instrument(skip(self))]
    pub async fn relevant_correlations(
        &self,
        threshold: f64,
    ) -> Result<Option<Vec<CorrelationPair>>> {
        let Some(matrix) = self.correlation_matrix().await? else {
            return Ok(None);
        };

        let mut pairs = Vec::new();
        for (i, first) in matrix.columns.iter().enumerate() {
            for (j, second) in matrix.columns.iter().enumerate() {
                if i == j {
                    continue;
                }
                let value = matrix.values[i][j];
                if value.abs() >= threshold {
                    pairs.push(CorrelationPair {
                        first: first.clone(),
                        second: second.clone(),
                        value,
                    });
                }
            }
        }
        pairs.sort_by(|a, b| b.value.total_cmp(&a.value));
        Ok(Some(pairs))
    }
}
