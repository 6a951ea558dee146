//! Null-rate analysis for single columns and whole datasets.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{scalar_i64, DatasetAnalyzer};
use crate::dataset::TABLE_NAME;
use crate::error::Result;
use crate::sql::escape_identifier;

/// Result of a null-percentage analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullReport {
    /// Percentage of missing cells, 0 to 100.
    pub value: f64,
    /// Formatted message.
    pub text: String,
}

impl DatasetAnalyzer {
    /// Computes the percentage of null cells.
    ///
    /// With a column name, the rate is nulls over rows for that column.
    /// Without one, it is total null cells over `rows * columns` for the
    /// whole dataset.
    #[instrument(skip(self), fields(column = column.unwrap_or("<dataset>")))]
    pub async fn null_percentage(&self, column: Option<&str>) -> Result<NullReport> {
        let (cells, nulls) = match column {
            Some(name) => {
                let escaped = escape_identifier(self.meta(name)?.name.as_str())?;
                let sql = format!(
                    "SELECT COUNT(*) AS total_count, COUNT({escaped}) AS non_null_count \
                     FROM {TABLE_NAME}"
                );
                crate::log_analysis!(
                    self.log_config,
                    sql = self.log_config.truncate_field(&sql),
                    "null count query"
                );
                let batches = self.dataset().ctx().sql(&sql).await?.collect().await?;
                let batch = batches
                    .first()
                    .ok_or_else(|| crate::error::InsightError::Internal(
                        "count query returned no batches".to_string(),
                    ))?;
                let total = scalar_i64(batch.column(0))? as u64;
                let non_null = scalar_i64(batch.column(1))? as u64;
                (total, total - non_null)
            }
            None => {
                // One scan counting non-null cells in every column at once.
                let mut selects = vec!["COUNT(*) AS total_count".to_string()];
                for name in self.column_names() {
                    selects.push(format!("COUNT({})", escape_identifier(&name)?));
                }
                let sql = format!("SELECT {} FROM {TABLE_NAME}", selects.join(", "));
                crate::log_analysis!(
                    self.log_config,
                    sql = self.log_config.truncate_field(&sql),
                    "null count query"
                );
                let batches = self.dataset().ctx().sql(&sql).await?.collect().await?;
                let batch = batches
                    .first()
                    .ok_or_else(|| crate::error::InsightError::Internal(
                        "count query returned no batches".to_string(),
                    ))?;
                let rows = scalar_i64(batch.column(0))? as u64;
                let mut non_null = 0u64;
                for idx in 1..batch.num_columns() {
                    non_null += scalar_i64(batch.column(idx))? as u64;
                }
                let cells = rows * self.column_count() as u64;
                (cells, cells - non_null)
            }
        };

        let value = if cells == 0 {
            0.0
        } else {
            nulls as f64 / cells as f64 * 100.0
        };

        Ok(NullReport {
            value,
            text: format!("Null values: {value:.2}%"),
        })
    }
}
