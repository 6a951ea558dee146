//! Frequency distribution of qualitative columns.

use std::collections::HashMap;

use arrow::array::Array;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{label_at, DatasetAnalyzer};
use crate::error::Result;

/// One distinct value of a qualitative column with its frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRow {
    /// The distinct value, rendered for display.
    pub value: String,
    /// Number of occurrences.
    pub count: u64,
    /// Percentage of total rows.
    pub percentage: f64,
    /// Running sum of `percentage` in table order.
    pub cumulative_percentage: f64,
}

/// Frequency distribution of a qualitative column, in descending order of
/// occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    /// The analyzed column.
    pub column: String,
    /// Distribution rows, most frequent first.
    pub rows: Vec<FrequencyRow>,
}

impl DatasetAnalyzer {
    /// Computes the frequency distribution of a qualitative column.
    ///
    /// Rows are ordered by descending count; equal counts keep the order in
    /// which the values first appear in the column. Nulls are not counted,
    /// but percentages are relative to the total row count, so a column with
    /// nulls sums to less than 100.
    #[instrument(skip(self), fields(column = %column))]
    pub fn frequency_distribution(&self, column: &str) -> Result<FrequencyTable> {
        self.require_qualitative(column)?;
        let idx = self.column_index(column)?;
        let array = self.dataset().batch().column(idx);
        let total_rows = self.row_count();
        crate::log_data_op!(
            self.log_config,
            column = self.log_config.truncate_field(column),
            rows = total_rows,
            "qualitative column scanned"
        );

        // Count occurrences while remembering each value's first appearance,
        // so ties can be broken stably below.
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut counts: HashMap<String, u64> = HashMap::new();
        for row in 0..array.len() {
            if array.is_null(row) {
                continue;
            }
            let label = label_at(array, row)?;
            first_seen.entry(label.clone()).or_insert(row);
            *counts.entry(label).or_insert(0) += 1;
        }

        let mut entries: Vec<(String, u64, usize)> = counts
            .into_iter()
            .map(|(label, count)| {
                let first = first_seen[&label];
                (label, count, first)
            })
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let mut cumulative = 0.0;
        let rows = entries
            .into_iter()
            .map(|(value, count, _)| {
                let percentage = if total_rows == 0 {
                    0.0
                } else {
                    count as f64 / total_rows as f64 * 100.0
                };
                cumulative += percentage;
                FrequencyRow {
                    value,
                    count,
                    percentage,
                    cumulative_percentage: cumulative,
                }
            })
            .collect();

        Ok(FrequencyTable {
            column: column.to_string(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_fixtures::mixed_analyzer;
    use crate::analyzer::DatasetAnalyzer;
    use crate::dataset::Dataset;
    use crate::error::InsightError;
    use arrow::array::StringArray;
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn text_dataset(values: Vec<Option<&str>>) -> Dataset {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "Categoria",
            DataType::Utf8,
            true,
        )]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(values))]).unwrap();
        Dataset::new(batch).unwrap()
    }

    #[test]
    fn test_descending_counts_with_percentages() {
        let analyzer = mixed_analyzer();
        let table = analyzer.frequency_distribution("Categoria").unwrap();

        let values: Vec<&str> = table.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["C", "B", "A"]);
        assert_eq!(table.rows[0].count, 4);
        assert!((table.rows[0].percentage - 44.4444).abs() < 0.01);
        assert!((table.rows.last().unwrap().cumulative_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cumulative_is_non_decreasing() {
        let analyzer = mixed_analyzer();
        let table = analyzer.frequency_distribution("Categoria").unwrap();
        let mut previous = 0.0;
        for row in &table.rows {
            assert!(row.cumulative_percentage >= previous);
            previous = row.cumulative_percentage;
        }
    }

    #[test]
    fn test_ties_keep_first_encounter_order() {
        let analyzer = DatasetAnalyzer::new(text_dataset(vec![
            Some("x"),
            Some("y"),
            Some("y"),
            Some("z"),
            Some("z"),
            Some("x"),
        ]))
        .unwrap();
        let table = analyzer.frequency_distribution("Categoria").unwrap();
        let values: Vec<&str> = table.rows.iter().map(|r| r.value.as_str()).collect();
        // All counts equal 2; the order of first appearance wins.
        assert_eq!(values, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_nulls_are_not_counted() {
        let analyzer =
            DatasetAnalyzer::new(text_dataset(vec![Some("a"), None, Some("a"), None])).unwrap();
        let table = analyzer.frequency_distribution("Categoria").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].count, 2);
        // Percentages stay relative to all four rows.
        assert_eq!(table.rows[0].percentage, 50.0);
    }

    #[test]
    fn test_rejects_quantitative_column() {
        let analyzer = mixed_analyzer();
        let err = analyzer.frequency_distribution("Valores").unwrap_err();
        assert!(matches!(err, InsightError::Classification { .. }));
    }
}
