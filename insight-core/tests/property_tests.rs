//! Property-based tests for the analyzer invariants.
//!
//! These use proptest to check the structural guarantees that must hold for
//! any input: frequency percentages that account for every row, outliers
//! that actually sit outside their fences, and classifications that never
//! drift under recomputation.

use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use insight_core::analyzer::{iqr_outliers, DatasetAnalyzer};
use insight_core::dataset::Dataset;
use insight_core::metadata::{ColumnMeta, ColumnType};
use proptest::prelude::*;

fn labeled_analyzer(labels: &[String]) -> DatasetAnalyzer {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "label",
        DataType::Utf8,
        true,
    )]));
    let values: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
    let batch =
        RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(values))]).unwrap();
    DatasetAnalyzer::new(Dataset::new(batch).unwrap()).unwrap()
}

proptest! {
    /// Frequency rows must account for every input row exactly once, with
    /// percentages that sum to 100 and a non-decreasing cumulative column.
    #[test]
    fn prop_frequency_accounts_for_every_row(
        labels in prop::collection::vec("[a-e]", 1..200)
    ) {
        let analyzer = labeled_analyzer(&labels);
        let table = analyzer.frequency_distribution("label").unwrap();

        let total: u64 = table.rows.iter().map(|r| r.count).sum();
        prop_assert_eq!(total as usize, labels.len());

        let pct_sum: f64 = table.rows.iter().map(|r| r.percentage).sum();
        prop_assert!((pct_sum - 100.0).abs() < 1e-6);

        let mut previous = 0.0;
        for row in &table.rows {
            prop_assert!(row.cumulative_percentage >= previous - 1e-9);
            previous = row.cumulative_percentage;
        }
        if let Some(last) = table.rows.last() {
            prop_assert!((last.cumulative_percentage - 100.0).abs() < 1e-6);
        }
    }

    /// Counts must be sorted descending regardless of input order.
    #[test]
    fn prop_frequency_rows_sorted_by_count(
        labels in prop::collection::vec("[a-h]", 1..100)
    ) {
        let analyzer = labeled_analyzer(&labels);
        let table = analyzer.frequency_distribution("label").unwrap();
        for pair in table.rows.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
        }
    }

    /// Every reported outlier sits strictly outside the fences, and the
    /// above/below partitions cover the outlier list exactly.
    #[test]
    fn prop_outliers_sit_outside_the_fences(
        values in prop::collection::vec(-1e6f64..1e6, 1..300)
    ) {
        let summary = iqr_outliers(&values, 1.5);

        for v in &summary.outliers {
            prop_assert!(
                *v < summary.lower_bound || *v > summary.upper_bound,
                "{} within [{}, {}]", v, summary.lower_bound, summary.upper_bound
            );
        }
        prop_assert_eq!(
            summary.above.len() + summary.below.len(),
            summary.outliers.len()
        );
        for v in &summary.above {
            prop_assert!(*v > summary.upper_bound);
        }
        for v in &summary.below {
            prop_assert!(*v < summary.lower_bound);
        }
    }

    /// Values within the fences are never reported.
    #[test]
    fn prop_inliers_are_never_reported(
        values in prop::collection::vec(-1e3f64..1e3, 2..100)
    ) {
        let summary = iqr_outliers(&values, 1.5);
        let expected = values
            .iter()
            .filter(|v| **v < summary.lower_bound || **v > summary.upper_bound)
            .count();
        prop_assert_eq!(summary.outliers.len(), expected);
    }

    /// Reclassification is a pure function of the declared type, so
    /// recomputing it never changes an already classified column.
    #[test]
    fn prop_classification_is_idempotent(type_index in 0usize..6) {
        let declared = match type_index {
            0 => Some(ColumnType::Text),
            1 => Some(ColumnType::Integer),
            2 => Some(ColumnType::Decimal),
            3 => Some(ColumnType::Date),
            4 => Some(ColumnType::DateTime),
            _ => None,
        };
        let mut meta = ColumnMeta::new("col", declared);
        let first = meta.classification;
        meta.reclassify();
        prop_assert_eq!(first, meta.classification);
        prop_assert_eq!(meta.classification, declared.map(|t| t.classification()));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Null percentages stay within [0, 100] for any null pattern.
    #[test]
    fn prop_null_percentage_is_bounded(
        values in prop::collection::vec(prop::option::of(0i64..100), 1..100)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let schema = Arc::new(Schema::new(vec![Field::new(
                "v",
                DataType::Int64,
                true,
            )]));
            let batch = RecordBatch::try_new(
                schema,
                vec![Arc::new(Int64Array::from(values.clone()))],
            )
            .unwrap();
            let analyzer = DatasetAnalyzer::new(Dataset::new(batch).unwrap()).unwrap();

            let report = analyzer.null_percentage(Some("v")).await.unwrap();
            let nulls = values.iter().filter(|v| v.is_none()).count();
            let expected = nulls as f64 / values.len() as f64 * 100.0;
            prop_assert!((report.value - expected).abs() < 1e-9);
            prop_assert!((0.0..=100.0).contains(&report.value));
            Ok(())
        }).unwrap();
    }
}
