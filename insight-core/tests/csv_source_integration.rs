//! Integration tests for loading CSV files into the analyzer.

use std::io::Write;

use arrow::datatypes::DataType;
use insight_core::prelude::*;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_load_and_analyze_a_csv_file() {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    writeln!(file, "produto,quantidade").unwrap();
    writeln!(file, "caneta,10").unwrap();
    writeln!(file, "papel,12").unwrap();
    writeln!(file, "caneta,14").unwrap();
    writeln!(file, "cola,100").unwrap();
    file.flush().unwrap();

    let dataset = CsvSource::from_path(file.path()).load().await.unwrap();
    let analyzer = DatasetAnalyzer::new(dataset).unwrap();

    assert_eq!(analyzer.qualitative_columns(), vec!["produto"]);
    assert_eq!(analyzer.quantitative_columns(), vec!["quantidade"]);

    let table = analyzer.frequency_distribution("produto").unwrap();
    assert_eq!(table.rows[0].value, "caneta");
    assert_eq!(table.rows[0].count, 2);
}

#[tokio::test]
async fn test_semicolon_file_with_comma_decimals() {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    writeln!(file, "item;preco").unwrap();
    writeln!(file, "caneta;1,5").unwrap();
    writeln!(file, "papel;2,25").unwrap();
    writeln!(file, "cola;10,0").unwrap();
    file.flush().unwrap();

    let options = CsvOptions {
        delimiter: Delimiter::Semicolon,
        decimal: DecimalSeparator::Comma,
        ..Default::default()
    };
    let dataset = CsvSource::from_path(file.path())
        .with_options(options)
        .load()
        .await
        .unwrap();

    assert_eq!(
        dataset.schema().field_with_name("preco").unwrap().data_type(),
        &DataType::Float64
    );

    let analyzer = DatasetAnalyzer::new(dataset).unwrap();
    let report = analyzer.descriptive_statistics("preco").unwrap();
    assert_eq!(report.get_f64(Metric::Min), Some(1.5));
    assert_eq!(report.get_f64(Metric::Max), Some(10.0));
}

#[tokio::test]
async fn test_missing_numeric_fields_count_as_nulls() {
    let source = CsvSource::from_bytes("a,b\n1,x\n,y\n2,z\n3,w\n");
    let dataset = source.load().await.unwrap();
    let analyzer = DatasetAnalyzer::new(dataset).unwrap();

    let column = analyzer.null_percentage(Some("a")).await.unwrap();
    assert_eq!(column.value, 25.0);

    let whole = analyzer.null_percentage(None).await.unwrap();
    assert_eq!(whole.value, 12.5);
}

#[tokio::test]
async fn test_tab_delimited_buffer() {
    let options = CsvOptions {
        delimiter: Delimiter::Tab,
        ..Default::default()
    };
    let source = CsvSource::from_bytes("x\ty\n1\talpha\n2\tbeta\n").with_options(options);
    let dataset = source.load().await.unwrap();

    assert_eq!(dataset.column_names(), vec!["x", "y"]);
    assert_eq!(dataset.row_count(), 2);
}

#[tokio::test]
async fn test_header_only_file_yields_empty_dataset() {
    let source = CsvSource::from_bytes("a,b\n");
    let dataset = source.load().await.unwrap();

    assert_eq!(dataset.row_count(), 0);
    assert_eq!(dataset.column_count(), 2);
}
