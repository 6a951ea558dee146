//! CSV source with delimiter selection and decimal-comma normalization.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use super::DataSource;
use crate::dataset::Dataset;
use crate::error::{InsightError, Result};

/// Matches a number written with a comma as the decimal separator.
static DECIMAL_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(,[0-9]+)?$").expect("valid decimal pattern"));

/// Field delimiter for a CSV file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
    Pipe,
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
        }
    }
}

/// The character used as the decimal mark inside numeric fields.
///
/// Files exported from locales that write `1,5` for one and a half need
/// [`DecimalSeparator::Comma`]; those columns arrive as text and are
/// converted to doubles after parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecimalSeparator {
    #[default]
    Point,
    Comma,
}

/// Options for configuring CSV reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Field delimiter.
    pub delimiter: Delimiter,
    /// Decimal mark used inside numeric fields.
    pub decimal: DecimalSeparator,
    /// Maximum records to read for schema inference.
    pub schema_infer_max_records: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: Delimiter::Comma,
            decimal: DecimalSeparator::Point,
            schema_infer_max_records: 1000,
        }
    }
}

/// A CSV source backed by a file path or an in-memory byte buffer.
///
/// Byte buffers cover the upload case, where the file content is already
/// in hand and never touches the filesystem.
#[derive(Debug, Clone)]
pub struct CsvSource {
    input: CsvInput,
    options: CsvOptions,
}

#[derive(Debug, Clone)]
enum CsvInput {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl CsvSource {
    /// Creates a CSV source from a file path with default options.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            input: CsvInput::Path(path.into()),
            options: CsvOptions::default(),
        }
    }

    /// Creates a CSV source from raw bytes with default options.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            input: CsvInput::Bytes(bytes.into()),
            options: CsvOptions::default(),
        }
    }

    /// Sets custom options for this source.
    pub fn with_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    async fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.input {
            CsvInput::Path(path) => Ok(tokio::fs::read(path).await?),
            CsvInput::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    fn parse(&self, bytes: &[u8]) -> Result<Dataset> {
        let format = Format::default()
            .with_header(self.options.has_header)
            .with_delimiter(self.options.delimiter.as_byte());

        let (schema, _) = format
            .infer_schema(
                Cursor::new(bytes),
                Some(self.options.schema_infer_max_records),
            )
            .map_err(|e| {
                InsightError::data_source_with_source("csv", "schema inference failed", Box::new(e))
            })?;
        if schema.fields().is_empty() {
            return Err(InsightError::data_source("csv", "no columns found"));
        }
        let schema = Arc::new(schema);

        let reader = ReaderBuilder::new(schema.clone())
            .with_format(format)
            .build(Cursor::new(bytes))?;
        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

        let mut batch = if batches.is_empty() {
            RecordBatch::new_empty(schema.clone())
        } else {
            arrow::compute::concat_batches(&schema, &batches)?
        };

        if self.options.decimal == DecimalSeparator::Comma {
            batch = convert_decimal_commas(&batch)?;
        }

        debug!(
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "CSV parsed"
        );
        Dataset::new(batch)
    }
}

#[async_trait]
impl DataSource for CsvSource {
    #[instrument(skip(self), fields(
        source.type = "csv",
        csv.delimiter = %self.options.delimiter.as_byte() as char,
        csv.has_header = self.options.has_header
    ))]
    async fn load(&self) -> Result<Dataset> {
        let bytes = self.read_bytes().await?;
        self.parse(&bytes)
    }

    fn description(&self) -> String {
        match &self.input {
            CsvInput::Path(path) => format!("CSV file: {}", path.display()),
            CsvInput::Bytes(bytes) => format!("CSV buffer: {} bytes", bytes.len()),
        }
    }
}

/// Rewrites text columns that hold comma-decimal numbers as doubles.
///
/// A column converts only when every non-null value matches the pattern, so
/// genuinely textual columns pass through untouched. Nulls are preserved.
fn convert_decimal_commas(batch: &RecordBatch) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(batch.num_columns());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

    for (field, column) in batch.schema().fields().iter().zip(batch.columns()) {
        if field.data_type() != &DataType::Utf8 {
            fields.push(field.as_ref().clone());
            columns.push(column.clone());
            continue;
        }

        let strings = column
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| InsightError::Internal("expected Utf8 column".into()))?;

        let all_numeric = (0..strings.len())
            .filter(|&i| strings.is_valid(i))
            .all(|i| DECIMAL_COMMA.is_match(strings.value(i)));
        let has_values = (0..strings.len()).any(|i| strings.is_valid(i));

        if all_numeric && has_values {
            let doubles: Float64Array = (0..strings.len())
                .map(|i| {
                    if strings.is_valid(i) {
                        strings.value(i).replace(',', ".").parse::<f64>().ok()
                    } else {
                        None
                    }
                })
                .collect();
            fields.push(Field::new(field.name(), DataType::Float64, true));
            columns.push(Arc::new(doubles));
        } else {
            fields.push(field.as_ref().clone());
            columns.push(column.clone());
        }
    }

    Ok(RecordBatch::try_new(
        Arc::new(Schema::new(fields)),
        columns,
    )?)
}
