//! The in-memory tabular dataset backing an analysis session.
//!
//! A [`Dataset`] wraps an Arrow [`RecordBatch`] and registers it as the table
//! `data` inside a DataFusion [`SessionContext`], so analysis code can run
//! SQL scans against it the same way it would against any other source.
//!
//! Datasets are immutable by replacement: applying declared type coercions
//! produces a new `Dataset` value and the caller rebuilds its analyzer.

use std::fmt;
use std::sync::Arc;

use arrow::compute::cast;
use arrow::datatypes::{Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::prelude::SessionContext;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::metadata::ColumnMeta;

/// Name under which every dataset is registered in its session context.
pub(crate) const TABLE_NAME: &str = "data";

/// An immutable tabular dataset: an ordered sequence of named columns of
/// equal length, queryable through SQL.
#[derive(Clone)]
pub struct Dataset {
    batch: RecordBatch,
    ctx: SessionContext,
}

// SessionContext has no Debug impl, so report the batch shape instead.
impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("rows", &self.batch.num_rows())
            .field("columns", &self.batch.num_columns())
            .field("schema", &self.batch.schema())
            .finish_non_exhaustive()
    }
}

impl Dataset {
    /// Creates a dataset from a record batch and registers it for querying.
    pub fn new(batch: RecordBatch) -> Result<Self> {
        let ctx = SessionContext::new();
        let table = MemTable::try_new(batch.schema(), vec![vec![batch.clone()]])?;
        ctx.register_table(TABLE_NAME, Arc::new(table))?;
        Ok(Self { batch, ctx })
    }

    /// Creates a dataset by concatenating multiple batches of one schema.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let batch = arrow::compute::concat_batches(&schema, batches)?;
        Self::new(batch)
    }

    /// The underlying record batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// The session context holding this dataset as table `data`.
    pub fn ctx(&self) -> &SessionContext {
        &self.ctx
    }

    /// The dataset schema.
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.batch.num_columns()
    }

    /// Approximate memory footprint in bytes. Informational only.
    pub fn memory_bytes(&self) -> usize {
        self.batch.get_array_memory_size()
    }

    /// Ordered list of column names.
    pub fn column_names(&self) -> Vec<String> {
        self.schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// The first `rows` rows, for previews.
    pub fn sample(&self, rows: usize) -> RecordBatch {
        self.batch.slice(0, rows.min(self.batch.num_rows()))
    }

    /// Applies declared type coercions, producing a new dataset.
    ///
    /// Each column with a declared type is cast to that type's storage
    /// (Integer→Int64, Decimal→Float64, Text→Utf8, Date→Date32,
    /// DateTime→Timestamp). Columns without a declared type keep their
    /// current storage. Cast failures surface as Arrow errors.
    #[instrument(skip(self, metadata), fields(columns = self.column_count()))]
    pub fn coerce(&self, metadata: &[ColumnMeta]) -> Result<Dataset> {
        let schema = self.schema();
        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut arrays = Vec::with_capacity(schema.fields().len());

        for (idx, field) in schema.fields().iter().enumerate() {
            let declared = metadata
                .iter()
                .find(|m| m.name == *field.name())
                .and_then(|m| m.declared_type);

            match declared {
                Some(column_type) if field.data_type() != &column_type.storage_type() => {
                    let target = column_type.storage_type();
                    debug!(
                        column = %field.name(),
                        from = ?field.data_type(),
                        to = ?target,
                        "coercing column storage"
                    );
                    arrays.push(cast(self.batch.column(idx), &target)?);
                    fields.push(Field::new(field.name(), target, true));
                }
                _ => {
                    arrays.push(self.batch.column(idx).clone());
                    fields.push(field.as_ref().clone());
                }
            }
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Dataset::new(batch)
    }
}
