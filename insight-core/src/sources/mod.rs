//! Data source connectors.
//!
//! A source turns external bytes into an in-memory [`Dataset`] ready for
//! analysis. CSV is the only format at the moment; the trait keeps the seam
//! open for others.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::dataset::Dataset;
use crate::error::Result;

mod csv;

pub use csv::{CsvOptions, CsvSource, DecimalSeparator, Delimiter};

/// Something that can be loaded into a [`Dataset`].
///
/// # Examples
///
/// ```rust,ignore
/// use insight_core::sources::{CsvSource, DataSource};
///
/// # async fn example() -> insight_core::error::Result<()> {
/// let source = CsvSource::from_path("data/sales.csv");
/// let dataset = source.load().await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DataSource: Debug + Send + Sync {
    /// Reads the source in full and materializes it as a dataset.
    ///
    /// Implementations handle schema inference and any format-specific
    /// normalization before the data reaches the analyzer.
    async fn load(&self) -> Result<Dataset>;

    /// A human-readable description of this source.
    fn description(&self) -> String;
}
