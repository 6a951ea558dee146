//! # Insight - Exploratory Data Analysis for Rust
//!
//! Insight is the analysis core of an exploratory data analysis tool. It
//! loads tabular data into memory, classifies each column by statistical
//! role, and answers a fixed repertoire of questions about the data: null
//! rates, frequency distributions, concentration of categorical values,
//! IQR outliers, descriptive statistics, contingency tables, grouped totals
//! and Pearson correlations. It leverages DataFusion for SQL-shaped scans
//! and Arrow for direct columnar access.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use insight_core::prelude::*;
//!
//! # async fn example() -> insight_core::error::Result<()> {
//! // Load a CSV file into an in-memory dataset
//! let dataset = CsvSource::from_path("data/sales.csv").load().await?;
//!
//! // Classify the columns and start asking questions
//! let analyzer = DatasetAnalyzer::new(dataset)?;
//!
//! let nulls = analyzer.null_percentage(None).await?;
//! println!("{}", nulls.text);
//!
//! for column in analyzer.quantitative_columns() {
//!     let outliers = analyzer.outliers(&column)?;
//!     println!("{}: {}", column, outliers.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Column classification
//!
//! Every analysis is gated on the column's classification, which is derived
//! from its declared type:
//!
//! - `Text` columns are **qualitative nominal**: frequency distribution,
//!   concentration of items, contingency tables
//! - `Integer` columns are **quantitative discrete** and `Decimal` columns
//!   **quantitative continuous**: outliers, descriptive statistics,
//!   correlations
//! - `Date` and `DateTime` columns keep their own classifications
//!
//! Callers may override the inferred types with their own metadata; the
//! classification is always recomputed from the declared type, so the two
//! can never disagree.
//!
//! ## Architecture
//!
//! - **`sources`**: data source connectors (CSV with delimiter and
//!   decimal-separator handling)
//! - **`dataset`**: the in-memory table plus its DataFusion session
//! - **`metadata`**: column types and their statistical classifications
//! - **`analyzer`**: the analysis repertoire
//! - **`error`**, **`logging`**, **`sql`**: ambient support

pub mod analyzer;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod prelude;
pub mod sources;
pub mod sql;
