//! Column metadata: declared types and statistical classification.
//!
//! Every dataset column carries a declared [`ColumnType`] and a derived
//! [`Classification`]. The classification is always recomputed as a pure
//! function of the declared type and is never set independently, so the two
//! can never drift apart.

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared semantic type of a column.
///
/// This is a closed set: user-supplied type names that do not match one of
/// the variants parse to `None` and leave the column without a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Free text or categorical labels.
    Text,
    /// 64-bit integer values.
    Integer,
    /// 64-bit floating point values.
    Decimal,
    /// Calendar dates without a time component.
    Date,
    /// Timestamps with date and time.
    DateTime,
}

impl ColumnType {
    /// Parses a user-supplied type name. Unrecognized names yield `None`
    /// rather than an error so callers can ignore unmapped entries.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Text" => Some(Self::Text),
            "Integer" => Some(Self::Integer),
            "Decimal" => Some(Self::Decimal),
            "Date" => Some(Self::Date),
            "DateTime" => Some(Self::DateTime),
            _ => None,
        }
    }

    /// Infers a declared type from a column's physical Arrow storage type.
    ///
    /// Storage types outside the mapping (booleans, nested types, ...) yield
    /// `None`: the column stays unclassified until the user declares a type.
    pub fn from_arrow(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Utf8 | DataType::LargeUtf8 => Some(Self::Text),
            DataType::Int64 => Some(Self::Integer),
            DataType::Float64 => Some(Self::Decimal),
            DataType::Date32 | DataType::Date64 => Some(Self::Date),
            DataType::Timestamp(_, _) => Some(Self::DateTime),
            _ => None,
        }
    }

    /// The Arrow storage type a column of this declared type coerces to.
    pub fn storage_type(&self) -> DataType {
        match self {
            Self::Text => DataType::Utf8,
            Self::Integer => DataType::Int64,
            Self::Decimal => DataType::Float64,
            Self::Date => DataType::Date32,
            Self::DateTime => {
                DataType::Timestamp(arrow::datatypes::TimeUnit::Nanosecond, None)
            }
        }
    }

    /// The statistical classification of a column with this declared type.
    ///
    /// This mapping is total: every declared type has exactly one
    /// classification.
    pub fn classification(&self) -> Classification {
        match self {
            Self::Text => Classification::QualitativeNominal,
            Self::Integer => Classification::QuantitativeDiscrete,
            Self::Decimal => Classification::QuantitativeContinuous,
            Self::Date => Classification::Date,
            Self::DateTime => Classification::DateTime,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "Text",
            Self::Integer => "Integer",
            Self::Decimal => "Decimal",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
        };
        write!(f, "{name}")
    }
}

/// The statistical classification derived from a declared [`ColumnType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Categorical data with no inherent ordering.
    QualitativeNominal,
    /// Numeric data taking discrete values.
    QuantitativeDiscrete,
    /// Numeric data on a continuous scale.
    QuantitativeContinuous,
    /// Calendar dates.
    Date,
    /// Timestamps.
    DateTime,
}

impl Classification {
    /// Whether this classification is qualitative.
    pub fn is_qualitative(&self) -> bool {
        matches!(self, Self::QualitativeNominal)
    }

    /// Whether this classification is quantitative.
    pub fn is_quantitative(&self) -> bool {
        matches!(
            self,
            Self::QuantitativeDiscrete | Self::QuantitativeContinuous
        )
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::QualitativeNominal => "Qualitative Nominal",
            Self::QuantitativeDiscrete => "Quantitative Discrete",
            Self::QuantitativeContinuous => "Quantitative Continuous",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
        };
        write!(f, "{name}")
    }
}

/// Metadata for a single dataset column.
///
/// The `classification` field is derived state: it is recomputed from
/// `declared_type` whenever metadata enters the analyzer, including metadata
/// supplied by an external editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name, unique within a dataset.
    pub name: String,
    /// Declared semantic type, absent for unrecognized storage types.
    pub declared_type: Option<ColumnType>,
    /// Classification derived from the declared type.
    pub classification: Option<Classification>,
}

impl ColumnMeta {
    /// Creates metadata with the given declared type. The classification is
    /// derived immediately.
    pub fn new(name: impl Into<String>, declared_type: Option<ColumnType>) -> Self {
        Self {
            name: name.into(),
            declared_type,
            classification: declared_type.map(|t| t.classification()),
        }
    }

    /// Infers metadata from a column's physical Arrow type.
    pub fn infer(name: impl Into<String>, data_type: &DataType) -> Self {
        Self::new(name, ColumnType::from_arrow(data_type))
    }

    /// Recomputes the classification from the declared type.
    ///
    /// Idempotent: reclassifying twice yields the same metadata.
    pub fn reclassify(&mut self) {
        self.classification = self.declared_type.map(|t| t.classification());
    }

    /// Formats this column as `name (type)` for listings.
    pub fn labeled(&self) -> String {
        match self.declared_type {
            Some(t) => format!("{} ({})", self.name, t),
            None => format!("{} (unknown)", self.name),
        }
    }
}
