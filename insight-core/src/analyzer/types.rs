//! Value types produced by analysis operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the different value shapes a statistic can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum MetricValue {
    /// A floating-point statistic (e.g., mean, percentage).
    Double(f64),

    /// An integer statistic (e.g., count).
    Long(i64),

    /// A list of values (e.g., the outlier list).
    Values(Vec<f64>),
}

impl MetricValue {
    /// Attempts to get the numeric value as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Double(v) => Some(*v),
            MetricValue::Long(v) => Some(*v as f64),
            MetricValue::Values(_) => None,
        }
    }

    /// Attempts to get the value as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetricValue::Long(v) => Some(*v),
            MetricValue::Double(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    /// Attempts to get the value list.
    pub fn as_values(&self) -> Option<&[f64]> {
        match self {
            MetricValue::Values(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Double(v) => {
                if v.fract() == 0.0 {
                    write!(f, "{v:.0}")
                } else {
                    write!(f, "{v:.4}")
                }
            }
            MetricValue::Long(v) => write!(f, "{v}"),
            MetricValue::Values(v) => write!(f, "Values({} elements)", v.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_f64() {
        assert_eq!(MetricValue::Double(1.5).as_f64(), Some(1.5));
        assert_eq!(MetricValue::Long(3).as_f64(), Some(3.0));
        assert_eq!(MetricValue::Values(vec![1.0]).as_f64(), None);
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(MetricValue::Long(7).as_i64(), Some(7));
        assert_eq!(MetricValue::Double(7.0).as_i64(), Some(7));
        assert_eq!(MetricValue::Double(7.5).as_i64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(MetricValue::Double(2.0).to_string(), "2");
        assert_eq!(MetricValue::Double(2.25).to_string(), "2.2500");
        assert_eq!(MetricValue::Long(9).to_string(), "9");
    }

    #[test]
    fn test_json_round_trip() {
        let value = MetricValue::Values(vec![1.0, 100.0]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"type":"Values","value":[1.0,100.0]}"#);
        let back: MetricValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
