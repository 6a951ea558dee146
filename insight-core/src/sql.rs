//! SQL identifier handling for queries built from column names.
//!
//! Analysis queries interpolate user-controlled column names into SQL text,
//! so every identifier is validated and quoted before use.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{InsightError, Result};

/// Maximum accepted identifier length.
const MAX_IDENTIFIER_LENGTH: usize = 128;

static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Letters, digits, underscores, spaces, dots and dashes; must not be
    // only whitespace. Quotes and control characters are rejected outright.
    Regex::new(r"^[\p{L}\p{N}_ .\-]+$").expect("identifier regex is valid")
});

/// Validates a column identifier without escaping it.
pub fn validate_identifier(identifier: &str) -> Result<()> {
    if identifier.is_empty() || identifier.trim().is_empty() {
        return Err(InsightError::Parse(
            "SQL identifier cannot be empty or whitespace-only".to_string(),
        ));
    }

    if identifier.len() > MAX_IDENTIFIER_LENGTH {
        return Err(InsightError::Parse(format!(
            "SQL identifier too long (max {MAX_IDENTIFIER_LENGTH} characters)"
        )));
    }

    if identifier.contains('\0') {
        return Err(InsightError::Parse(
            "SQL identifier cannot contain null bytes".to_string(),
        ));
    }

    if !IDENTIFIER_REGEX.is_match(identifier) {
        return Err(InsightError::Parse(format!(
            "SQL identifier '{identifier}' contains unsupported characters"
        )));
    }

    Ok(())
}

/// Validates and double-quotes a column identifier for interpolation into SQL.
///
/// # Examples
///
/// ```
/// use insight_core::sql::escape_identifier;
///
/// assert_eq!(escape_identifier("customer_id").unwrap(), "\"customer_id\"");
/// assert!(escape_identifier("id; DROP TABLE data--").is_err());
/// ```
pub fn escape_identifier(identifier: &str) -> Result<String> {
    validate_identifier(identifier)?;
    Ok(format!("\"{identifier}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_identifier() {
        assert_eq!(escape_identifier("Valores").unwrap(), "\"Valores\"");
        assert_eq!(
            escape_identifier("order total").unwrap(),
            "\"order total\""
        );
    }

    #[test]
    fn test_reject_injection_attempts() {
        assert!(escape_identifier("id; DROP TABLE data--").is_err());
        assert!(escape_identifier("col\"quoted").is_err());
        assert!(escape_identifier("").is_err());
        assert!(escape_identifier("   ").is_err());
        assert!(escape_identifier(&"x".repeat(200)).is_err());
    }

    #[test]
    fn test_accept_unicode_names() {
        assert!(escape_identifier("Preço").is_ok());
        assert!(escape_identifier("Categoria").is_ok());
    }
}
