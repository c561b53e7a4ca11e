use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One asset line from the planning table.
///
/// `asset_type` is a display label only; scoring reads the two amounts and
/// the per-dimension selections. `percent_overrides` carries the
/// `% D1` / `% D5` annotation columns verbatim — they are accepted in the
/// input schema for manual annotation but no scoring rule consumes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetRow {
    pub asset_type: String,
    pub before_amount: f64,
    pub after_amount: f64,
    /// Dimension key -> selected option. Blank cells are stored as absent.
    #[serde(default)]
    pub selections: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub percent_overrides: HashMap<String, String>,
}

impl AssetRow {
    /// Selected option for a dimension, if the cell held one.
    pub fn selection(&self, dimension_key: &str) -> Option<&str> {
        self.selections
            .get(dimension_key)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Parse a monetary cell into a non-negative amount.
///
/// Blank means exactly 0 — an intentionally empty cell, not an error.
/// A leading `$` and thousands separators are tolerated; anything else that
/// fails to parse as a finite non-negative number is rejected with a message
/// describing what was seen.
pub fn parse_amount(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let cleaned: String = trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != ',')
        .collect();

    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        Ok(value) if value < 0.0 => Err(format!("amount cannot be negative: {}", trimmed)),
        _ => Err(format!("not a number: {}", trimmed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_amount_is_zero() {
        assert_eq!(parse_amount("").unwrap(), 0.0);
        assert_eq!(parse_amount("   ").unwrap(), 0.0);
    }

    #[test]
    fn test_plain_amounts() {
        assert_eq!(parse_amount("500000").unwrap(), 500000.0);
        assert_eq!(parse_amount("0.00").unwrap(), 0.0);
        assert_eq!(parse_amount(" 42.5 ").unwrap(), 42.5);
    }

    #[test]
    fn test_currency_formatting_tolerated() {
        assert_eq!(parse_amount("$1,000.50").unwrap(), 1000.5);
        assert_eq!(parse_amount("$ 860,000").unwrap(), 860000.0);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = parse_amount("-5").unwrap_err();
        assert!(err.contains("negative"));
        assert!(parse_amount("$-100").is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12x").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn test_selection_treats_blank_as_absent() {
        let mut row = AssetRow {
            asset_type: "Real Estate".to_string(),
            before_amount: 0.0,
            after_amount: 0.0,
            selections: HashMap::new(),
            percent_overrides: HashMap::new(),
        };
        assert_eq!(row.selection("D1"), None);

        row.selections.insert("D1".to_string(), String::new());
        assert_eq!(row.selection("D1"), None);

        row.selections.insert("D1".to_string(), "Pre-Tax".to_string());
        assert_eq!(row.selection("D1"), Some("Pre-Tax"));
    }
}
