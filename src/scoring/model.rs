use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dimension key of the charitable-deduction dimension.
///
/// Charitable planning is modeled as a pure addition: an asset only becomes
/// charitable through planning, so this dimension never earns a
/// before-planning score.
pub const CHARITABLE_KEY: &str = "D6";

/// One scoring dimension: a tax or protection axis an asset is classified on.
///
/// Declared order matters twice over: dimensions are scored and reported in
/// the order they appear in the model, and options are bucketed in the order
/// they appear in `options`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DimensionConfig {
    /// Stable identifier ("D1".."D6")
    pub key: String,

    /// Human-readable name, also part of the input column header
    pub label: String,

    /// The discrete values an asset can hold on this dimension
    pub options: Vec<String>,

    /// Fraction of the 100-point overall score allocated to this dimension.
    /// The six canonical weights sum to 1.0.
    pub weight: f64,
}

impl DimensionConfig {
    /// Header of the input column that selects this dimension's option,
    /// e.g. `"D1: Taxation on Funding"`.
    pub fn selector_column(&self) -> String {
        format!("{}: {}", self.key, self.label)
    }

    /// Whether assets earn a before-planning score on this dimension.
    /// False only for the charitable dimension.
    pub fn scores_before(&self) -> bool {
        self.key != CHARITABLE_KEY
    }
}

/// Per-dimension option scores.
///
/// Wrapped so the missing-entry behavior lives in one place: an option absent
/// from the table scores 0, it is never an error. Validation reports gaps as
/// warnings separately.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct OptionScoreTable(pub HashMap<String, HashMap<String, f64>>);

impl OptionScoreTable {
    /// Score for an option within a dimension, 0.0 when either key is absent.
    pub fn score_for(&self, dimension: &str, option: &str) -> f64 {
        self.0
            .get(dimension)
            .and_then(|options| options.get(option))
            .copied()
            .unwrap_or(0.0)
    }
}

/// The complete wealth model: dimensions plus their option scores.
///
/// An immutable value passed into the engine on every call. The default is
/// the canonical six-dimension model; a config file may override it.
///
/// Example YAML override:
/// ```yaml
/// model:
///   dimensions:
///     - key: D1
///       label: Taxation on Funding
///       options: ["Pre-Tax", "Partially Pre-Tax", "After-Tax"]
///       weight: 0.20
///   scores:
///     D1: { "Pre-Tax": 3, "Partially Pre-Tax": 2, "After-Tax": 1 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WealthModel {
    pub dimensions: Vec<DimensionConfig>,
    pub scores: OptionScoreTable,
}

impl WealthModel {
    /// Look up a dimension by key.
    pub fn dimension(&self, key: &str) -> Option<&DimensionConfig> {
        self.dimensions.iter().find(|d| d.key == key)
    }
}

fn dim(key: &str, label: &str, options: &[&str], weight: f64) -> DimensionConfig {
    DimensionConfig {
        key: key.to_string(),
        label: label.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        weight,
    }
}

fn scores(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(option, score)| (option.to_string(), *score))
        .collect()
}

impl Default for WealthModel {
    fn default() -> Self {
        let dimensions = vec![
            dim(
                "D1",
                "Taxation on Funding",
                &["Pre-Tax", "Partially Pre-Tax", "After-Tax"],
                0.20,
            ),
            dim(
                "D2",
                "Taxation on Growth",
                &[
                    "Taxable/Ordinary Income",
                    "Taxable/Capital Gain",
                    "Tax-Deferred",
                    "Tax-Free",
                ],
                0.20,
            ),
            dim(
                "D3",
                "Taxation on Distribution",
                &[
                    "Taxable/Ordinary Income",
                    "Taxable/Capital Gain",
                    "Not taxable",
                ],
                0.20,
            ),
            dim("D4", "Taxation on Death", &["Yes", "No"], 0.20),
            dim("D5", "Asset Protection", &["Yes", "No", "Partially"], 0.10),
            dim("D6", "Charitable Deduction", &["Yes", "No"], 0.10),
        ];

        let mut table = HashMap::new();
        table.insert(
            "D1".to_string(),
            scores(&[("Pre-Tax", 3.0), ("Partially Pre-Tax", 2.0), ("After-Tax", 1.0)]),
        );
        table.insert(
            "D2".to_string(),
            scores(&[
                ("Taxable/Capital Gain", 1.0),
                ("Taxable/Ordinary Income", 2.0),
                ("Tax-Deferred", 3.0),
                ("Tax-Free", 4.0),
            ]),
        );
        table.insert(
            "D3".to_string(),
            scores(&[
                ("Taxable/Ordinary Income", 1.0),
                ("Taxable/Capital Gain", 2.0),
                ("Not taxable", 3.0),
            ]),
        );
        table.insert("D4".to_string(), scores(&[("Yes", 1.0), ("No", 2.0)]));
        table.insert(
            "D5".to_string(),
            scores(&[("Yes", 3.0), ("Partially", 2.0), ("No", 1.0)]),
        );
        table.insert("D6".to_string(), scores(&[("Yes", 2.0), ("No", 1.0)]));

        Self {
            dimensions,
            scores: OptionScoreTable(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_has_six_dimensions() {
        let model = WealthModel::default();
        assert_eq!(model.dimensions.len(), 6);
        let keys: Vec<&str> = model.dimensions.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["D1", "D2", "D3", "D4", "D5", "D6"]);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let model = WealthModel::default();
        let total: f64 = model.dimensions.iter().map(|d| d.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_scores_cover_every_declared_option() {
        let model = WealthModel::default();
        for dimension in &model.dimensions {
            for option in &dimension.options {
                assert!(
                    model.scores.score_for(&dimension.key, option) > 0.0,
                    "missing score for {} / {}",
                    dimension.key,
                    option
                );
            }
        }
    }

    #[test]
    fn test_selector_column_format() {
        let model = WealthModel::default();
        let d1 = model.dimension("D1").unwrap();
        assert_eq!(d1.selector_column(), "D1: Taxation on Funding");
    }

    #[test]
    fn test_score_for_missing_entries_defaults_to_zero() {
        let model = WealthModel::default();
        assert_eq!(model.scores.score_for("D1", "Unheard Of"), 0.0);
        assert_eq!(model.scores.score_for("D99", "Pre-Tax"), 0.0);
    }

    #[test]
    fn test_only_charitable_dimension_skips_before_score() {
        let model = WealthModel::default();
        for dimension in &model.dimensions {
            if dimension.key == CHARITABLE_KEY {
                assert!(!dimension.scores_before());
            } else {
                assert!(dimension.scores_before());
            }
        }
    }

    #[test]
    fn test_model_yaml_roundtrip() {
        let model = WealthModel::default();
        let yaml = serde_saphyr::to_string(&model).unwrap();
        let parsed: WealthModel = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(model, parsed);
    }
}
