use std::collections::HashSet;

use super::model::WealthModel;

/// Check a wealth model for configuration problems.
///
/// Everything reported here is a warning, not an error: the engine has a
/// defined behavior for all of it (missing score entries read as 0, odd
/// weights just shift the score band), so the run proceeds. All findings are
/// collected at once rather than stopping at the first.
pub fn validate_model(model: &WealthModel) -> Vec<String> {
    let mut warnings = Vec::new();

    let weight_total: f64 = model.dimensions.iter().map(|d| d.weight).sum();
    if (weight_total - 1.0).abs() > 1e-9 {
        warnings.push(format!(
            "model: dimension weights sum to {} instead of 1.0; overall scores will not be on a 0-100 scale",
            weight_total
        ));
    }

    let mut seen_keys = HashSet::new();
    for dimension in &model.dimensions {
        if !seen_keys.insert(dimension.key.as_str()) {
            warnings.push(format!(
                "model: duplicate dimension key '{}'",
                dimension.key
            ));
        }

        if !dimension.weight.is_finite() || dimension.weight < 0.0 {
            warnings.push(format!(
                "model.{}: weight {} is not a non-negative number",
                dimension.key, dimension.weight
            ));
        }

        if dimension.options.is_empty() {
            warnings.push(format!(
                "model.{}: no options declared; the dimension can never score",
                dimension.key
            ));
        }

        let mut seen_options = HashSet::new();
        for option in &dimension.options {
            if !seen_options.insert(option.as_str()) {
                warnings.push(format!(
                    "model.{}: duplicate option '{}'",
                    dimension.key, option
                ));
            }

            // A declared option with no score entry silently scores 0.
            let has_entry = model
                .scores
                .0
                .get(&dimension.key)
                .map(|options| options.contains_key(option))
                .unwrap_or(false);
            if !has_entry {
                warnings.push(format!(
                    "model.{}: option '{}' has no score entry; it will score 0",
                    dimension.key, option
                ));
            }
        }
    }

    // Score entries that point at nothing are usually typos.
    for (key, options) in &model.scores.0 {
        match model.dimension(key) {
            None => warnings.push(format!(
                "model.scores: entry for unknown dimension '{}'",
                key
            )),
            Some(dimension) => {
                for option in options.keys() {
                    if !dimension.options.contains(option) {
                        warnings.push(format!(
                            "model.scores.{}: entry for undeclared option '{}'",
                            key, option
                        ));
                    }
                }
            }
        }
    }

    warnings
}
