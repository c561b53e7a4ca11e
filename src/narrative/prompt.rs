use crate::assets::types::AssetRow;
use crate::scoring::{ScoreResult, WealthModel};

/// Marker preceding the embedded score JSON; everything after it is the
/// serialized `ScoreResult`.
pub const SCORES_HEADER: &str = "Computed scores (JSON):";

/// Build the narrative request prompt.
///
/// One self-contained text block: the advisor instruction, the asset table
/// as entered (including the unused percentage annotations), the scoring
/// model, and the computed result verbatim as JSON. The service sees exactly
/// what the engine produced, so the narrative cannot quote numbers the
/// report does not show.
pub fn build_prompt(rows: &[AssetRow], model: &WealthModel, result: &ScoreResult) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a wealth-planning advisor. Using the asset table, the scoring model and \
the computed scores below, write a short narrative for the client: summarize how the \
planned reallocation changes their overall wealth score, call out the dimensions with \
the largest movement, and recommend what to discuss with their advisor next. \
Write plain prose without markdown formatting.\n\n",
    );

    prompt.push_str("Asset table (before planning / after planning):\n");
    for row in rows {
        prompt.push_str(&format!(
            "- {}: ${:.2} / ${:.2}",
            row.asset_type, row.before_amount, row.after_amount
        ));
        for dimension in &model.dimensions {
            if let Some(option) = row.selection(&dimension.key) {
                prompt.push_str(&format!("; {}={}", dimension.key, option));
            }
        }
        for (key, value) in &row.percent_overrides {
            prompt.push_str(&format!("; %{}={}", key, value));
        }
        prompt.push('\n');
    }
    if rows.is_empty() {
        prompt.push_str("(no assets entered)\n");
    }

    prompt.push_str("\nScoring model:\n");
    for dimension in &model.dimensions {
        prompt.push_str(&format!(
            "- {} \"{}\" (weight {}): ",
            dimension.key, dimension.label, dimension.weight
        ));
        let option_scores: Vec<String> = dimension
            .options
            .iter()
            .map(|option| {
                format!(
                    "{}={}",
                    option,
                    model.scores.score_for(&dimension.key, option)
                )
            })
            .collect();
        prompt.push_str(&option_scores.join(", "));
        prompt.push('\n');
    }

    prompt.push('\n');
    prompt.push_str(SCORES_HEADER);
    prompt.push('\n');
    // ScoreResult serialization is infallible: plain structs and finite f64s.
    prompt.push_str(&serde_json::to_string_pretty(result).unwrap_or_default());
    prompt.push('\n');

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score;
    use std::collections::HashMap;

    fn sample_rows() -> Vec<AssetRow> {
        vec![
            AssetRow {
                asset_type: "Real Estate".to_string(),
                before_amount: 860000.0,
                after_amount: 400000.0,
                selections: HashMap::from([
                    ("D1".to_string(), "After-Tax".to_string()),
                    ("D6".to_string(), "No".to_string()),
                ]),
                percent_overrides: HashMap::from([("D1".to_string(), "0%".to_string())]),
            },
            AssetRow {
                asset_type: "Charitable".to_string(),
                before_amount: 0.0,
                after_amount: 230000.0,
                selections: HashMap::from([("D6".to_string(), "Yes".to_string())]),
                percent_overrides: HashMap::new(),
            },
        ]
    }

    #[test]
    fn test_prompt_embeds_table_model_and_scores() {
        let model = WealthModel::default();
        let rows = sample_rows();
        let result = score(&rows, &model);
        let prompt = build_prompt(&rows, &model, &result);

        assert!(prompt.contains("Real Estate: $860000.00 / $400000.00"));
        assert!(prompt.contains("D6=Yes"));
        assert!(prompt.contains("%D1=0%"));
        assert!(prompt.contains("D2 \"Taxation on Growth\" (weight 0.2)"));
        assert!(prompt.contains("Tax-Free=4"));
        assert!(prompt.contains(SCORES_HEADER));
    }

    #[test]
    fn test_embedded_scores_roundtrip_exactly() {
        let model = WealthModel::default();
        let rows = sample_rows();
        let result = score(&rows, &model);
        let prompt = build_prompt(&rows, &model, &result);

        let json = prompt
            .split_once(SCORES_HEADER)
            .map(|(_, rest)| rest)
            .unwrap();
        let parsed: ScoreResult = serde_json::from_str(json.trim()).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_empty_table_prompt_still_wellformed() {
        let model = WealthModel::default();
        let result = score(&[], &model);
        let prompt = build_prompt(&[], &model, &result);
        assert!(prompt.contains("(no assets entered)"));
        assert!(prompt.contains(SCORES_HEADER));
    }
}
