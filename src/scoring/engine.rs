use serde::{Deserialize, Serialize};

use super::model::WealthModel;
use crate::assets::types::AssetRow;

/// One option's share of a dimension, before and after planning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionScore {
    pub option: String,
    pub before_amount: f64,
    pub after_amount: f64,
    /// Share of total wealth holding this option, rounded to 4 decimals
    pub before_fraction: f64,
    pub after_fraction: f64,
    /// Weighted score contribution, rounded to 2 decimals
    pub before_score: f64,
    pub after_score: f64,
}

/// A dimension's full breakdown, options in declared order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimensionScore {
    pub key: String,
    pub label: String,
    pub options: Vec<OptionScore>,
    pub total_before_score: f64,
    pub total_after_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverallScore {
    pub before_score: f64,
    pub after_score: f64,
}

/// Complete output of one scoring pass. Built fresh per invocation and never
/// mutated; the terminal report, JSON output and narrative prompt all consume
/// this same structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    pub total_before_amount: f64,
    pub total_after_amount: f64,
    pub dimensions: Vec<DimensionScore>,
    pub overall: OverallScore,
}

/// Round to 4 decimal places (fractions).
fn round_fraction(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Round to 2 decimal places (scores).
fn round_score(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score an asset table against a wealth model.
///
/// Pure function of its inputs: no I/O, no shared state, safe to call
/// concurrently. Rows whose selection for a dimension is blank or not among
/// the declared options simply contribute to no option bucket there — the
/// input boundary warns about unknown values, the math ignores them.
///
/// Each dimension distributes `weight * 100` points evenly across its
/// options, scaled by the option's score, then allocates each option's share
/// in proportion to the fraction of total wealth holding it. Both planning
/// states are normalized against the same grand totals. A zero grand total
/// yields fractions of exactly 0 rather than a division error.
///
/// Totals accumulate unrounded values; rounding (4 decimals for fractions,
/// 2 for scores) is applied to the outputs only, identically on every pass,
/// so serialized results are stable across runs.
pub fn score(rows: &[AssetRow], model: &WealthModel) -> ScoreResult {
    let total_before: f64 = rows.iter().map(|r| r.before_amount).sum();
    let total_after: f64 = rows.iter().map(|r| r.after_amount).sum();

    let mut dimensions = Vec::with_capacity(model.dimensions.len());
    let mut overall_before = 0.0;
    let mut overall_after = 0.0;

    for dimension in &model.dimensions {
        let option_count = dimension.options.len() as f64;
        let mut options = Vec::with_capacity(dimension.options.len());
        let mut dim_before = 0.0;
        let mut dim_after = 0.0;

        for option in &dimension.options {
            let mut before_sum = 0.0;
            let mut after_sum = 0.0;
            for row in rows {
                if row.selection(&dimension.key) == Some(option.as_str()) {
                    before_sum += row.before_amount;
                    after_sum += row.after_amount;
                }
            }

            let before_fraction = if total_before != 0.0 {
                before_sum / total_before
            } else {
                0.0
            };
            let after_fraction = if total_after != 0.0 {
                after_sum / total_after
            } else {
                0.0
            };

            let option_score = model.scores.score_for(&dimension.key, option);
            let unit = dimension.weight * 100.0 * option_score / option_count;

            let before_score = if dimension.scores_before() {
                unit * before_fraction
            } else {
                0.0
            };
            let after_score = unit * after_fraction;

            dim_before += before_score;
            dim_after += after_score;

            options.push(OptionScore {
                option: option.clone(),
                before_amount: before_sum,
                after_amount: after_sum,
                before_fraction: round_fraction(before_fraction),
                after_fraction: round_fraction(after_fraction),
                before_score: round_score(before_score),
                after_score: round_score(after_score),
            });
        }

        overall_before += dim_before;
        overall_after += dim_after;

        dimensions.push(DimensionScore {
            key: dimension.key.clone(),
            label: dimension.label.clone(),
            options,
            total_before_score: round_score(dim_before),
            total_after_score: round_score(dim_after),
        });
    }

    ScoreResult {
        total_before_amount: total_before,
        total_after_amount: total_after,
        dimensions,
        overall: OverallScore {
            before_score: round_score(overall_before),
            after_score: round_score(overall_after),
        },
    }
}
