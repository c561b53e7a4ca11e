use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assets::types::AssetRow;
use crate::scoring::{score, ScoreResult, WealthModel};

/// One scoring run, packaged for consumers: the charting collaborators read
/// the JSON form, the narrative prompt embeds the result, the terminal
/// formatter renders it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Non-fatal findings from input loading and model validation. Populated
    /// in JSON output mode (where stderr is not part of the contract);
    /// otherwise the warnings went to stderr and this stays empty.
    pub warnings: Vec<String>,
    pub result: ScoreResult,
}

/// Score the rows and bundle the outcome with the given warnings.
pub fn build_report(rows: &[AssetRow], model: &WealthModel, warnings: Vec<String>) -> Report {
    Report {
        generated_at: Utc::now(),
        warnings,
        result: score(rows, model),
    }
}

/// Pretty JSON for machine consumers.
pub fn to_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}
