use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::narrative::NarrativeConfig;
use crate::scoring::WealthModel;

/// Top-level config file. Everything is optional: with no config file at
/// all, the canonical wealth model and narrative defaults apply.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default asset table, used when --assets is not given
    #[serde(default)]
    pub assets_file: Option<PathBuf>,

    /// Wealth model override; omit to use the canonical six dimensions
    #[serde(default)]
    pub model: Option<WealthModel>,

    /// Narrative service settings
    #[serde(default)]
    pub narrative: Option<NarrativeConfig>,
}

impl Config {
    pub fn wealth_model(&self) -> WealthModel {
        self.model.clone().unwrap_or_default()
    }

    pub fn narrative(&self) -> NarrativeConfig {
        self.narrative.clone().unwrap_or_default()
    }
}
