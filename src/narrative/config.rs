use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Narrative service settings.
///
/// Every field is optional in the config file; the defaults target an
/// OpenAI-compatible chat-completions endpoint.
///
/// Example YAML:
/// ```yaml
/// narrative:
///   model: gpt-4o
///   base_url: https://api.openai.com/v1
///   temperature: 0.1
///   timeout: 60s
///   retries: 3
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NarrativeConfig {
    /// Model identifier sent to the completion service
    #[serde(default)]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default)]
    pub base_url: Option<String>,

    /// Sampling temperature; kept low so narratives stay grounded in the
    /// numbers they are given
    #[serde(default)]
    pub temperature: Option<f64>,

    /// Connect timeout as a humantime string ("30s", "1m")
    #[serde(default)]
    pub timeout: Option<String>,

    /// Request attempts before giving up and falling back
    #[serde(default)]
    pub retries: Option<usize>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            model: Some("gpt-4o".to_string()),
            base_url: Some("https://api.openai.com/v1".to_string()),
            temperature: Some(0.1),
            timeout: Some("60s".to_string()),
            retries: Some(3),
        }
    }
}

impl NarrativeConfig {
    pub fn model_name(&self) -> &str {
        self.model.as_deref().unwrap_or("gpt-4o")
    }

    /// Full chat-completions endpoint URL.
    pub fn endpoint(&self) -> String {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1");
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(0.1)
    }

    pub fn retries(&self) -> usize {
        self.retries.unwrap_or(3)
    }

    /// Parsed connect timeout.
    pub fn timeout_duration(&self) -> Result<Duration, String> {
        match self.timeout.as_deref() {
            None => Ok(Duration::from_secs(60)),
            Some(raw) => humantime::parse_duration(raw)
                .map_err(|e| format!("invalid timeout '{}': {}", raw, e)),
        }
    }
}
