pub mod client;
pub mod config;
pub mod prompt;

pub use client::{render_stream, strip_markup, NarrativeClient, FALLBACK_NARRATIVE};
pub use config::NarrativeConfig;
pub use prompt::build_prompt;
