pub mod engine;
pub mod model;
pub mod validation;

pub use engine::{score, DimensionScore, OptionScore, OverallScore, ScoreResult};
pub use model::{DimensionConfig, OptionScoreTable, WealthModel, CHARITABLE_KEY};
pub use validation::validate_model;
