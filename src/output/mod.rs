mod formatter;

pub use formatter::{
    format_currency, format_gauge, format_report, score_band, should_use_colors,
};
