use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::report::Report;
use crate::scoring::{DimensionScore, ScoreResult};

/// Score bands matching the gauge charts the report mirrors:
/// below 20 is poor, 20 to 50 average, 50 and up good.
const POOR_BELOW: f64 = 20.0;
const GOOD_FROM: f64 = 50.0;

const GAUGE_WIDTH: usize = 40;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Band label for an overall score on the 0-100 scale.
pub fn score_band(score: f64) -> &'static str {
    if score < POOR_BELOW {
        "Poor"
    } else if score < GOOD_FROM {
        "Average"
    } else {
        "Good"
    }
}

/// Format a dollar amount with thousands separators: 1410000.5 -> "$1,410,000.50"
pub fn format_currency(value: f64) -> String {
    let cents = (value * 100.0).round() as i128;
    let whole = cents / 100;
    let fraction = (cents % 100).abs();

    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("${}.{:02}", grouped, fraction)
}

/// Render a 0-100 score as a text gauge with its band label.
pub fn format_gauge(score: f64, use_colors: bool) -> String {
    let clamped = score.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(GAUGE_WIDTH - filled);
    let band = score_band(score);

    if use_colors {
        let colored_bar = match band {
            "Poor" => format!("{}", bar.red()),
            "Average" => format!("{}", bar.yellow()),
            _ => format!("{}", bar.green()),
        };
        format!("{} {} ({})", colored_bar, format!("{:.2}", score).bold(), band)
    } else {
        format!("{} {:.2} ({})", bar, score, band)
    }
}

/// Truncate a label to fit a column, accounting for Unicode
fn truncate_label(label: &str, max_width: usize) -> String {
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= max_width {
        label.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn format_dimension_table(dimension: &DimensionScore, use_colors: bool, option_width: usize) -> String {
    let mut lines = Vec::new();

    let heading = format!("{}: {}", dimension.key, dimension.label);
    if use_colors {
        lines.push(format!("{}", heading.bold()));
    } else {
        lines.push(heading);
    }

    lines.push(format!(
        "  {:<width$}  {:>14} {:>7} {:>7}  {:>14} {:>7} {:>7}",
        "Option",
        "Before",
        "%",
        "Score",
        "After",
        "%",
        "Score",
        width = option_width
    ));

    for option in &dimension.options {
        lines.push(format!(
            "  {:<width$}  {:>14} {:>6.1}% {:>7.2}  {:>14} {:>6.1}% {:>7.2}",
            truncate_label(&option.option, option_width),
            format_currency(option.before_amount),
            option.before_fraction * 100.0,
            option.before_score,
            format_currency(option.after_amount),
            option.after_fraction * 100.0,
            option.after_score,
            width = option_width
        ));
    }

    let totals = format!(
        "  {:<width$}  {:>14} {:>7} {:>7.2}  {:>14} {:>7} {:>7.2}",
        "Total",
        "",
        "",
        dimension.total_before_score,
        "",
        "",
        dimension.total_after_score,
        width = option_width
    );
    if use_colors {
        lines.push(format!("{}", totals.dimmed()));
    } else {
        lines.push(totals);
    }

    lines.join("\n")
}

/// Render the full comparison report.
pub fn format_report(report: &Report, use_colors: bool) -> String {
    let result: &ScoreResult = &report.result;
    let mut sections = Vec::new();

    // Narrow terminals get a narrower option column; pipes get the full one.
    let option_width = match get_terminal_width() {
        Some(w) if w < 100 => 16,
        _ => 24,
    };

    sections.push(format!(
        "Total wealth before planning: {}\nTotal wealth after planning:  {}",
        format_currency(result.total_before_amount),
        format_currency(result.total_after_amount)
    ));

    sections.push(format!(
        "Overall score before planning\n  {}\nOverall score after planning\n  {}",
        format_gauge(result.overall.before_score, use_colors),
        format_gauge(result.overall.after_score, use_colors)
    ));

    for dimension in &result.dimensions {
        sections.push(format_dimension_table(dimension, use_colors, option_width));
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_report;
    use crate::scoring::WealthModel;
    use crate::assets::types::AssetRow;
    use std::collections::HashMap;

    fn sample_report() -> Report {
        let rows = vec![AssetRow {
            asset_type: "Securities".to_string(),
            before_amount: 1000.0,
            after_amount: 1000.0,
            selections: HashMap::from([("D1".to_string(), "Pre-Tax".to_string())]),
            percent_overrides: HashMap::new(),
        }];
        build_report(&rows, &WealthModel::default(), vec![])
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1000.5), "$1,000.50");
        assert_eq!(format_currency(1410000.0), "$1,410,000.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(123.0), "$123.00");
    }

    #[test]
    fn test_score_band_boundaries() {
        assert_eq!(score_band(0.0), "Poor");
        assert_eq!(score_band(19.99), "Poor");
        assert_eq!(score_band(20.0), "Average");
        assert_eq!(score_band(49.99), "Average");
        assert_eq!(score_band(50.0), "Good");
        assert_eq!(score_band(100.0), "Good");
    }

    #[test]
    fn test_gauge_shows_value_and_band() {
        let gauge = format_gauge(43.21, false);
        assert!(gauge.contains("43.21"));
        assert!(gauge.contains("Average"));
        assert_eq!(gauge.chars().filter(|c| *c == '█' || *c == '░').count(), GAUGE_WIDTH);
    }

    #[test]
    fn test_gauge_clamps_out_of_band_scores() {
        // Weights that don't sum to 1 can push scores past 100; the bar
        // saturates instead of overflowing.
        let gauge = format_gauge(140.0, false);
        assert!(gauge.contains("140.00"));
        assert_eq!(gauge.chars().filter(|c| *c == '░').count(), 0);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("Taxable/Ordinary Income", 12), "Taxable/O...");
    }

    #[test]
    fn test_report_lists_every_dimension() {
        let text = format_report(&sample_report(), false);
        for key in ["D1", "D2", "D3", "D4", "D5", "D6"] {
            assert!(text.contains(key), "missing {}", key);
        }
        assert!(text.contains("Taxation on Funding"));
        assert!(text.contains("Charitable Deduction"));
        assert!(text.contains("$1,000.00"));
    }

    #[test]
    fn test_plain_output_has_no_ansi_escapes() {
        let text = format_report(&sample_report(), false);
        assert!(!text.contains('\u{1b}'));
    }
}
