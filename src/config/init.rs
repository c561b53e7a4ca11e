use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;

use crate::assets::loader::{AFTER_COLUMN, ASSET_TYPE_COLUMN, BEFORE_COLUMN};
use crate::scoring::WealthModel;

/// Commented starter config. Everything is optional; the file exists mostly
/// so the knobs are discoverable.
pub const CONFIG_TEMPLATE: &str = "\
# wealth-score configuration.
# All settings are optional; remove the leading '#' to override a default.

# Default asset table used when --assets is not given:
assets_file: assets.csv

# Narrative service (OpenAI-compatible chat completions):
# narrative:
#   model: gpt-4o
#   base_url: https://api.openai.com/v1
#   temperature: 0.1
#   timeout: 60s
#   retries: 3

# The six-dimension wealth model can be overridden with a `model:` section;
# run `wealth-score score --json` against an empty table to see its shape.
";

/// The starter asset table: one row per asset type the planning form offers,
/// pre-filled with a worked "before vs after" example.
const STARTER_ROWS: &[[&str; 11]] = &[
    [
        "Marketable Securities (Non-Qualified)", "500000", "0",
        "Pre-Tax", "0%", "Taxable/Capital Gain", "Taxable/Capital Gain", "Yes", "No", "0%", "No",
    ],
    [
        "Private Equity (Non-Qualified)", "50000", "50000",
        "After-Tax", "0%", "Taxable/Ordinary Income", "Taxable/Capital Gain", "Yes", "No", "0%", "No",
    ],
    [
        "Real Estate (Non-Qualified)", "860000", "400000",
        "After-Tax", "0%", "Taxable/Capital Gain", "Taxable/Capital Gain", "Yes", "No", "0%", "No",
    ],
    [
        "Hedge Fund (Non-Qualified)", "0", "0",
        "After-Tax", "0%", "Taxable/Ordinary Income", "Taxable/Capital Gain", "Yes", "No", "0%", "No",
    ],
    [
        "Credit (Non-Qualified)", "0", "0",
        "After-Tax", "0%", "Taxable/Ordinary Income", "Taxable/Capital Gain", "Yes", "No", "0%", "No",
    ],
    [
        "Marketable Securities (Qualified)", "0", "100000",
        "Pre-Tax", "0%", "Tax-Deferred", "Taxable/Capital Gain", "Yes", "Yes", "0%", "No",
    ],
    [
        "Life Insurance (Qualified)", "0", "30000",
        "Pre-Tax", "0%", "Tax-Deferred", "Not taxable", "Yes", "Yes", "0%", "No",
    ],
    [
        "Annuity (Qualified)", "0", "0",
        "Pre-Tax", "0%", "Tax-Deferred", "Taxable/Capital Gain", "Yes", "Yes", "0%", "No",
    ],
    [
        "Deferred Comp, SERP, or other (Non-Qualified)", "0", "0",
        "Pre-Tax", "0%", "Tax-Deferred", "Taxable/Ordinary Income", "Yes", "No", "0%", "No",
    ],
    [
        "Roth IRA, Roth 401k, Roth Annuity", "0", "400000",
        "After-Tax", "50%", "Tax-Free", "Not taxable", "Yes", "Partially", "50%", "No",
    ],
    [
        "Life Insurance", "0", "0",
        "After-Tax", "0%", "Tax-Deferred", "Not taxable", "Yes", "Yes", "0%", "No",
    ],
    [
        "Split-Dollar Life Insurance", "0", "100000",
        "After-Tax", "0%", "Tax-Deferred", "Not taxable", "Yes", "Yes", "0%", "No",
    ],
    [
        "Annuity", "0", "100000",
        "After-Tax", "0%", "Tax-Deferred", "Taxable/Capital Gain", "Yes", "Partially", "0%", "No",
    ],
    [
        "Private Business", "0", "0",
        "After-Tax", "0%", "Taxable/Ordinary Income", "Taxable/Capital Gain", "Yes", "No", "0%", "No",
    ],
    [
        "Stock Options", "0", "0",
        "After-Tax", "0%", "Tax-Deferred", "Taxable/Capital Gain", "Yes", "No", "0%", "No",
    ],
    [
        "Artwork / Collectibles", "0", "0",
        "After-Tax", "0%", "Tax-Deferred", "Taxable/Capital Gain", "Yes", "No", "0%", "No",
    ],
    [
        "Digital Assets", "0", "0",
        "After-Tax", "0%", "Taxable/Ordinary Income", "Taxable/Capital Gain", "Yes", "No", "0%", "No",
    ],
    [
        "Charitable", "0", "230000",
        "Pre-Tax", "0%", "Tax-Free", "Not taxable", "Yes", "Yes", "0%", "Yes",
    ],
];

/// Build the starter asset CSV. The header is derived from the model so the
/// selector columns can never drift from what the loader expects.
pub fn starter_assets_csv() -> String {
    let model = WealthModel::default();

    let mut header = vec![
        ASSET_TYPE_COLUMN.to_string(),
        BEFORE_COLUMN.to_string(),
        AFTER_COLUMN.to_string(),
    ];
    for dimension in &model.dimensions {
        header.push(dimension.selector_column());
        if dimension.key == "D1" || dimension.key == "D5" {
            header.push(format!("% {} (if partially pre-tax)", dimension.key));
        }
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    // Static header/rows of known shape written to a Vec; cannot fail.
    writer.write_record(&header).expect("write csv header");
    for row in STARTER_ROWS {
        writer.write_record(row.iter()).expect("write csv row");
    }
    let bytes = writer.into_inner().expect("flush csv");
    String::from_utf8(bytes).expect("csv is utf-8")
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    print!("{} [{}]: ", message, hint);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    let input = input.trim().to_lowercase();

    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(())
}

fn write_with_confirmation(path: &Path, content: &str, force: bool) -> Result<bool> {
    if path.exists() && !force {
        let overwrite = prompt_yes_no(&format!("{} exists. Overwrite?", path.display()), false)?;
        if !overwrite {
            println!("Kept {}", path.display());
            return Ok(false);
        }
    }
    write_atomically(path, content)?;
    println!("Wrote {}", path.display());
    Ok(true)
}

/// Create the starter files: an asset table at `assets_path` and the config
/// template in the config directory. Existing files are kept unless the user
/// confirms (or --force skips the question).
pub fn run_init(assets_path: &Path, force: bool) -> Result<()> {
    write_with_confirmation(assets_path, &starter_assets_csv(), force)?;

    crate::config::ensure_config_dir()?;
    let config_path = crate::config::get_config_path();
    write_with_confirmation(&config_path, CONFIG_TEMPLATE, force)?;

    println!();
    println!("Next: edit {} and run `wealth-score score`", assets_path.display());
    Ok(())
}
