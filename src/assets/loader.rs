use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::types::{parse_amount, AssetRow};
use crate::scoring::model::WealthModel;

pub const ASSET_TYPE_COLUMN: &str = "Asset Type";
pub const BEFORE_COLUMN: &str = "Before Planning";
pub const AFTER_COLUMN: &str = "After Planning";

/// Fatal problems with the asset table. Anything recoverable (unknown
/// options, missing selector columns) is a warning instead.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("row {row} ({asset}), column '{column}': cannot read '{value}' as an amount: {reason}")]
    InvalidAmount {
        row: usize,
        asset: String,
        column: String,
        value: String,
        reason: String,
    },

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("failed to read asset table: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Rows parsed from an asset table plus the non-fatal findings made on the
/// way. The caller decides where the warnings go (stderr or the JSON
/// report).
#[derive(Debug)]
pub struct LoadedAssets {
    pub rows: Vec<AssetRow>,
    pub warnings: Vec<String>,
}

/// Read an asset table from a CSV file.
pub fn load_assets_file(path: &Path, model: &WealthModel) -> Result<LoadedAssets, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_assets(file, model)
}

/// Read an asset table from any CSV source.
///
/// Header resolution is by column name, not position: the three core columns
/// are required, each dimension's `"{key}: {label}"` selector column is
/// expected (one warning and an all-blank dimension if absent), and any
/// `"% {key} ..."` column is carried as an annotation. Selections that are
/// not among a dimension's declared options are kept out of scoring by the
/// engine; they are reported here, once per cell, so typos surface without
/// failing the run.
pub fn read_assets<R: Read>(reader: R, model: &WealthModel) -> Result<LoadedAssets, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column_index = |name: &str| headers.iter().position(|h| h == name);

    let asset_idx = column_index(ASSET_TYPE_COLUMN)
        .ok_or_else(|| InputError::MissingColumn(ASSET_TYPE_COLUMN.to_string()))?;
    let before_idx = column_index(BEFORE_COLUMN)
        .ok_or_else(|| InputError::MissingColumn(BEFORE_COLUMN.to_string()))?;
    let after_idx = column_index(AFTER_COLUMN)
        .ok_or_else(|| InputError::MissingColumn(AFTER_COLUMN.to_string()))?;

    let mut warnings = Vec::new();

    // Selector and annotation columns per dimension.
    let mut selector_indices: Vec<(String, Option<usize>)> = Vec::new();
    let mut override_indices: Vec<(String, usize)> = Vec::new();
    for dimension in &model.dimensions {
        let selector = dimension.selector_column();
        let idx = column_index(&selector);
        if idx.is_none() {
            warnings.push(format!(
                "column '{}' not found; {} will not be scored",
                selector, dimension.key
            ));
        }
        selector_indices.push((dimension.key.clone(), idx));

        let prefix = format!("% {}", dimension.key);
        if let Some(idx) = headers.iter().position(|h| h.starts_with(&prefix)) {
            override_indices.push((dimension.key.clone(), idx));
        }
    }

    let mut rows = Vec::new();
    for (record_no, record) in csv_reader.records().enumerate() {
        let record = record?;
        // 1-based, counting the header line the way a spreadsheet user would
        let row_no = record_no + 2;

        let asset_type = record.get(asset_idx).unwrap_or("").to_string();

        let amount = |idx: usize, column: &str| -> Result<f64, InputError> {
            let raw = record.get(idx).unwrap_or("");
            parse_amount(raw).map_err(|reason| InputError::InvalidAmount {
                row: row_no,
                asset: asset_type.clone(),
                column: column.to_string(),
                value: raw.to_string(),
                reason,
            })
        };

        let before_amount = amount(before_idx, BEFORE_COLUMN)?;
        let after_amount = amount(after_idx, AFTER_COLUMN)?;

        let mut selections = HashMap::new();
        for (key, idx) in &selector_indices {
            let Some(idx) = idx else { continue };
            let value = record.get(*idx).unwrap_or("").trim();
            if value.is_empty() {
                // Deliberately empty cell: excluded from this dimension,
                // nothing to report.
                continue;
            }
            let dimension = model.dimension(key);
            let declared = dimension
                .map(|d| d.options.iter().any(|o| o == value))
                .unwrap_or(false);
            if !declared {
                warnings.push(format!(
                    "row {} ({}): '{}' is not an option of {}; the row is left out of that dimension",
                    row_no, asset_type, value, key
                ));
            }
            // Kept even when undeclared: the engine buckets by declared
            // options only, so an unknown value scores nothing either way.
            selections.insert(key.clone(), value.to_string());
        }

        let mut percent_overrides = HashMap::new();
        for (key, idx) in &override_indices {
            let value = record.get(*idx).unwrap_or("").trim();
            if !value.is_empty() {
                percent_overrides.insert(key.clone(), value.to_string());
            }
        }

        rows.push(AssetRow {
            asset_type,
            before_amount,
            after_amount,
            selections,
            percent_overrides,
        });
    }

    Ok(LoadedAssets { rows, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> Result<LoadedAssets, InputError> {
        read_assets(csv.as_bytes(), &WealthModel::default())
    }

    const HEADER: &str = "Asset Type,Before Planning,After Planning,\
D1: Taxation on Funding,% D1 (if partially pre-tax),D2: Taxation on Growth,\
D3: Taxation on Distribution,D4: Taxation on Death,D5: Asset Protection,\
% D5 (if partially pre-tax),D6: Charitable Deduction";

    #[test]
    fn test_reads_full_rows() {
        let csv = format!(
            "{}\n\"Marketable Securities\",500000,0,Pre-Tax,0%,Taxable/Capital Gain,\
Taxable/Capital Gain,Yes,No,0%,No\n",
            HEADER
        );
        let loaded = read(&csv).unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.rows.len(), 1);

        let row = &loaded.rows[0];
        assert_eq!(row.asset_type, "Marketable Securities");
        assert_eq!(row.before_amount, 500000.0);
        assert_eq!(row.after_amount, 0.0);
        assert_eq!(row.selection("D1"), Some("Pre-Tax"));
        assert_eq!(row.selection("D6"), Some("No"));
        assert_eq!(row.percent_overrides.get("D1").map(String::as_str), Some("0%"));
    }

    #[test]
    fn test_blank_amounts_read_as_zero() {
        let csv = format!("{}\nAnnuity,,,After-Tax,,Tax-Deferred,Not taxable,Yes,Yes,,No\n", HEADER);
        let loaded = read(&csv).unwrap();
        assert_eq!(loaded.rows[0].before_amount, 0.0);
        assert_eq!(loaded.rows[0].after_amount, 0.0);
    }

    #[test]
    fn test_invalid_amount_names_row_and_column() {
        let csv = format!("{}\nAnnuity,12x,0,,,,,,,,\n", HEADER);
        let err = read(&csv).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("row 2"), "got: {}", message);
        assert!(message.contains("Annuity"), "got: {}", message);
        assert!(message.contains("Before Planning"), "got: {}", message);
        assert!(message.contains("12x"), "got: {}", message);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let csv = format!("{}\nAnnuity,100,-50,,,,,,,,\n", HEADER);
        let err = read(&csv).unwrap_err();
        assert!(err.to_string().contains("After Planning"));
    }

    #[test]
    fn test_missing_core_column_is_fatal() {
        let err = read("Asset Type,Before Planning\nX,100\n").unwrap_err();
        match err {
            InputError::MissingColumn(column) => assert_eq!(column, AFTER_COLUMN),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_option_warns_but_loads() {
        let csv = format!("{}\nAnnuity,100,100,Sorta Pre-Tax,,,,,,,\n", HEADER);
        let loaded = read(&csv).unwrap();
        assert_eq!(loaded.rows.len(), 1);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("Sorta Pre-Tax"));
        assert!(loaded.warnings[0].contains("D1"));
    }

    #[test]
    fn test_blank_selection_is_silent() {
        let csv = format!("{}\nAnnuity,100,100,,,,,,,,\n", HEADER);
        let loaded = read(&csv).unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.rows[0].selection("D1"), None);
    }

    #[test]
    fn test_missing_selector_column_warns_once() {
        // No D6 column at all.
        let csv = "Asset Type,Before Planning,After Planning,D1: Taxation on Funding\n\
A,100,100,Pre-Tax\nB,50,50,After-Tax\n";
        let loaded = read(csv).unwrap();
        let d6_warnings: Vec<_> = loaded
            .warnings
            .iter()
            .filter(|w| w.contains("D6"))
            .collect();
        assert_eq!(d6_warnings.len(), 1);
        // D2..D5 are missing too; one warning each, none per-row.
        assert_eq!(loaded.warnings.len(), 5);
        assert_eq!(loaded.rows.len(), 2);
    }

    #[test]
    fn test_empty_table_is_fine() {
        let loaded = read(&format!("{}\n", HEADER)).unwrap();
        assert!(loaded.rows.is_empty());
        assert!(loaded.warnings.is_empty());
    }
}
