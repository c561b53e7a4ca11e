mod init;
mod schema;

pub use init::{run_init, starter_assets_csv, CONFIG_TEMPLATE};
pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/wealth-score/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("wealth-score")
}

/// Get the default config file path (~/.config/wealth-score/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Ensure the config directory exists
pub fn ensure_config_dir() -> Result<()> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create config directory at {}",
                config_dir.display()
            )
        })?;
    }
    Ok(())
}

/// Load configuration from a YAML file.
///
/// With no explicit path, a missing default config file simply means
/// defaults — only a path the user asked for has to exist. Unparseable
/// YAML is an error either way.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path(), false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let missing = env::temp_dir().join("wealth_score_no_such_config.yaml");
        let _ = fs::remove_file(&missing);
        assert!(load_config(Some(missing)).is_err());
    }

    #[test]
    fn test_loads_yaml_from_explicit_path() {
        let path = env::temp_dir().join("wealth_score_test_config.yaml");
        fs::write(&path, "assets_file: table.csv\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(
            config.assets_file.as_deref(),
            Some(std::path::Path::new("table.csv"))
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let path = env::temp_dir().join("wealth_score_bad_config.yaml");
        fs::write(&path, "model: [unclosed\n").unwrap();
        assert!(load_config(Some(path.clone())).is_err());
        let _ = fs::remove_file(&path);
    }
}
