pub mod init;
mod schema;
pub mod validation;

pub use init::write_default_config;
pub use schema::{Config, WorldConfig, DEFAULT_STEP};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/arc-ptt/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join("arc-ptt"))
        .unwrap_or_else(|| PathBuf::from(".arc-ptt"))
}

/// Get the default config file path (~/.config/arc-ptt/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path
///   (~/.config/arc-ptt/config.yaml)
///
/// Relative paths inside the file are resolved against the file's directory.
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `arc-ptt init --catalog <charts.json>` to create one",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let mut config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| {
            format!(
                "Failed to parse config: invalid YAML in {}",
                config_path.display()
            )
        })?;

    let base = config_path.parent().unwrap_or(Path::new("."));
    config.resolve_paths(base);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_config_errors() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("config.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_resolves_against_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "catalog: charts.json\nworld:\n  step: 75\n").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.catalog, dir.path().join("charts.json"));
        assert_eq!(config.world.step, 75.0);
    }

    #[test]
    fn test_load_invalid_yaml_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "catalog: [unclosed\n").unwrap();
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
