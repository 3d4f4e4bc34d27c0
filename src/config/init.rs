use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config, WorldConfig};

/// Write a starter config pointing at `catalog`.
///
/// If `path` is None the default config path is used. An existing file is
/// only overwritten with `force`. Returns the path written.
pub fn write_default_config(
    path: Option<PathBuf>,
    catalog: &Path,
    world_maps: Option<&Path>,
    force: bool,
) -> Result<PathBuf> {
    let config_path = path.unwrap_or_else(get_config_path);

    if config_path.exists() && !force {
        bail!(
            "Config already exists at {}. Pass --force to overwrite",
            config_path.display()
        );
    }

    let config = Config {
        catalog: catalog.to_path_buf(),
        profiles_dir: None,
        world_maps: world_maps.map(Path::to_path_buf),
        default_user: None,
        world: WorldConfig::default(),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    log::info!("Config written to {}", config_path.display());
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let catalog = dir.path().join("charts.json");

        let written = write_default_config(Some(path.clone()), &catalog, None, false).unwrap();
        assert_eq!(written, path);

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.catalog, catalog);
        assert!(config.world_maps.is_none());
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let catalog = dir.path().join("charts.json");
        write_default_config(Some(path.clone()), &catalog, None, false).unwrap();

        assert!(write_default_config(Some(path.clone()), &catalog, None, false).is_err());
        let maps = dir.path().join("maps.json");
        write_default_config(Some(path.clone()), &catalog, Some(&maps), true).unwrap();
        assert_eq!(load_config(Some(path)).unwrap().world_maps, Some(maps));
    }
}
