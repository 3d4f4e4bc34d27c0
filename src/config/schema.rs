use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_STEP: f64 = 50.0;

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// catalog: charts.json
/// world_maps: maps.json
/// default_user: hikari
/// world:
///   step: 60
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Chart catalog JSON. Relative paths are taken from the config file's directory.
    pub catalog: PathBuf,

    /// Where profiles live (default: ~/.config/arc-ptt/profiles)
    #[serde(default)]
    pub profiles_dir: Option<PathBuf>,

    /// World map chapters JSON, needed only for map based commands
    #[serde(default)]
    pub world_maps: Option<PathBuf>,

    /// Profile used when no --user is given
    #[serde(default)]
    pub default_user: Option<String>,

    #[serde(default)]
    pub world: WorldConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WorldConfig {
    /// Partner step used when a command does not give one
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_step() -> f64 {
    DEFAULT_STEP
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
        }
    }
}

impl Config {
    /// Anchor relative paths at `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let anchor = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        anchor(&mut self.catalog);
        if let Some(dir) = self.profiles_dir.as_mut() {
            anchor(dir);
        }
        if let Some(maps) = self.world_maps.as_mut() {
            anchor(maps);
        }
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.profiles_dir
            .clone()
            .unwrap_or_else(crate::profile::get_profiles_dir)
    }
}
