use super::types::{Profile, PROFILE_VERSION};
use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Default profile directory (~/.config/arc-ptt/profiles/)
pub fn get_profiles_dir() -> PathBuf {
    crate::config::get_config_dir().join("profiles")
}

fn profile_path(dir: &Path, username: &str) -> Result<PathBuf> {
    let username = username.trim();
    if username.is_empty()
        || username.starts_with('.')
        || username.contains(['/', '\\'])
    {
        bail!("Invalid profile name '{}'", username);
    }
    Ok(dir.join(format!("{}.json", username)))
}

/// Load a profile by username.
///
/// Fails if the file is missing, unreadable, or has an unsupported version.
pub fn load_profile(dir: &Path, username: &str) -> Result<Profile> {
    let path = profile_path(dir, username)?;
    let file = File::open(&path)
        .with_context(|| format!("Failed to open profile {} at {}", username, path.display()))?;

    let profile: Profile = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load profile from {}", path.display()))?;

    if profile.version != PROFILE_VERSION {
        bail!("Unsupported profile version: {}", profile.version);
    }

    Ok(profile)
}

/// Load a profile, or start an empty one if none exists yet.
pub fn load_or_create_profile(dir: &Path, username: &str) -> Result<Profile> {
    if !profile_path(dir, username)?.exists() {
        log::debug!("No profile named {}, starting a new one", username);
        return Ok(Profile::new(username.trim()));
    }
    load_profile(dir, username)
}

/// Save a profile atomically, creating the directory if needed.
pub fn save_profile(dir: &Path, profile: &Profile) -> Result<()> {
    let path = profile_path(dir, &profile.username)?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create profile directory at {}", dir.display()))?;

    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, profile).context("Failed to serialize profile")?;

    file.commit().context("Failed to save profile")?;

    Ok(())
}

/// Usernames of every valid profile in `dir`, sorted. Unreadable files are skipped.
pub fn list_profiles(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read profile directory {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match load_profile(dir, stem) {
            Ok(profile) => names.push(profile.username),
            Err(e) => log::warn!("Ignoring {}: {:#}", path.display(), e),
        }
    }
    names.sort();
    Ok(names)
}

/// Create the profile if needed and store its in-game potential.
pub fn update_potential(dir: &Path, username: &str, potential: f64) -> Result<Profile> {
    if !potential.is_finite() || potential < 0.0 {
        bail!("Invalid potential {}", potential);
    }
    let mut profile = load_or_create_profile(dir, username)?;
    profile.set_potential(potential);
    save_profile(dir, &profile)?;
    Ok(profile)
}
