use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.catalog.as_os_str().is_empty() {
        errors.push("catalog: must not be empty".to_string());
    } else if !config.catalog.exists() {
        errors.push(format!(
            "catalog: file not found at {}",
            config.catalog.display()
        ));
    }

    if let Some(ref maps) = config.world_maps {
        if !maps.exists() {
            errors.push(format!("world_maps: file not found at {}", maps.display()));
        }
    }

    if let Some(ref dir) = config.profiles_dir {
        if dir.exists() && !dir.is_dir() {
            errors.push(format!(
                "profiles_dir: {} is not a directory",
                dir.display()
            ));
        }
    }

    if let Some(ref user) = config.default_user {
        if user.trim().is_empty() {
            errors.push("default_user: must not be blank".to_string());
        }
    }

    let step = config.world.step;
    if !step.is_finite() || step <= 0.0 {
        errors.push(format!("world.step: must be a positive number, got {}", step));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
