use crate::{ConfigError, EmbedqlConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference.
const CONFIG_FILES: &[&str] = &[".embedqlrc", ".embedqlrc.json", "embedql.config.json"];

/// Find a config file by walking up the directory tree from `start_dir`.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::debug!(path = %config_path.display(), checked_dirs, "found config file");
                return Some(config_path);
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "no config file found");
            return None;
        }
    }
}

/// Load a config from the given path.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<EmbedqlConfig> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents, path)
}

/// Load a config from a string. The path is used for error messages only.
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<EmbedqlConfig> {
    let config: EmbedqlConfig =
        serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    validate_config(&config, path)?;
    Ok(config)
}

fn validate_config(config: &EmbedqlConfig, path: &Path) -> Result<()> {
    if config.cache.capacity == 0 {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            message: "cache.capacity must be at least 1".to_owned(),
        });
    }
    for directive in &config.client_directives {
        if directive.trim().is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: "client_directives entries must be non-empty".to_owned(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_minimal_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".embedqlrc");
        fs::write(&path, r#"{ "schema": "schema.graphql" }"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.schema.as_deref(), Some("schema.graphql"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let result = load_config_from_str("{ schema:", Path::new(".embedqlrc"));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_cache_capacity_is_rejected() {
        let result =
            load_config_from_str(r#"{ "cache": { "capacity": 0 } }"#, Path::new(".embedqlrc"));
        assert!(result.is_err());
    }

    #[test]
    fn find_config_in_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".embedqlrc.json");
        fs::write(&path, "{}").unwrap();

        assert_eq!(find_config(dir.path()), Some(path));
    }

    #[test]
    fn find_config_in_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embedql.config.json");
        fs::write(&path, "{}").unwrap();
        let sub = dir.path().join("src");
        fs::create_dir(&sub).unwrap();

        assert_eq!(find_config(&sub), Some(path));
    }

    #[test]
    fn file_priority_follows_the_candidate_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".embedqlrc"), "{}").unwrap();
        fs::write(dir.path().join("embedql.config.json"), "{}").unwrap();

        let found = find_config(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), ".embedqlrc");
    }

    #[test]
    fn find_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_config(dir.path()), None);
    }
}
