//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a site's run
//! configuration from a YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

use super::types::RunConfig;

/// Loads and provides access to a run configuration.
///
/// Workbook paths in the file may be relative; they are resolved against the
/// directory containing the configuration file, so a site folder can be moved
/// as a whole.
///
/// # Example
///
/// ```no_run
/// use ears_fill::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/bmc.yaml").unwrap();
/// println!("Populating {} from {} sources", loader.config().site, loader.config().sources.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    config: RunConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing
    /// - The file contains invalid YAML
    /// - A required field (site, EARS path, source path) is missing
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let mut config = Self::load_yaml::<RunConfig>(path)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        resolve(base, &mut config.ears.path);
        for source in &mut config.sources {
            resolve(base, source.path_mut());
        }

        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the path the configuration was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> RunConfig {
        self.config
    }
}

fn resolve(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NameIndexMode, SavePolicy, SheetSelector, SourceConfig};

    fn config_path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("config").join(name)
    }

    #[test]
    fn test_load_bmc_config() {
        let loader = ConfigLoader::load(config_path("bmc.yaml")).unwrap();
        let config = loader.config();

        assert_eq!(config.site, "BMC");
        assert_eq!(config.save_policy, SavePolicy::EndOfRun);
        assert_eq!(config.ears.layout.first_anchor_row, 13);
        assert_eq!(config.sources.len(), 2);
        assert!(matches!(config.sources[0], SourceConfig::Block { .. }));
        assert!(matches!(config.sources[1], SourceConfig::Timed { .. }));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let loader = ConfigLoader::load(config_path("bmc.yaml")).unwrap();
        let config = loader.config();

        assert!(config.ears.path.starts_with(config_path("")));
        assert!(config.sources[0].path().starts_with(config_path("")));
    }

    #[test]
    fn test_load_mgb_config() {
        let config = ConfigLoader::load(config_path("mgb.yaml"))
            .unwrap()
            .into_config();

        assert_eq!(config.site, "MGB");
        assert_eq!(config.ears.name_index, NameIndexMode::PerSheet);
        assert!(matches!(config.sources[0], SourceConfig::BlockGrid { .. }));
        assert_eq!(
            config.sources[1].sheet(),
            &SheetSelector::Name("VA Clinic Report".to_string())
        );
    }

    #[test]
    fn test_missing_config_file() {
        let result = ConfigLoader::load("/nonexistent/path/site.yaml");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("site.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "site: BMC\nears: [unclosed\n").unwrap();

        let result = ConfigLoader::load(&path);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.yaml");
        fs::write(&path, "site: X\nears:\n  path: /data/EARS.xlsm\n").unwrap();

        let config = ConfigLoader::load(&path).unwrap().into_config();
        assert_eq!(config.ears.path, PathBuf::from("/data/EARS.xlsm"));
        assert!(config.sources.is_empty());
    }
}
