//! Directory resolution for the viewer binary.

use std::path::{Path, PathBuf};

use citadel_config::{ConfigError, default_config_dir};

const APP_NAME: &str = "citadel";

/// OS-specific directories used by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// Holds the JSON log file in debug builds.
    pub log_dir: PathBuf,
}

impl AppDirs {
    /// Resolve directories without creating them.
    ///
    /// `config_override` replaces the platform config directory; logs then
    /// live beside it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if no override is given and the OS
    /// does not expose a configuration directory.
    pub fn resolve(config_override: Option<&Path>) -> Result<Self, ConfigError> {
        let config_dir = match config_override {
            Some(dir) => dir.to_path_buf(),
            None => default_config_dir()?,
        };
        let log_dir = match (config_override, dirs::data_local_dir()) {
            (None, Some(data)) => data.join(APP_NAME).join("logs"),
            _ => config_dir.join("logs"),
        };
        Ok(Self {
            config_dir,
            log_dir,
        })
    }

    /// Create both directories on disk.
    pub fn create_dirs(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.config_dir).map_err(ConfigError::WriteError)?;
        std::fs::create_dir_all(&self.log_dir).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_keeps_logs_beside_config() {
        let dirs = AppDirs::resolve(Some(Path::new("/tmp/citadel-test"))).unwrap();
        assert_eq!(dirs.config_dir, PathBuf::from("/tmp/citadel-test"));
        assert_eq!(dirs.log_dir, PathBuf::from("/tmp/citadel-test/logs"));
    }

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join(APP_NAME);
        let dirs = AppDirs::resolve(Some(&root)).unwrap();
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
        assert!(dirs.config_dir.starts_with(tmp.path()));
    }
}
