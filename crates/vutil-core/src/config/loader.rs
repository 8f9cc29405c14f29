//! Configuration file discovery and loading
//!
//! Precedence (low to high):
//! 1. Built-in defaults
//! 2. First existing candidate file (`./vutil.yaml`, `./vutil.yml`,
//!    then `<user config dir>/vutil/config.yaml`), or an explicit path
//! 3. Environment variables (`VUTIL_*` prefix)
//! 4. CLI flags (handled by caller)

use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use std::fs;

use super::VutilConfig;
use crate::error::{Error, Result};

/// Configuration file names searched in the working directory
pub const CONFIG_FILE_NAMES: &[&str] = &["vutil.yaml", "vutil.yml"];

/// Overrides `retry.retries`
pub const ENV_RETRIES: &str = "VUTIL_RETRIES";

/// Overrides `retry.backoff-seconds`
pub const ENV_BACKOFF_SECONDS: &str = "VUTIL_BACKOFF_SECONDS";

/// Locates and loads `VutilConfig`
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Candidate files, in lookup order
    candidates: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Loader searching the working directory, then the user config directory
    pub fn new() -> Result<Self> {
        let cwd = env::current_dir()?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))?;

        let mut candidates: Vec<Utf8PathBuf> =
            CONFIG_FILE_NAMES.iter().map(|name| cwd.join(name)).collect();
        if let Some(user_config) = Self::user_config_path() {
            candidates.push(user_config);
        }

        Ok(Self { candidates })
    }

    /// Loader with an explicit candidate list
    pub fn with_candidates(candidates: Vec<Utf8PathBuf>) -> Self {
        Self { candidates }
    }

    /// `<user config dir>/vutil/config.yaml`, if the platform has one
    pub fn user_config_path() -> Option<Utf8PathBuf> {
        let dir = dirs::config_dir()?;
        let dir = Utf8PathBuf::from_path_buf(dir).ok()?;
        Some(dir.join("vutil").join("config.yaml"))
    }

    /// Candidate files, in lookup order
    pub fn candidates(&self) -> &[Utf8PathBuf] {
        &self.candidates
    }

    /// First candidate that exists on disk
    pub fn locate(&self) -> Option<&Utf8Path> {
        self.candidates
            .iter()
            .find(|path| path.is_file())
            .map(|path| path.as_path())
    }

    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, the first existing
    /// candidate is used, and defaults apply when none exists. Environment
    /// overrides are applied last and the result is validated.
    pub fn load(&self, path: Option<&Utf8Path>) -> Result<VutilConfig> {
        let config = match path {
            Some(p) => Self::load_file(p)?,
            None => match self.locate() {
                Some(found) => Self::load_file(found)?,
                None => {
                    tracing::debug!("no configuration file found, using defaults");
                    VutilConfig::default()
                }
            },
        };

        let config = Self::apply_env_overrides(config)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a single YAML file
    fn load_file(path: &Utf8Path) -> Result<VutilConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        tracing::debug!(path = %path, "loading configuration");
        VutilConfig::from_yaml_str(&content).map_err(|e| match e {
            Error::YamlParse(err) => {
                Error::invalid_config(format!("Failed to parse {}: {}", path, err))
            }
            other => other,
        })
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: VutilConfig) -> Result<VutilConfig> {
        if let Ok(val) = env::var(ENV_RETRIES) {
            config.retry.retries = val.trim().parse().map_err(|_| {
                Error::invalid_config(format!("{} must be a non-negative integer", ENV_RETRIES))
            })?;
        }

        if let Ok(val) = env::var(ENV_BACKOFF_SECONDS) {
            config.retry.backoff_seconds = val.trim().parse().map_err(|_| {
                Error::invalid_config(format!("{} must be a valid number", ENV_BACKOFF_SECONDS))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use serial_test::serial;
    use tempfile::TempDir;

    fn temp_dir_utf8() -> (Utf8PathBuf, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        (path, temp_dir)
    }

    #[test]
    #[serial]
    fn test_defaults_without_files() {
        let (dir, _temp) = temp_dir_utf8();
        let loader = ConfigLoader::with_candidates(vec![dir.join("vutil.yaml")]);

        assert!(loader.locate().is_none());
        let config = loader.load(None).unwrap();
        assert_eq!(config, VutilConfig::default());
    }

    #[test]
    #[serial]
    fn test_first_existing_candidate_wins() {
        let (dir, _temp) = temp_dir_utf8();
        let local = dir.join("vutil.yaml");
        let user = dir.join("user").join("config.yaml");
        fs::create_dir_all(user.parent().unwrap()).unwrap();
        fs::write(&user, "retry:\n  retries: 1\n").unwrap();

        let loader = ConfigLoader::with_candidates(vec![local.clone(), user.clone()]);
        assert_eq!(loader.locate(), Some(user.as_path()));
        assert_eq!(loader.load(None).unwrap().retry.retries, 1);

        fs::write(&local, "retry:\n  retries: 6\n").unwrap();
        assert_eq!(loader.locate(), Some(local.as_path()));
        assert_eq!(loader.load(None).unwrap().retry.retries, 6);
    }

    #[test]
    #[serial]
    fn test_explicit_path_must_exist() {
        let (dir, _temp) = temp_dir_utf8();
        let loader = ConfigLoader::with_candidates(vec![]);

        let err = loader.load(Some(&dir.join("missing.yaml"))).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    #[serial]
    fn test_invalid_yaml_reports_path() {
        let (dir, _temp) = temp_dir_utf8();
        let path = dir.join("vutil.yaml");
        fs::write(&path, "retry: [not, a, map").unwrap();

        let err = ConfigLoader::with_candidates(vec![])
            .load(Some(&path))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(err.to_string().contains("vutil.yaml"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let (dir, _temp) = temp_dir_utf8();
        let path = dir.join("vutil.yaml");
        fs::write(&path, "retry:\n  retries: 3\n  backoff-seconds: 2\n").unwrap();

        env::set_var(ENV_RETRIES, "8");
        env::set_var(ENV_BACKOFF_SECONDS, "0.25");

        let config = ConfigLoader::with_candidates(vec![]).load(Some(&path));

        env::remove_var(ENV_RETRIES);
        env::remove_var(ENV_BACKOFF_SECONDS);

        assert_eq!(config.unwrap().retry, RetryPolicy::new(8, 0.25));
    }

    #[test]
    #[serial]
    fn test_invalid_env_override() {
        env::set_var(ENV_RETRIES, "many");

        let result = ConfigLoader::with_candidates(vec![]).load(None);

        env::remove_var(ENV_RETRIES);

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    #[serial]
    fn test_env_override_is_validated() {
        env::set_var(ENV_BACKOFF_SECONDS, "-2");

        let result = ConfigLoader::with_candidates(vec![]).load(None);

        env::remove_var(ENV_BACKOFF_SECONDS);

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    #[serial]
    fn test_new_searches_working_directory_first() {
        let loader = ConfigLoader::new().unwrap();
        let cwd = env::current_dir().unwrap();

        assert!(loader.candidates().len() >= CONFIG_FILE_NAMES.len());
        assert_eq!(
            loader.candidates()[0].as_std_path(),
            cwd.join("vutil.yaml").as_path()
        );
    }
}
