use std::path::PathBuf;
use std::time::Duration;

use crate::{error::Error, Result};

const DEFAULT_ENGINE: &str = "tectonic";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAIN_FILENAME: &str = "main.tex";

/// Process-wide engine configuration.
///
/// Constructed once at startup and passed explicitly into the service;
/// nothing in the core consults the environment afterwards, and there is
/// no per-request override.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine binary: a bare name resolved on `PATH`, or an explicit path.
    pub engine: String,
    /// Hard wall-clock budget for one engine invocation.
    pub timeout: Duration,
    /// Fixed filename the primary source is persisted under.
    pub main_filename: String,
    /// On-disk cache directory exposed to the engine via
    /// `TECTONIC_CACHE_DIR`. Shared across requests; the engine owns its
    /// concurrency safety.
    pub cache_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            main_filename: DEFAULT_MAIN_FILENAME.to_string(),
            cache_dir: std::env::temp_dir().join("tectonic-cache"),
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    ///
    /// Recognized variables, each optional: `LATEX_ENGINE`,
    /// `LATEX_TIMEOUT_SECONDS`, `LATEX_MAIN_FILENAME`, `TECTONIC_CACHE_DIR`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let timeout = match lookup("LATEX_TIMEOUT_SECONDS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    Error::Config(format!("LATEX_TIMEOUT_SECONDS is not a number: {raw:?}"))
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.timeout,
        };

        Ok(Self {
            engine: lookup("LATEX_ENGINE").unwrap_or(defaults.engine),
            timeout,
            main_filename: lookup("LATEX_MAIN_FILENAME").unwrap_or(defaults.main_filename),
            cache_dir: lookup("TECTONIC_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_operable_with_zero_configuration() {
        let config = EngineConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.engine, "tectonic");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.main_filename, "main.tex");
        assert!(config.cache_dir.ends_with("tectonic-cache"));
    }

    #[test]
    fn environment_overrides_are_honored() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("LATEX_ENGINE", "lualatex"),
            ("LATEX_TIMEOUT_SECONDS", "5"),
            ("LATEX_MAIN_FILENAME", "paper.tex"),
            ("TECTONIC_CACHE_DIR", "/var/cache/tectonic"),
        ]);
        let config = EngineConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.engine, "lualatex");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.main_filename, "paper.tex");
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/tectonic"));
    }

    #[test]
    fn unparsable_timeout_is_a_config_error() {
        let result =
            EngineConfig::from_lookup(|key| (key == "LATEX_TIMEOUT_SECONDS").then(|| "soon".into()));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
