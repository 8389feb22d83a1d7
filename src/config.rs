//! Optional TOML configuration file.
//!
//! ```toml
//! [generator]
//! records = 500
//! seed = 42
//!
//! [live]
//! tick = "250ms"
//! stress_rate = 1000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::perf::StressRate;

pub const DEFAULT_CONFIG_FILE: &str = "perfdash.toml";

const MAX_RECORDS: usize = 1_000_000;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashConfig {
    pub generator: GeneratorConfig,
    pub live: LiveConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub records: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            records: 500,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LiveConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub tick: Duration,
    pub stress_rate: StressRate,
}

impl Default for LiveConfig {
    fn default() -> Self {
        LiveConfig {
            tick: Duration::from_millis(250),
            stress_rate: StressRate::default(),
        }
    }
}

fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Duration, D::Error> {
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}

impl DashConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DashConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Load `explicit` if given, else `./perfdash.toml` when present, else
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };
        match path {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)
            }
            None => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.generator.records > MAX_RECORDS {
            return Err(Error::Config(format!(
                "generator.records must be at most {MAX_RECORDS}, got {}",
                self.generator.records
            )));
        }
        if self.live.tick.is_zero() {
            return Err(Error::Config("live.tick must be greater than zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(DashConfig::from_toml_str("").unwrap(), DashConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = DashConfig::from_toml_str(
            r#"
            [generator]
            seed = 7

            [live]
            tick = "1s"
            "#,
        )
        .unwrap();
        assert_eq!(config.generator.seed, 7);
        assert_eq!(config.generator.records, 500);
        assert_eq!(config.live.tick, Duration::from_secs(1));
        assert_eq!(config.live.stress_rate.get(), 1_000);
    }

    #[test]
    fn test_rejects_unknown_rate() {
        let err = DashConfig::from_toml_str("[live]\nstress_rate = 250\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)), "{err:?}");
    }

    #[test]
    fn test_rejects_zero_tick() {
        let err = DashConfig::from_toml_str("[live]\ntick = \"0s\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err:?}");
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(DashConfig::from_toml_str("[generator]\nrows = 5\n").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[generator]\nrecords = 12").unwrap();
        let config = DashConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.generator.records, 12);
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::CONFIG_ERROR);
    }
}
