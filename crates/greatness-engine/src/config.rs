//! Configuration loading and typed config structures for a Greatness run.
//!
//! The canonical configuration lives in `greatness-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure and a loader that reads the file. Every field has a
//! default, so an empty document is a valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level run configuration.
///
/// Mirrors the structure of `greatness-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Seed and tick cadence.
    #[serde(default)]
    pub world: WorldConfig,

    /// Save slot location and autosave cadence.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Content table source.
    #[serde(default)]
    pub content: ContentConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Run boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Seed of the event RNG. Identical seeds and inputs reproduce a run.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Save slot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Path of the save file.
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,

    /// Seconds between autosaves. Zero disables autosave.
    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            autosave_interval_secs: default_autosave_interval_secs(),
        }
    }
}

/// Content table source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentConfig {
    /// YAML content file. `None` uses the bundled default tables.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (`"trace"`, `"debug"`,
    /// `"info"`, `"warn"`, `"error"`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Run boundary parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum ticks before the run stops (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Maximum wall-clock seconds before the run stops (0 = unlimited).
    #[serde(default = "default_max_real_time_seconds")]
    pub max_real_time_seconds: u64,

    /// Finalize pending phase transitions as soon as they appear.
    ///
    /// A headless run has no presentation layer to play the transition,
    /// so the runner stands in for it when this is set.
    #[serde(default = "default_true")]
    pub auto_finalize_transitions: bool,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: 0,
            max_real_time_seconds: default_max_real_time_seconds(),
            auto_finalize_transitions: default_true(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    100
}

fn default_save_path() -> PathBuf {
    PathBuf::from("greatness-save.json")
}

const fn default_autosave_interval_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_max_real_time_seconds() -> u64 {
    86_400
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.tick_interval_ms, 100);
        assert_eq!(config.persistence.autosave_interval_secs, 30);
        assert!(config.content.path.is_none());
        assert!(config.simulation.auto_finalize_transitions);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  seed: 123
  tick_interval_ms: 250

persistence:
  save_path: "/tmp/run.json"
  autosave_interval_secs: 10

content:
  path: "content/custom.yaml"

logging:
  level: "debug"
  json: true

simulation:
  max_ticks: 500
  max_real_time_seconds: 60
  auto_finalize_transitions: false
"#;

        let config = EngineConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.seed, 123);
        assert_eq!(config.world.tick_interval_ms, 250);
        assert_eq!(config.persistence.save_path, PathBuf::from("/tmp/run.json"));
        assert_eq!(
            config.content.path,
            Some(PathBuf::from("content/custom.yaml"))
        );
        assert!(config.logging.json);
        assert_eq!(config.simulation.max_ticks, 500);
        assert!(!config.simulation.auto_finalize_transitions);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "world:\n  seed: 7\n";
        let config = EngineConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        // Seed is overridden
        assert_eq!(config.world.seed, 7);
        // Everything else uses defaults
        assert_eq!(config.world.tick_interval_ms, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_empty_yaml() {
        let config = EngineConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("greatness-config.yaml");
        if path.exists() {
            let config = EngineConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
