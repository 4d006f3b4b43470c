//! Configuration loading and resolution.
//!
//! Lookup order for the config file: explicit path, `YIELDWATCH_CONFIG`,
//! then `./.yieldwatch/config.json`. With no file, built-in defaults apply.
//! Command-line flags are layered on top with [`SimulationConfig::apply`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Env var naming a config file.
pub const CONFIG_ENV: &str = "YIELDWATCH_CONFIG";

/// Project-local config file, relative to the working directory.
const LOCAL_CONFIG: &str = ".yieldwatch/config.json";

/// Default herd, in id order.
pub const DEFAULT_NAMES: [&str; 10] = [
    "Mimosa", "Estrela", "Luzia", "Jurema", "Mariana", "Bela", "Lola", "Nina", "Lia", "Dora",
];

/// Errors raised while loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Parameters of the simulated herd and of the analyses run over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of monitored subjects.
    pub subjects: usize,
    /// Readings generated per subject.
    pub readings_per_subject: usize,
    /// Centre of the generated quantities.
    pub mean_production: i64,
    /// Exclusive bound of the offset from the mean.
    pub max_oscillation: i64,
    /// Display names, assigned in id order.
    pub names: Vec<String>,
    /// Pattern searched for by `pattern` and `run`.
    pub pattern: Vec<i64>,
    /// Mean at or above which a subject is classified high.
    pub threshold: f64,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            subjects: 10,
            readings_per_subject: 10,
            mean_production: 20,
            max_oscillation: 5,
            names: DEFAULT_NAMES.iter().map(|n| n.to_string()).collect(),
            pattern: vec![18, 20],
            threshold: 20.0,
            seed: None,
        }
    }
}

/// Per-invocation overrides from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub seed: Option<u64>,
    pub subjects: Option<usize>,
    pub readings_per_subject: Option<usize>,
    pub pattern: Option<Vec<i64>>,
    pub threshold: Option<f64>,
}

impl SimulationConfig {
    /// Read a config file. Missing fields fall back to defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Layer command-line overrides on top of this config.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(subjects) = overrides.subjects {
            self.subjects = subjects;
        }
        if let Some(readings) = overrides.readings_per_subject {
            self.readings_per_subject = readings;
        }
        if let Some(pattern) = &overrides.pattern {
            self.pattern = pattern.clone();
        }
        if let Some(threshold) = overrides.threshold {
            self.threshold = threshold;
        }
    }

    /// Reject configurations the generator or the engine cannot honour.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.subjects == 0 {
            return Err(ConfigError::Invalid("subjects must be at least 1".into()));
        }
        if self.readings_per_subject == 0 {
            return Err(ConfigError::Invalid(
                "readings_per_subject must be at least 1".into(),
            ));
        }
        if self.max_oscillation < 1 {
            return Err(ConfigError::Invalid(format!(
                "max_oscillation must be at least 1, got {}",
                self.max_oscillation
            )));
        }
        if self.mean_production < self.max_oscillation {
            return Err(ConfigError::Invalid(format!(
                "mean_production {} is below max_oscillation {}; quantities could go negative",
                self.mean_production, self.max_oscillation
            )));
        }
        if !self.threshold.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Display name for the subject at zero-based `index`.
    pub fn name_for(&self, index: usize) -> String {
        self.names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Subject {}", index + 1))
    }
}

/// Resolve the config file path, if any.
pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if !env_path.trim().is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return Some(local);
    }

    None
}

/// Resolve, read, override, and validate the configuration.
pub fn load_config(
    explicit: Option<&str>,
    overrides: &ConfigOverrides,
) -> ConfigResult<SimulationConfig> {
    let mut config = match resolve_config_path(explicit) {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            SimulationConfig::from_file(&path)?
        }
        None => {
            tracing::debug!("No config file found, using defaults");
            SimulationConfig::default()
        }
    };

    config.apply(overrides);
    config.validate()?;
    Ok(config)
}

/// Parse a comma-separated pattern such as `18,20`.
pub fn parse_pattern(raw: &str) -> ConfigResult<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|e| ConfigError::Invalid(format!("bad pattern value '{part}': {e}")))
        })
        .collect()
}
