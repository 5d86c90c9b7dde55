//! Configuration for the scheduler.
//!
//! `SchedulerConfig` is the author-facing form of [`Parameters`]: plain
//! fields, loadable from TOML, JSON or YAML files and from environment
//! variables, or started from a [`Preset`]. Validation happens in
//! [`SchedulerConfig::into_parameters`].

mod preset;

pub use preset::Preset;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{RecallError, RecallResult};
use crate::params::{
    Parameters, DEFAULT_ENABLE_FUZZ, DEFAULT_ENABLE_SHORT_TERM, DEFAULT_LEARNING_STEPS,
    DEFAULT_MAXIMUM_INTERVAL, DEFAULT_RELEARNING_STEPS, DEFAULT_REQUEST_RETENTION,
};
use crate::types::LearningStep;

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Target probability of recall at the due date, in (0, 1].
    pub request_retention: f64,
    /// Longest interval the scheduler will grant, in days.
    pub maximum_interval: i64,
    /// Weights (17, 19 or 21 entries). Defaults to the FSRS-6 weights.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<Vec<f64>>,
    /// Randomize review intervals within a bounded window.
    pub enable_fuzz: bool,
    /// Use learning steps for new and lapsed cards.
    pub enable_short_term: bool,
    pub learning_steps: Vec<LearningStep>,
    pub relearning_steps: Vec<LearningStep>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            request_retention: DEFAULT_REQUEST_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            w: None,
            enable_fuzz: DEFAULT_ENABLE_FUZZ,
            enable_short_term: DEFAULT_ENABLE_SHORT_TERM,
            learning_steps: DEFAULT_LEARNING_STEPS.to_vec(),
            relearning_steps: DEFAULT_RELEARNING_STEPS.to_vec(),
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> RecallResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| RecallError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| RecallError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| RecallError::Configuration(e.to_string())),
            _ => Err(RecallError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Start from a preset's values.
    pub fn from_preset(preset: Preset) -> Self {
        preset.config()
    }

    /// Load configuration from environment variables on top of the defaults,
    /// or on top of `RECALL_PRESET` when it names a preset.
    ///
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        let mut config = env_value::<Preset>("RECALL_PRESET")
            .map(Self::from_preset)
            .unwrap_or_default();

        if let Some(retention) = env_value::<f64>("RECALL_REQUEST_RETENTION") {
            config.request_retention = retention;
        }
        if let Some(max) = env_value::<i64>("RECALL_MAXIMUM_INTERVAL") {
            config.maximum_interval = max;
        }
        if let Some(fuzz) = env_value::<bool>("RECALL_ENABLE_FUZZ") {
            config.enable_fuzz = fuzz;
        }
        if let Some(short_term) = env_value::<bool>("RECALL_ENABLE_SHORT_TERM") {
            config.enable_short_term = short_term;
        }

        config
    }

    /// Default location of the config file: `~/.recall/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".recall"))
            .unwrap_or_else(|| PathBuf::from(".recall"))
            .join("config.toml")
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> SchedulerConfigBuilder {
        SchedulerConfigBuilder::default()
    }

    /// Validate and convert into scheduler parameters.
    pub fn into_parameters(self) -> RecallResult<Parameters> {
        Parameters::try_from(self)
    }
}

fn env_value<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable environment value");
            None
        }
    }
}

/// Builder for SchedulerConfig.
#[derive(Default)]
pub struct SchedulerConfigBuilder {
    config: SchedulerConfig,
}

impl SchedulerConfigBuilder {
    /// Reset every field to `preset`'s values. Setters called afterwards
    /// override the preset.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.config = preset.config();
        self
    }

    pub fn request_retention(mut self, retention: f64) -> Self {
        self.config.request_retention = retention;
        self
    }

    pub fn maximum_interval(mut self, days: i64) -> Self {
        self.config.maximum_interval = days;
        self
    }

    /// Set the weights (17, 19 or 21 entries).
    pub fn w(mut self, w: impl Into<Vec<f64>>) -> Self {
        self.config.w = Some(w.into());
        self
    }

    pub fn enable_fuzz(mut self, enable: bool) -> Self {
        self.config.enable_fuzz = enable;
        self
    }

    pub fn enable_short_term(mut self, enable: bool) -> Self {
        self.config.enable_short_term = enable;
        self
    }

    pub fn learning_steps(mut self, steps: Vec<LearningStep>) -> Self {
        self.config.learning_steps = steps;
        self
    }

    pub fn relearning_steps(mut self, steps: Vec<LearningStep>) -> Self {
        self.config.relearning_steps = steps;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> SchedulerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{WeightVector, DEFAULT_W};
    use crate::types::StepUnit;

    #[test]
    fn test_builder_sets_fields() {
        let config = SchedulerConfig::builder()
            .request_retention(0.85)
            .maximum_interval(365)
            .enable_fuzz(true)
            .enable_short_term(false)
            .learning_steps(vec![StepUnit::minutes(5).into()])
            .relearning_steps(Vec::new())
            .build();
        assert_eq!(config.request_retention, 0.85);
        assert_eq!(config.maximum_interval, 365);
        assert!(config.enable_fuzz);
        assert!(!config.enable_short_term);
        assert_eq!(config.learning_steps.len(), 1);
        assert!(config.relearning_steps.is_empty());
    }

    #[test]
    fn test_into_parameters_validates() {
        let bad = SchedulerConfig::builder().request_retention(1.5).build();
        assert!(bad.into_parameters().is_err());

        let bad_len = SchedulerConfig::builder().w(vec![0.5; 20]).build();
        assert!(bad_len.into_parameters().is_err());

        let ok = SchedulerConfig::builder().maximum_interval(100).build();
        assert_eq!(ok.into_parameters().unwrap().maximum_interval(), 100);
    }

    #[test]
    fn test_toml_with_partial_fields() {
        let config: SchedulerConfig = toml::from_str(
            r#"
request_retention = 0.8
learning_steps = ["2m", "15m", "1h"]
"#,
        )
        .unwrap();
        assert_eq!(config.request_retention, 0.8);
        assert_eq!(config.maximum_interval, DEFAULT_MAXIMUM_INTERVAL);
        assert_eq!(config.learning_steps.len(), 3);
        assert_eq!(config.relearning_steps, DEFAULT_RELEARNING_STEPS.to_vec());
    }

    #[test]
    fn test_builder_overrides_preset() {
        let config = SchedulerConfig::builder()
            .preset(Preset::LanguageLearner)
            .request_retention(0.93)
            .learning_steps(vec![StepUnit::minutes(1).into(), StepUnit::minutes(15).into()])
            .build();
        assert_eq!(config.request_retention, 0.93);
        assert_eq!(config.learning_steps.len(), 2);
        assert_eq!(
            config.relearning_steps,
            SchedulerConfig::from_preset(Preset::LanguageLearner).relearning_steps
        );
        assert_eq!(config.maximum_interval, DEFAULT_MAXIMUM_INTERVAL);

        let params = config.into_parameters().unwrap();
        assert_eq!(params.w(), &WeightVector::from(DEFAULT_W).migrate(2));

        let casual = SchedulerConfig::builder()
            .preset(Preset::CasualLearner)
            .enable_short_term(true)
            .build();
        assert!(casual.enable_short_term);
        assert_eq!(casual.request_retention, 0.85);

        let default = SchedulerConfig::builder()
            .preset(Preset::Default)
            .request_retention(0.91)
            .maximum_interval(1000)
            .build();
        assert_eq!(default.learning_steps, DEFAULT_LEARNING_STEPS.to_vec());
        assert_eq!(default.into_parameters().unwrap().w(), &DEFAULT_W);
    }

    #[test]
    fn test_default_path_ends_with_config_file() {
        let path = SchedulerConfig::default_path();
        assert!(path.ends_with(".recall/config.toml"));
    }
}
