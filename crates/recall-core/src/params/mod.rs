//! Scheduler parameters: weights, retention target, interval cap, toggles
//! and learning steps.
//!
//! `Parameters` is immutable. Every change goes through a `with_*` setter
//! that validates, migrates the weights and recomputes the derived interval
//! modifier, returning a new value.

mod weights;

use serde::{Deserialize, Serialize};

pub use weights::{clamp_ranges, w17_w18_ceiling, WeightVector, Weights, WEIGHT_COUNT};

use crate::algorithm::math::{round8, DecayFactor};
use crate::config::SchedulerConfig;
use crate::error::{ErrorCode, RecallError, RecallResult};
use crate::types::{LearningStep, StepUnit};

/// Minimum stability, in days.
pub const S_MIN: f64 = 0.001;
/// Maximum stability, in days.
pub const S_MAX: f64 = 36500.0;
/// Upper bound for the initial stability weights w0..w3.
pub const INIT_S_MAX: f64 = 100.0;
/// Decay used by FSRS-4.5 and FSRS-5 weight vectors.
pub const FSRS5_DEFAULT_DECAY: f64 = 0.5;
/// Default decay of FSRS-6.
pub const FSRS6_DEFAULT_DECAY: f64 = 0.2;
/// Upper bound for w17/w18 with at most one relearning step.
pub const W17_W18_CEILING: f64 = 2.0;

pub const DEFAULT_REQUEST_RETENTION: f64 = 0.9;
pub const DEFAULT_MAXIMUM_INTERVAL: i64 = 36500;
/// Largest accepted `maximum_interval` (100 000 years), so due dates stay
/// well inside the calendar range.
pub const MAXIMUM_INTERVAL_LIMIT: i64 = 36_500_000;
pub const DEFAULT_ENABLE_FUZZ: bool = false;
pub const DEFAULT_ENABLE_SHORT_TERM: bool = true;

/// Default learning steps: 1 minute, then 10 minutes.
pub const DEFAULT_LEARNING_STEPS: [LearningStep; 2] = [
    LearningStep::Uniform(StepUnit::minutes(1)),
    LearningStep::Uniform(StepUnit::minutes(10)),
];

/// Default relearning steps: 10 minutes.
pub const DEFAULT_RELEARNING_STEPS: [LearningStep; 1] =
    [LearningStep::Uniform(StepUnit::minutes(10))];

/// FSRS-6 default weights.
pub const DEFAULT_W: Weights = [
    0.2172,
    1.1771,
    3.2602,
    16.1507,
    7.0114,
    0.57,
    2.0966,
    0.0069,
    1.5261,
    0.112,
    1.0178,
    1.849,
    0.1133,
    0.3127,
    2.2934,
    0.2191,
    3.0004,
    0.7536,
    0.3332,
    0.1437,
    FSRS6_DEFAULT_DECAY,
];

/// Validated, migrated scheduler parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchedulerConfig", into = "SchedulerConfig")]
pub struct Parameters {
    request_retention: f64,
    maximum_interval: i64,
    w: Weights,
    enable_fuzz: bool,
    enable_short_term: bool,
    learning_steps: Vec<LearningStep>,
    relearning_steps: Vec<LearningStep>,
    interval_modifier: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            request_retention: DEFAULT_REQUEST_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            w: DEFAULT_W,
            enable_fuzz: DEFAULT_ENABLE_FUZZ,
            enable_short_term: DEFAULT_ENABLE_SHORT_TERM,
            learning_steps: DEFAULT_LEARNING_STEPS.to_vec(),
            relearning_steps: DEFAULT_RELEARNING_STEPS.to_vec(),
            interval_modifier: raw_interval_modifier(
                DEFAULT_REQUEST_RETENTION,
                DEFAULT_W[20],
            ),
        }
    }
}

impl Parameters {
    /// Build parameters from author-facing configuration.
    ///
    /// # Errors
    /// Retention outside (0, 1], a maximum interval outside
    /// `1..=MAXIMUM_INTERVAL_LIMIT` days and weight vectors of unsupported
    /// length are validation errors.
    pub fn new(config: &SchedulerConfig) -> RecallResult<Self> {
        if !(1..=MAXIMUM_INTERVAL_LIMIT).contains(&config.maximum_interval) {
            return Err(RecallError::validation_with_suggestion(
                ErrorCode::ValInvalidInput,
                format!("Invalid maximum interval: {}", config.maximum_interval),
                format!("maximum_interval must be between 1 and {} days", MAXIMUM_INTERVAL_LIMIT),
            ));
        }

        let vector = match config.w.as_deref() {
            Some(w) => WeightVector::from_slice(w)?,
            None => WeightVector::from(DEFAULT_W),
        };
        let w = vector.migrate(config.relearning_steps.len());
        let interval_modifier = compute_interval_modifier(config.request_retention, w[20])?;

        Ok(Self {
            request_retention: config.request_retention,
            maximum_interval: config.maximum_interval,
            w,
            enable_fuzz: config.enable_fuzz,
            enable_short_term: config.enable_short_term,
            learning_steps: config.learning_steps.clone(),
            relearning_steps: config.relearning_steps.clone(),
            interval_modifier,
        })
    }

    pub fn request_retention(&self) -> f64 {
        self.request_retention
    }

    pub fn maximum_interval(&self) -> i64 {
        self.maximum_interval
    }

    /// Canonical 21-entry weight vector.
    pub fn w(&self) -> &Weights {
        &self.w
    }

    pub fn enable_fuzz(&self) -> bool {
        self.enable_fuzz
    }

    pub fn enable_short_term(&self) -> bool {
        self.enable_short_term
    }

    pub fn learning_steps(&self) -> &[LearningStep] {
        &self.learning_steps
    }

    pub fn relearning_steps(&self) -> &[LearningStep] {
        &self.relearning_steps
    }

    /// Multiplier from stability to the interval that hits the requested
    /// retention.
    pub fn interval_modifier(&self) -> f64 {
        self.interval_modifier
    }

    /// Curve decay and factor for the current decay weight.
    pub fn decay(&self) -> DecayFactor {
        DecayFactor::from_weight(self.w[20])
    }

    pub fn with_request_retention(&self, request_retention: f64) -> RecallResult<Self> {
        self.rebuild(|config| config.request_retention = request_retention)
    }

    pub fn with_maximum_interval(&self, maximum_interval: i64) -> RecallResult<Self> {
        self.rebuild(|config| config.maximum_interval = maximum_interval)
    }

    /// Replace the weights. Accepts 17, 19 or 21 entries.
    pub fn with_weights(&self, w: &[f64]) -> RecallResult<Self> {
        self.rebuild(|config| config.w = Some(w.to_vec()))
    }

    pub fn with_enable_fuzz(&self, enable_fuzz: bool) -> RecallResult<Self> {
        self.rebuild(|config| config.enable_fuzz = enable_fuzz)
    }

    pub fn with_enable_short_term(&self, enable_short_term: bool) -> RecallResult<Self> {
        self.rebuild(|config| config.enable_short_term = enable_short_term)
    }

    pub fn with_learning_steps(&self, steps: Vec<LearningStep>) -> RecallResult<Self> {
        self.rebuild(|config| config.learning_steps = steps)
    }

    /// Replace the relearning steps. The w17/w18 ceiling is recomputed.
    pub fn with_relearning_steps(&self, steps: Vec<LearningStep>) -> RecallResult<Self> {
        self.rebuild(|config| config.relearning_steps = steps)
    }

    fn rebuild(&self, update: impl FnOnce(&mut SchedulerConfig)) -> RecallResult<Self> {
        let mut config = SchedulerConfig::from(self.clone());
        update(&mut config);
        Self::new(&config)
    }
}

impl TryFrom<SchedulerConfig> for Parameters {
    type Error = RecallError;

    fn try_from(config: SchedulerConfig) -> RecallResult<Self> {
        Self::new(&config)
    }
}

impl From<Parameters> for SchedulerConfig {
    fn from(params: Parameters) -> Self {
        SchedulerConfig {
            request_retention: params.request_retention,
            maximum_interval: params.maximum_interval,
            w: Some(params.w.to_vec()),
            enable_fuzz: params.enable_fuzz,
            enable_short_term: params.enable_short_term,
            learning_steps: params.learning_steps,
            relearning_steps: params.relearning_steps,
        }
    }
}

/// Interval modifier for a retention target.
///
/// # Errors
/// Retention must lie in (0, 1].
pub fn compute_interval_modifier(request_retention: f64, w20: f64) -> RecallResult<f64> {
    if !(request_retention > 0.0 && request_retention <= 1.0) {
        return Err(RecallError::validation_with_suggestion(
            ErrorCode::ValInvalidRetention,
            format!("Invalid request retention: {}", request_retention),
            "Requested retention rate should be in the range (0,1]",
        ));
    }
    Ok(raw_interval_modifier(request_retention, w20))
}

fn raw_interval_modifier(request_retention: f64, w20: f64) -> f64 {
    let DecayFactor { decay, factor } = DecayFactor::from_weight(w20);
    round8((request_retention.powf(1.0 / decay) - 1.0) / factor)
}
