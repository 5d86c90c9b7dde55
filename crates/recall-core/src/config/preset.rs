//! Named starting configurations for common study patterns.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::SchedulerConfig;
use crate::types::{LearningStep, StepUnit};

/// Preset scheduler configuration.
///
/// Presets only fill in fields; the weights stay the defaults and are
/// re-clipped for the preset's relearning step count when the config is
/// converted into [`crate::Parameters`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Preset {
    #[default]
    Default,
    /// Short learning steps and two relearning steps for vocabulary.
    LanguageLearner,
    /// Higher retention with a long learning ladder.
    ExamPreparation,
    /// Lower retention, day-based scheduling only.
    CasualLearner,
}

fn steps(units: &[StepUnit]) -> Vec<LearningStep> {
    units.iter().copied().map(LearningStep::Uniform).collect()
}

impl Preset {
    /// The configuration this preset stands for.
    pub fn config(self) -> SchedulerConfig {
        let base = SchedulerConfig::default();
        match self {
            Preset::Default => base,
            Preset::LanguageLearner => SchedulerConfig {
                learning_steps: steps(&[
                    StepUnit::minutes(1),
                    StepUnit::minutes(10),
                    StepUnit::hours(1),
                ]),
                relearning_steps: steps(&[StepUnit::minutes(5), StepUnit::minutes(30)]),
                ..base
            },
            Preset::ExamPreparation => SchedulerConfig {
                request_retention: 0.92,
                learning_steps: steps(&[
                    StepUnit::minutes(1),
                    StepUnit::minutes(8),
                    StepUnit::minutes(45),
                    StepUnit::hours(3),
                ]),
                relearning_steps: steps(&[StepUnit::minutes(5), StepUnit::minutes(25)]),
                ..base
            },
            Preset::CasualLearner => SchedulerConfig {
                request_retention: 0.85,
                learning_steps: steps(&[StepUnit::minutes(5), StepUnit::minutes(30)]),
                enable_short_term: false,
                ..base
            },
        }
    }
}

impl From<Preset> for SchedulerConfig {
    fn from(preset: Preset) -> Self {
        preset.config()
    }
}
