//! Learning-step durations.
//!
//! Steps are authored as compact tokens ("10m", "1h", "2d") and resolved to
//! whole minutes. A step is either one duration for every grade or a
//! per-grade map.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, RecallError, RecallResult};

static STEP_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)([mhd])$").unwrap());

/// Unit suffix of a step token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn suffix(self) -> char {
        match self {
            TimeUnit::Minutes => 'm',
            TimeUnit::Hours => 'h',
            TimeUnit::Days => 'd',
        }
    }

    fn minutes_per_unit(self) -> u32 {
        match self {
            TimeUnit::Minutes => 1,
            TimeUnit::Hours => 60,
            TimeUnit::Days => 1440,
        }
    }
}

/// A single duration token such as `"10m"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepUnit {
    value: u32,
    unit: TimeUnit,
}

impl StepUnit {
    pub const fn minutes(value: u32) -> Self {
        Self {
            value,
            unit: TimeUnit::Minutes,
        }
    }

    pub const fn hours(value: u32) -> Self {
        Self {
            value,
            unit: TimeUnit::Hours,
        }
    }

    pub const fn days(value: u32) -> Self {
        Self {
            value,
            unit: TimeUnit::Days,
        }
    }

    /// Parse a step token. Anything other than an integer followed by
    /// `m`, `h` or `d` is rejected.
    pub fn parse(token: &str) -> RecallResult<Self> {
        let captures = STEP_TOKEN.captures(token.trim()).ok_or_else(|| {
            RecallError::parse(ErrorCode::ParseStepToken, format!("Invalid step unit: {}", token))
        })?;
        let value = captures[1].parse::<u32>().map_err(|_| {
            RecallError::parse(ErrorCode::ParseStepToken, format!("Invalid step value: {}", token))
        })?;
        let unit = match &captures[2] {
            "m" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            _ => TimeUnit::Days,
        };
        Ok(Self { value, unit })
    }

    /// Duration in whole minutes.
    pub fn to_minutes(self) -> u32 {
        self.value.saturating_mul(self.unit.minutes_per_unit())
    }
}

impl fmt::Display for StepUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for StepUnit {
    type Err = RecallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StepUnit {
    type Error = RecallError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StepUnit> for String {
    fn from(step: StepUnit) -> Self {
        step.to_string()
    }
}

/// Per-grade step durations. `Easy` is accepted but never consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeSteps {
    #[serde(rename = "Again", default, skip_serializing_if = "Option::is_none")]
    pub again: Option<StepUnit>,
    #[serde(rename = "Hard", default, skip_serializing_if = "Option::is_none")]
    pub hard: Option<StepUnit>,
    #[serde(rename = "Good", default, skip_serializing_if = "Option::is_none")]
    pub good: Option<StepUnit>,
    #[serde(rename = "Easy", default, skip_serializing_if = "Option::is_none")]
    pub easy: Option<StepUnit>,
}

/// One entry of a learning or relearning step list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LearningStep {
    /// The same duration for every grade.
    Uniform(StepUnit),
    /// Explicit durations per grade.
    PerGrade(GradeSteps),
}

impl LearningStep {
    /// Parse a list of step tokens.
    pub fn parse_list<S: AsRef<str>>(tokens: &[S]) -> RecallResult<Vec<LearningStep>> {
        tokens
            .iter()
            .map(|t| StepUnit::parse(t.as_ref()).map(LearningStep::Uniform))
            .collect()
    }
}

impl From<StepUnit> for LearningStep {
    fn from(step: StepUnit) -> Self {
        LearningStep::Uniform(step)
    }
}

impl From<GradeSteps> for LearningStep {
    fn from(steps: GradeSteps) -> Self {
        LearningStep::PerGrade(steps)
    }
}
