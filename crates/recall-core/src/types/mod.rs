//! Core types for recall.

mod card;
mod rating;
mod review_log;
mod steps;
mod time;

use serde::Deserialize;

pub use card::{Card, CardInput};
pub use rating::{Grade, Rating, State};
pub use review_log::{Preview, RecordLogItem, ReviewLog};
pub use steps::{GradeSteps, LearningStep, StepUnit, TimeUnit};
pub use time::{
    add_days, add_minutes, date_diff_in_days, days_between, parse_timestamp, TimestampInput,
};

/// Enum value as it arrives at the boundary: a numeric code or a name.
#[doc(hidden)]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum EnumRepr {
    Code(i64),
    Name(String),
}
