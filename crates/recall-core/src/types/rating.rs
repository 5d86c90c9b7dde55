//! Ratings, grades and card lifecycle states.
//!
//! Names and numeric codes are both accepted at the data-model boundary;
//! everything past the boundary works on the typed enums.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::EnumRepr;
use crate::error::{ErrorCode, RecallError, RecallResult};

/// Rating recorded in a review log.
///
/// `Manual` marks history bookkeeping (forget, manual reschedule entries) and
/// is never accepted by the forward scheduler.
#[derive(
    Debug,
    Clone,
    Copy,
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
#[serde(try_from = "EnumRepr")]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Rating {
    Manual = 0,
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    /// Numeric code of the rating.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a rating by numeric code.
    pub fn from_code(code: i64) -> RecallResult<Self> {
        match code {
            0 => Ok(Rating::Manual),
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(RecallError::parse(
                ErrorCode::ParseEnumName,
                format!("Invalid rating:[{}]", other),
            )),
        }
    }

    /// Parse a rating from its name (any case) or its numeric code.
    pub fn parse(value: &str) -> RecallResult<Self> {
        let value = value.trim();
        if let Ok(code) = value.parse::<i64>() {
            return Self::from_code(code);
        }
        value.parse::<Rating>().map_err(|_| {
            RecallError::parse(ErrorCode::ParseEnumName, format!("Invalid rating:[{}]", value))
        })
    }
}

impl TryFrom<EnumRepr> for Rating {
    type Error = RecallError;

    fn try_from(value: EnumRepr) -> Result<Self, Self::Error> {
        match value {
            EnumRepr::Code(code) => Rating::from_code(code),
            EnumRepr::Name(name) => Rating::parse(&name),
        }
    }
}

/// Grade for a forward review (rating values 1-4).
///
/// - Again (1): failed recall
/// - Hard (2): recalled with serious difficulty
/// - Good (3): recalled after hesitation
/// - Easy (4): effortless recall
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Grade {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Grade {
    /// All grades in preview order.
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Convert to the numeric rating value.
    pub fn to_rating(self) -> u8 {
        self as u8
    }

    /// Create from a numeric rating value.
    ///
    /// Returns None for Manual (0) and anything outside 1-4.
    pub fn from_rating(rating: u8) -> Option<Self> {
        match rating {
            1 => Some(Grade::Again),
            2 => Some(Grade::Hard),
            3 => Some(Grade::Good),
            4 => Some(Grade::Easy),
            _ => None,
        }
    }

    /// Zero-based slot index (Again = 0).
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Grade as a float for use in the formulas.
    pub(crate) fn value(self) -> f64 {
        f64::from(self as u8)
    }
}

impl From<Grade> for Rating {
    fn from(grade: Grade) -> Self {
        match grade {
            Grade::Again => Rating::Again,
            Grade::Hard => Rating::Hard,
            Grade::Good => Rating::Good,
            Grade::Easy => Rating::Easy,
        }
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.to_rating()
    }
}

impl TryFrom<Rating> for Grade {
    type Error = RecallError;

    fn try_from(rating: Rating) -> Result<Self, Self::Error> {
        Grade::from_rating(rating.code()).ok_or_else(|| RecallError::invalid_grade(rating))
    }
}

impl TryFrom<u8> for Grade {
    type Error = RecallError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::from_rating(value).ok_or_else(|| RecallError::invalid_grade(value))
    }
}

/// Lifecycle state of a card.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(try_from = "EnumRepr")]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum State {
    #[default]
    New = 0,
    Learning = 1,
    Review = 2,
    Relearning = 3,
}

impl State {
    /// Numeric code of the state.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a state by numeric code.
    pub fn from_code(code: i64) -> RecallResult<Self> {
        match code {
            0 => Ok(State::New),
            1 => Ok(State::Learning),
            2 => Ok(State::Review),
            3 => Ok(State::Relearning),
            other => Err(RecallError::parse(
                ErrorCode::ParseEnumName,
                format!("Invalid state:[{}]", other),
            )),
        }
    }

    /// Parse a state from its name (any case) or its numeric code.
    pub fn parse(value: &str) -> RecallResult<Self> {
        let value = value.trim();
        if let Ok(code) = value.parse::<i64>() {
            return Self::from_code(code);
        }
        value.parse::<State>().map_err(|_| {
            RecallError::parse(ErrorCode::ParseEnumName, format!("Invalid state:[{}]", value))
        })
    }
}

impl TryFrom<EnumRepr> for State {
    type Error = RecallError;

    fn try_from(value: EnumRepr) -> Result<Self, Self::Error> {
        match value {
            EnumRepr::Code(code) => State::from_code(code),
            EnumRepr::Name(name) => State::parse(&name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_rating_parse_by_name_any_case() {
        assert_eq!(Rating::parse("again").unwrap(), Rating::Again);
        assert_eq!(Rating::parse("GOOD").unwrap(), Rating::Good);
        assert_eq!(Rating::parse("Manual").unwrap(), Rating::Manual);
    }

    #[test]
    fn test_rating_parse_by_code() {
        assert_eq!(Rating::parse("0").unwrap(), Rating::Manual);
        assert_eq!(Rating::parse("4").unwrap(), Rating::Easy);
        assert!(Rating::parse("5").is_err());
    }

    #[test]
    fn test_rating_parse_rejects_unknown_name() {
        let err = Rating::parse("perfect").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ParseEnumName);
        assert!(err.to_string().contains("perfect"));
    }

    #[test]
    fn test_state_parse() {
        assert_eq!(State::parse("relearning").unwrap(), State::Relearning);
        assert_eq!(State::parse("2").unwrap(), State::Review);
        assert!(State::parse("graduated").is_err());
    }

    #[test]
    fn test_grade_rejects_manual() {
        let err = Grade::try_from(Rating::Manual).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidGrade);
        assert!(Grade::try_from(0u8).is_err());
        assert!(Grade::try_from(5u8).is_err());
        assert_eq!(Grade::try_from(Rating::Hard).unwrap(), Grade::Hard);
    }

    #[test]
    fn test_grade_order_and_index() {
        let grades: Vec<Grade> = Grade::iter().collect();
        assert_eq!(grades, Grade::ALL.to_vec());
        for (i, grade) in Grade::ALL.iter().enumerate() {
            assert_eq!(grade.index(), i);
        }
    }

    #[test]
    fn test_serde_accepts_names_and_codes() {
        let rating: Rating = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(rating, Rating::Hard);
        let rating: Rating = serde_json::from_str("1").unwrap();
        assert_eq!(rating, Rating::Again);
        let state: State = serde_json::from_str("3").unwrap();
        assert_eq!(state, State::Relearning);
        assert!(serde_json::from_str::<State>("\"unknown\"").is_err());

        assert_eq!(serde_json::to_string(&State::Review).unwrap(), "\"Review\"");
        assert_eq!(serde_json::to_string(&Rating::Easy).unwrap(), "\"Easy\"");
    }
}
