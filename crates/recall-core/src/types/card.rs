//! Card: the persistent unit being scheduled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{State, TimestampInput};
use crate::error::{RecallError, RecallResult};

/// A card and its memory state.
///
/// Scheduling never mutates a card in place; every operation returns a new
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Next scheduled review.
    pub due: DateTime<Utc>,
    /// Days until recall probability decays to 90%.
    pub stability: f64,
    /// 1.0-10.0 once reviewed, 0.0 for a new card.
    pub difficulty: f64,
    /// Days since the previous review. Deprecated but still populated.
    pub elapsed_days: i64,
    /// Interval granted by the last review.
    pub scheduled_days: i64,
    /// Total review count.
    pub reps: u32,
    /// Again ratings given while in Review.
    pub lapses: u32,
    /// Index into the active learning or relearning step list.
    #[serde(default)]
    pub learning_steps: u32,
    pub state: State,
    #[serde(default)]
    pub last_review: Option<DateTime<Utc>>,
}

impl Card {
    /// Create an empty card due at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            due: now,
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0,
            scheduled_days: 0,
            reps: 0,
            lapses: 0,
            learning_steps: 0,
            state: State::New,
            last_review: None,
        }
    }

    /// Whether the card has never been reviewed.
    pub fn is_new(&self) -> bool {
        self.state == State::New
    }
}

/// Lenient card shape accepted from hosts.
///
/// Timestamps may be text or epoch milliseconds; `state` may be a name or a
/// numeric code. Missing counters default to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardInput {
    pub due: Option<TimestampInput>,
    pub stability: f64,
    pub difficulty: f64,
    /// Deprecated: recomputed from `last_review` on every review.
    pub elapsed_days: Option<i64>,
    pub scheduled_days: i64,
    pub reps: u32,
    pub lapses: u32,
    pub learning_steps: u32,
    pub state: State,
    pub last_review: Option<TimestampInput>,
}

impl TryFrom<CardInput> for Card {
    type Error = RecallError;

    fn try_from(input: CardInput) -> RecallResult<Self> {
        let due = input
            .due
            .as_ref()
            .ok_or_else(|| RecallError::validation("card input is missing `due`"))?
            .resolve()?;
        let last_review = input.last_review.as_ref().map(TimestampInput::resolve).transpose()?;

        let elapsed_days = match input.elapsed_days {
            Some(days) => {
                warn!(
                    elapsed_days = days,
                    "elapsed_days is deprecated and will be recomputed from last_review"
                );
                days
            }
            None => 0,
        };

        Ok(Card {
            due,
            stability: input.stability,
            difficulty: input.difficulty,
            elapsed_days,
            scheduled_days: input.scheduled_days,
            reps: input.reps,
            lapses: input.lapses,
            learning_steps: input.learning_steps,
            state: input.state,
            last_review,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_card_is_empty() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let card = Card::new(now);
        assert_eq!(card.due, now);
        assert_eq!(card.state, State::New);
        assert_eq!(card.reps, 0);
        assert!(card.last_review.is_none());
        assert!(card.is_new());
    }

    #[test]
    fn test_card_input_accepts_codes_and_millis() {
        let input: CardInput = serde_json::from_str(
            r#"{
                "due": 1672317000000,
                "stability": 3.2602,
                "difficulty": 4.88463163,
                "reps": 1,
                "state": 1,
                "last_review": "2022-12-29T12:20:00Z"
            }"#,
        )
        .unwrap();
        let card = Card::try_from(input).unwrap();
        assert_eq!(card.state, State::Learning);
        assert_eq!(card.due, Utc.with_ymd_and_hms(2022, 12, 29, 12, 30, 0).unwrap());
        assert_eq!(card.last_review, Some(Utc.with_ymd_and_hms(2022, 12, 29, 12, 20, 0).unwrap()));
        assert_eq!(card.elapsed_days, 0);
    }

    #[test]
    fn test_card_input_keeps_deprecated_elapsed_days() {
        let input = CardInput {
            due: Some(TimestampInput::Millis(0)),
            elapsed_days: Some(4),
            state: State::Review,
            ..Default::default()
        };
        let card = Card::try_from(input).unwrap();
        assert_eq!(card.elapsed_days, 4);
    }

    #[test]
    fn test_card_input_requires_due() {
        assert!(Card::try_from(CardInput::default()).is_err());
    }

    #[test]
    fn test_card_input_rejects_bad_state_name() {
        let parsed = serde_json::from_str::<CardInput>(r#"{"due": 0, "state": "Mastered"}"#);
        assert!(parsed.is_err());
    }
}
