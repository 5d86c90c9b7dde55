//! Undo a review using its log.

use crate::error::{ErrorCode, RecallError, RecallResult};
use crate::types::{Card, Grade, Rating, ReviewLog, State};

/// Reconstruct the card as it was before `log` was produced.
///
/// # Errors
/// Logs rated `Manual` (forget, manual reschedule) cannot be rolled back.
pub fn rollback(card: &Card, log: &ReviewLog) -> RecallResult<Card> {
    if log.rating == Rating::Manual {
        return Err(RecallError::illegal_operation(
            ErrorCode::OpManualRollback,
            "Cannot rollback a manual rating",
        ));
    }

    let (due, last_review, lapses) = match log.state {
        State::New => (log.due, None, 0),
        State::Learning | State::Relearning | State::Review => {
            let lapsed = log.rating == Rating::from(Grade::Again) && log.state == State::Review;
            let lapses = if lapsed {
                card.lapses.saturating_sub(1)
            } else {
                card.lapses
            };
            (log.review, Some(log.due), lapses)
        }
    };

    Ok(Card {
        due,
        stability: log.stability,
        difficulty: log.difficulty,
        elapsed_days: log.last_elapsed_days,
        scheduled_days: log.scheduled_days,
        reps: card.reps.saturating_sub(1),
        lapses,
        learning_steps: log.learning_steps,
        state: log.state,
        last_review,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_manual_log_is_rejected() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let card = Card::new(now);
        let log = ReviewLog {
            rating: Rating::Manual,
            state: State::New,
            due: now,
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0,
            last_elapsed_days: 0,
            scheduled_days: 0,
            learning_steps: 0,
            review: now,
        };
        let err = rollback(&card, &log).unwrap_err();
        assert_eq!(err.code(), ErrorCode::OpManualRollback);
        assert_eq!(err.to_string(), "Illegal operation: Cannot rollback a manual rating");
    }
}
