//! Reset a card to New.

use chrono::{DateTime, Utc};

use crate::types::{days_between, Card, Rating, RecordLogItem, ReviewLog, State};

/// Force a card back to New at `now`.
///
/// Memory state is cleared and `last_review` kept. Repetition and lapse
/// counts are zeroed only when `reset_count` is set. The log is rated
/// `Manual` and so cannot be rolled back.
///
/// The log's `scheduled_days` is measured from the old due date to `now`,
/// negative when the card is forgotten before it was due, and 0 for New
/// cards.
pub fn forget(card: &Card, now: DateTime<Utc>, reset_count: bool) -> RecordLogItem {
    let scheduled_days = match card.state {
        State::New => 0,
        _ => days_between(now, card.due),
    };

    let log = ReviewLog {
        rating: Rating::Manual,
        state: card.state,
        due: card.due,
        stability: card.stability,
        difficulty: card.difficulty,
        elapsed_days: 0,
        last_elapsed_days: card.elapsed_days,
        scheduled_days,
        learning_steps: card.learning_steps,
        review: now,
    };

    let forgotten = Card {
        due: now,
        stability: 0.0,
        difficulty: 0.0,
        elapsed_days: 0,
        scheduled_days: 0,
        reps: if reset_count { 0 } else { card.reps },
        lapses: if reset_count { 0 } else { card.lapses },
        learning_steps: 0,
        state: State::New,
        last_review: card.last_review,
    };

    RecordLogItem {
        card: forgotten,
        log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_forget_new_card() {
        let created = Utc.with_ymd_and_hms(2022, 12, 29, 12, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2023, 12, 30, 12, 30, 0).unwrap();
        let card = Card::new(created);

        let item = forget(&card, now, true);
        assert_eq!(item.card, Card { due: now, ..card.clone() });
        assert_eq!(item.log.rating, Rating::Manual);
        assert_eq!(item.log.scheduled_days, 0);
    }

    #[test]
    fn test_forget_keeps_counts_unless_reset() {
        let last_review = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2023, 1, 11, 6, 0, 0).unwrap();
        let card = Card {
            due: Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap(),
            stability: 4.2,
            difficulty: 6.1,
            elapsed_days: 3,
            scheduled_days: 4,
            reps: 7,
            lapses: 2,
            learning_steps: 0,
            state: State::Review,
            last_review: Some(last_review),
        };

        let kept = forget(&card, now, false);
        assert_eq!(kept.card.reps, 7);
        assert_eq!(kept.card.lapses, 2);
        assert_eq!(kept.card.state, State::New);
        assert_eq!(kept.card.stability, 0.0);
        assert_eq!(kept.card.last_review, Some(last_review));
        assert_eq!(kept.log.scheduled_days, 6, "days past the old due date");
        assert_eq!(kept.log.due, card.due);
        assert_eq!(kept.log.last_elapsed_days, 3);
        assert_eq!(kept.log.state, State::Review);

        let reset = forget(&card, now, true);
        assert_eq!(reset.card.reps, 0);
        assert_eq!(reset.card.lapses, 0);
    }

    #[test]
    fn test_forget_before_due_logs_negative_days() {
        let due = Utc.with_ymd_and_hms(2023, 1, 20, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2023, 1, 17, 0, 0, 0).unwrap();
        let card = Card {
            due,
            stability: 15.0,
            difficulty: 5.0,
            scheduled_days: 15,
            reps: 3,
            state: State::Review,
            last_review: Some(Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap()),
            ..Card::new(due)
        };

        let item = forget(&card, now, false);
        assert_eq!(item.log.scheduled_days, -3);
        assert_eq!(item.card.due, now);
    }
}
