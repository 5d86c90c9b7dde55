//! Replay a review history and reschedule a card from it.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, RecallError, RecallResult};
use crate::fsrs::Fsrs;
use crate::types::{
    date_diff_in_days, days_between, Card, Grade, Rating, RecordLogItem, ReviewLog, State,
};

/// One past review.
///
/// Graded entries are replayed through the scheduler. `Manual` entries set
/// the card state directly and need a target `state`, plus a `due` unless
/// the target is New.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub rating: Rating,
    pub review: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
}

impl HistoryEntry {
    pub fn graded(grade: Grade, review: DateTime<Utc>) -> Self {
        Self {
            rating: grade.into(),
            review,
            state: None,
            due: None,
            stability: None,
            difficulty: None,
        }
    }

    /// Manual entry moving the card to `state`.
    pub fn manual(state: State, review: DateTime<Utc>) -> Self {
        Self {
            rating: Rating::Manual,
            review,
            state: Some(state),
            due: None,
            stability: None,
            difficulty: None,
        }
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_memory(mut self, stability: f64, difficulty: f64) -> Self {
        self.stability = Some(stability);
        self.difficulty = Some(difficulty);
        self
    }
}

/// Comparator used to order history entries before replay.
pub type HistoryOrder = Box<dyn Fn(&HistoryEntry, &HistoryEntry) -> Ordering + Send + Sync>;

/// Options for [`Fsrs::reschedule`].
pub struct RescheduleOptions {
    /// Sort entries before replay. Entries are replayed as given otherwise.
    pub order_by: Option<HistoryOrder>,
    /// Drop `Manual` entries before replay.
    pub skip_manual: bool,
    /// Carry the replayed stability and difficulty into the reschedule item.
    pub update_memory_state: bool,
    /// Time of the rescheduling review. The current time when unset.
    pub now: Option<DateTime<Utc>>,
    /// Card to start the replay from. Defaults to an empty card created at
    /// the first review.
    pub first_card: Option<Card>,
}

impl Default for RescheduleOptions {
    fn default() -> Self {
        Self {
            order_by: None,
            skip_manual: true,
            update_memory_state: false,
            now: None,
            first_card: None,
        }
    }
}

impl fmt::Debug for RescheduleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RescheduleOptions")
            .field("order_by", &self.order_by.as_ref().map(|_| "<fn>"))
            .field("skip_manual", &self.skip_manual)
            .field("update_memory_state", &self.update_memory_state)
            .field("now", &self.now)
            .field("first_card", &self.first_card)
            .finish()
    }
}

/// Outcome of a reschedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RescheduleResult {
    /// One item per replayed entry.
    pub collections: Vec<RecordLogItem>,
    /// Manual item moving the current card onto the replayed schedule.
    /// `None` when the replay agrees with the current due date.
    pub reschedule_item: Option<RecordLogItem>,
}

/// Replays histories against one scheduler configuration.
pub struct Rescheduler<'a> {
    fsrs: &'a Fsrs,
}

impl<'a> Rescheduler<'a> {
    pub fn new(fsrs: &'a Fsrs) -> Self {
        Self { fsrs }
    }

    /// Apply a manual state change.
    ///
    /// # Errors
    /// A missing `state`, or a missing `due` for any target other than New,
    /// is an illegal operation.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_manual(
        &self,
        card: &Card,
        state: Option<State>,
        reviewed: DateTime<Utc>,
        elapsed_days: i64,
        stability: Option<f64>,
        difficulty: Option<f64>,
        due: Option<DateTime<Utc>>,
    ) -> RecallResult<RecordLogItem> {
        let state = state.ok_or_else(|| {
            RecallError::illegal_operation(
                ErrorCode::OpMissingState,
                "reschedule: state is required for manual rating",
            )
        })?;

        if state == State::New {
            let log = ReviewLog {
                rating: Rating::Manual,
                state,
                due: due.unwrap_or(reviewed),
                stability: card.stability,
                difficulty: card.difficulty,
                elapsed_days,
                last_elapsed_days: card.elapsed_days,
                scheduled_days: card.scheduled_days,
                learning_steps: card.learning_steps,
                review: reviewed,
            };
            let mut next = Card::new(reviewed);
            next.last_review = Some(reviewed);
            return Ok(RecordLogItem { card: next, log });
        }

        let due = due.ok_or_else(|| {
            RecallError::illegal_operation(
                ErrorCode::OpMissingDue,
                "reschedule: due is required for manual rating",
            )
        })?;

        let log = ReviewLog {
            rating: Rating::Manual,
            state: card.state,
            due: card.last_review.unwrap_or(card.due),
            stability: card.stability,
            difficulty: card.difficulty,
            elapsed_days,
            last_elapsed_days: card.elapsed_days,
            scheduled_days: card.scheduled_days,
            learning_steps: card.learning_steps,
            review: reviewed,
        };
        let next = Card {
            due,
            stability: stability.unwrap_or(card.stability),
            difficulty: difficulty.unwrap_or(card.difficulty),
            elapsed_days,
            scheduled_days: days_between(due, reviewed),
            reps: card.reps + 1,
            lapses: card.lapses,
            learning_steps: card.learning_steps,
            state,
            last_review: Some(reviewed),
        };
        Ok(RecordLogItem { card: next, log })
    }

    /// Replay entries in order starting from `card`.
    pub fn replay(&self, card: Card, entries: &[HistoryEntry]) -> RecallResult<Vec<RecordLogItem>> {
        let mut collections = Vec::with_capacity(entries.len());
        let mut card = card;
        for entry in entries {
            let item = match Grade::try_from(entry.rating) {
                Ok(grade) => self.fsrs.review(&card, entry.review, grade),
                Err(_) => {
                    let elapsed_days = match (card.state, card.last_review) {
                        (State::New, _) | (_, None) => 0,
                        (_, Some(last_review)) => days_between(entry.review, last_review),
                    };
                    self.handle_manual(
                        &card,
                        entry.state,
                        entry.review,
                        elapsed_days,
                        entry.stability,
                        entry.difficulty,
                        entry.due,
                    )?
                }
            };
            card = item.card.clone();
            collections.push(item);
        }
        Ok(collections)
    }

    /// Manual item moving `current_card` onto the replayed schedule.
    pub fn reschedule_item(
        &self,
        current_card: &Card,
        now: DateTime<Utc>,
        replayed: Option<&RecordLogItem>,
        update_memory_state: bool,
    ) -> RecallResult<Option<RecordLogItem>> {
        let Some(RecordLogItem { card: replayed, log }) = replayed else {
            return Ok(None);
        };
        if current_card.due == replayed.due {
            return Ok(None);
        }

        let mut current = current_card.clone();
        current.scheduled_days = date_diff_in_days(current.due, replayed.due);
        let (stability, difficulty) = if update_memory_state {
            (Some(replayed.stability), Some(replayed.difficulty))
        } else {
            (None, None)
        };
        self.handle_manual(
            &current,
            Some(replayed.state),
            now,
            log.elapsed_days,
            stability,
            difficulty,
            Some(replayed.due),
        )
        .map(Some)
    }

    /// Replay `reviews` and compute the reschedule item for `current_card`.
    pub fn reschedule(
        &self,
        current_card: &Card,
        reviews: &[HistoryEntry],
        options: RescheduleOptions,
    ) -> RecallResult<RescheduleResult> {
        let mut entries = reviews.to_vec();
        if let Some(order_by) = &options.order_by {
            entries.sort_by(|a, b| order_by(a, b));
        }
        if options.skip_manual {
            entries.retain(|entry| entry.rating != Rating::Manual);
        }

        let now = options.now.unwrap_or_else(Utc::now);
        let start = options
            .first_card
            .clone()
            .unwrap_or_else(|| Card::new(entries.first().map(|e| e.review).unwrap_or(now)));

        let collections = self.replay(start, &entries)?;
        let reschedule_item = self.reschedule_item(
            current_card,
            now,
            collections.last(),
            options.update_memory_state,
        )?;

        Ok(RescheduleResult {
            collections,
            reschedule_item,
        })
    }
}
