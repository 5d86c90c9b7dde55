//! Review schedulers.
//!
//! A scheduler is built for one card at one review time, computes the
//! outcome of each grade at most once and is then discarded. Two policies
//! exist:
//!
//! - [`BasicScheduler`]: new and lapsed cards go through learning steps
//!   measured in minutes before graduating to day intervals.
//! - [`LongTermScheduler`]: every review produces a day interval; learning
//!   states are never entered.

mod basic;
mod learning_steps;
mod long_term;
mod seed;

use chrono::{DateTime, Utc};
use tracing::debug;

pub use basic::BasicScheduler;
pub use learning_steps::{BasicLearningSteps, LearningStepsStrategy, StepOutcome, StepPlan};
pub use long_term::LongTermScheduler;
pub use seed::{CardIdSeedStrategy, DefaultSeedStrategy, SeedContext, SeedStrategy};

#[cfg(test)]
pub use learning_steps::MockLearningStepsStrategy;

use crate::algorithm::Algorithm;
use crate::types::{add_days, date_diff_in_days, Card, Grade, Preview, RecordLogItem, ReviewLog, State};

/// Computes review outcomes for one card at one review time.
pub trait Scheduler {
    /// Outcome of reviewing with `grade`.
    fn review(&mut self, grade: Grade) -> RecordLogItem;

    /// Outcomes of all four grades.
    fn preview(&mut self) -> Preview {
        Preview::new(Grade::ALL.map(|grade| self.review(grade)))
    }
}

/// State shared by both scheduler policies.
pub(crate) struct SchedulerContext<'a> {
    pub algorithm: &'a Algorithm,
    /// The card as passed in.
    pub last: Card,
    /// The card with review time, elapsed days and repetition count applied.
    pub current: Card,
    pub review_time: DateTime<Utc>,
    pub elapsed_days: i64,
    pub seed: String,
    outcomes: [Option<RecordLogItem>; 4],
}

impl<'a> SchedulerContext<'a> {
    pub fn new(
        algorithm: &'a Algorithm,
        card: &Card,
        review_time: DateTime<Utc>,
        seed_strategy: &dyn SeedStrategy,
    ) -> Self {
        let elapsed_days = match (card.state, card.last_review) {
            (State::New, _) | (_, None) => 0,
            (_, Some(last_review)) => date_diff_in_days(last_review, review_time),
        };

        let mut current = card.clone();
        current.last_review = Some(review_time);
        current.elapsed_days = elapsed_days;
        current.reps += 1;

        let seed = seed_strategy.seed(&SeedContext {
            review_time,
            card: &current,
        });
        debug!(%seed, elapsed_days, state = %card.state, "scheduler initialized");

        Self {
            algorithm,
            last: card.clone(),
            current,
            review_time,
            elapsed_days,
            seed,
            outcomes: Default::default(),
        }
    }

    pub fn cached(&self, grade: Grade) -> Option<RecordLogItem> {
        self.outcomes[grade.index()].clone()
    }

    pub fn store(&mut self, grade: Grade, card: Card) -> RecordLogItem {
        let item = RecordLogItem {
            card,
            log: self.build_log(grade),
        };
        self.outcomes[grade.index()] = Some(item.clone());
        item
    }

    /// Log for a grade. Memory fields hold the pre-review values.
    pub fn build_log(&self, grade: Grade) -> ReviewLog {
        ReviewLog {
            rating: grade.into(),
            state: self.current.state,
            due: self.last.last_review.unwrap_or(self.last.due),
            stability: self.current.stability,
            difficulty: self.current.difficulty,
            elapsed_days: self.current.elapsed_days,
            last_elapsed_days: self.last.elapsed_days,
            scheduled_days: self.current.scheduled_days,
            learning_steps: self.current.learning_steps,
            review: self.review_time,
        }
    }

    /// Set a review interval on a card.
    pub fn schedule_days(&self, card: &mut Card, interval: i64) {
        card.scheduled_days = interval;
        card.due = add_days(self.review_time, interval);
    }

    pub fn next_interval(&self, stability: f64) -> i64 {
        self.algorithm
            .next_interval(stability, self.elapsed_days, &self.seed)
    }
}
