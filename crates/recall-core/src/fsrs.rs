//! The scheduling facade.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::algorithm::math::round8;
use crate::algorithm::{Algorithm, MemoryState};
use crate::config::SchedulerConfig;
use crate::error::RecallResult;
use crate::history::{self, HistoryEntry, RescheduleOptions, RescheduleResult, Rescheduler};
use crate::params::Parameters;
use crate::scheduler::{
    BasicLearningSteps, BasicScheduler, DefaultSeedStrategy, LearningStepsStrategy,
    LongTermScheduler, Scheduler, SeedStrategy,
};
use crate::types::{days_between, Card, Grade, Preview, Rating, RecordLogItem, ReviewLog, State};

/// Spaced-repetition scheduler bound to one parameter set.
///
/// Every call takes the card and review time explicitly and returns new
/// values; nothing is mutated in place. The short-term or long-term policy
/// is chosen per call from `enable_short_term`.
#[derive(Clone)]
pub struct Fsrs {
    algorithm: Algorithm,
    seed_strategy: Arc<dyn SeedStrategy + Send + Sync>,
    learning_steps: Arc<dyn LearningStepsStrategy + Send + Sync>,
}

impl fmt::Debug for Fsrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsrs")
            .field("parameters", self.algorithm.params())
            .finish_non_exhaustive()
    }
}

impl Default for Fsrs {
    fn default() -> Self {
        Self::new(Parameters::default())
    }
}

impl Fsrs {
    pub fn new(params: Parameters) -> Self {
        Self {
            algorithm: Algorithm::new(params),
            seed_strategy: Arc::new(DefaultSeedStrategy),
            learning_steps: Arc::new(BasicLearningSteps),
        }
    }

    /// Build from author-facing configuration.
    pub fn from_config(config: &SchedulerConfig) -> RecallResult<Self> {
        Ok(Self::new(Parameters::new(config)?))
    }

    pub fn with_seed_strategy(mut self, strategy: impl SeedStrategy + Send + Sync + 'static) -> Self {
        self.seed_strategy = Arc::new(strategy);
        self
    }

    pub fn with_learning_steps_strategy(
        mut self,
        strategy: impl LearningStepsStrategy + Send + Sync + 'static,
    ) -> Self {
        self.learning_steps = Arc::new(strategy);
        self
    }

    pub fn parameters(&self) -> &Parameters {
        self.algorithm.params()
    }

    /// Replace the parameter set. Strategies are kept.
    pub fn set_parameters(&mut self, params: Parameters) {
        debug!(
            request_retention = params.request_retention(),
            enable_short_term = params.enable_short_term(),
            enable_fuzz = params.enable_fuzz(),
            "parameters replaced"
        );
        self.algorithm = Algorithm::new(params);
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    fn scheduler<'a>(&'a self, card: &Card, now: DateTime<Utc>) -> Box<dyn Scheduler + 'a> {
        if self.algorithm.params().enable_short_term() {
            Box::new(BasicScheduler::new(
                &self.algorithm,
                card,
                now,
                self.seed_strategy.as_ref(),
                self.learning_steps.as_ref(),
            ))
        } else {
            Box::new(LongTermScheduler::new(
                &self.algorithm,
                card,
                now,
                self.seed_strategy.as_ref(),
            ))
        }
    }

    /// Outcomes of all four grades.
    pub fn preview(&self, card: &Card, now: DateTime<Utc>) -> Preview {
        self.scheduler(card, now).preview()
    }

    /// Outcome of reviewing `card` at `now` with `grade`.
    pub fn review(&self, card: &Card, now: DateTime<Utc>, grade: Grade) -> RecordLogItem {
        self.scheduler(card, now).review(grade)
    }

    /// Like [`Fsrs::review`] for a raw rating.
    ///
    /// # Errors
    /// `Rating::Manual` is not a grade.
    pub fn next(&self, card: &Card, now: DateTime<Utc>, rating: Rating) -> RecallResult<RecordLogItem> {
        let grade = Grade::try_from(rating)?;
        Ok(self.review(card, now, grade))
    }

    /// Card as it was before `log` was produced.
    pub fn rollback(&self, card: &Card, log: &ReviewLog) -> RecallResult<Card> {
        history::rollback(card, log)
    }

    /// Reset a card to New at `now`.
    pub fn forget(&self, card: &Card, now: DateTime<Utc>, reset_count: bool) -> RecordLogItem {
        history::forget(card, now, reset_count)
    }

    /// Replay entries starting from `card`.
    pub fn replay_history(&self, card: Card, entries: &[HistoryEntry]) -> RecallResult<Vec<RecordLogItem>> {
        Rescheduler::new(self).replay(card, entries)
    }

    /// Replay `reviews` and move `current_card` onto the replayed schedule.
    pub fn reschedule(
        &self,
        current_card: &Card,
        reviews: &[HistoryEntry],
        options: RescheduleOptions,
    ) -> RecallResult<RescheduleResult> {
        Rescheduler::new(self).reschedule(current_card, reviews, options)
    }

    /// Probability of recalling `card` at `now`.
    ///
    /// `None` for cards that have never been reviewed.
    pub fn get_retrievability(&self, card: &Card, now: DateTime<Utc>) -> Option<f64> {
        if card.state == State::New {
            return None;
        }
        let last_review = card.last_review?;
        let elapsed_days = days_between(now, last_review).max(0);
        Some(
            self.algorithm
                .forgetting_curve(elapsed_days, round8(card.stability)),
        )
    }

    /// Retrievability as a percentage with two decimals, e.g. `"93.21%"`.
    pub fn format_retrievability(&self, card: &Card, now: DateTime<Utc>) -> Option<String> {
        self.get_retrievability(card, now)
            .map(|r| format!("{:.2}%", r * 100.0))
    }

    /// Step a memory state through one review `t` days after the last.
    pub fn next_state(
        &self,
        memory: Option<MemoryState>,
        t: i64,
        grade: Grade,
    ) -> RecallResult<MemoryState> {
        self.algorithm.next_state(memory, t, grade)
    }

    /// Interval in days for a stability, fuzzed with `seed` when enabled.
    pub fn next_interval(&self, stability: f64, elapsed_days: i64, seed: &str) -> i64 {
        self.algorithm.next_interval(stability, elapsed_days, seed)
    }

    pub fn forgetting_curve(&self, elapsed_days: i64, stability: f64) -> f64 {
        self.algorithm.forgetting_curve(elapsed_days, stability)
    }
}
