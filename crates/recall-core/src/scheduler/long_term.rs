//! Scheduler without learning steps.

use chrono::{DateTime, Utc};

use super::{Scheduler, SchedulerContext, SeedStrategy};
use crate::algorithm::Algorithm;
use crate::params::S_MIN;
use crate::types::{Card, Grade, RecordLogItem, State};

/// Long-term scheduler.
///
/// Every grade yields a whole-day interval and the card always lands in
/// Review. A new card is scheduled from the initial memory state as if no
/// time had elapsed.
pub struct LongTermScheduler<'a> {
    ctx: SchedulerContext<'a>,
}

impl<'a> LongTermScheduler<'a> {
    pub fn new(
        algorithm: &'a Algorithm,
        card: &Card,
        review_time: DateTime<Utc>,
        seed_strategy: &dyn SeedStrategy,
    ) -> Self {
        Self {
            ctx: SchedulerContext::new(algorithm, card, review_time, seed_strategy),
        }
    }

    fn new_state(&mut self, grade: Grade) -> RecordLogItem {
        self.ctx.current.scheduled_days = 0;
        self.ctx.current.elapsed_days = 0;

        let algorithm = self.ctx.algorithm;
        let cards = Grade::ALL.map(|g| {
            let mut card = self.ctx.current.clone();
            card.difficulty = algorithm.init_difficulty(g);
            card.stability = algorithm.init_stability(g);
            card
        });
        self.schedule_all(cards, 0, grade)
    }

    fn review_state(&mut self, grade: Grade) -> RecordLogItem {
        let algorithm = self.ctx.algorithm;
        let elapsed_days = self.ctx.current.elapsed_days;
        let (d, s) = (self.ctx.last.difficulty, self.ctx.last.stability);
        let r = algorithm.forgetting_curve(elapsed_days, s);

        let mut cards = Grade::ALL.map(|g| {
            let mut card = self.ctx.current.clone();
            card.difficulty = algorithm.next_difficulty(d, g);
            card.stability = match g {
                Grade::Again => s.max(S_MIN).min(algorithm.next_forget_stability(d, s, r)),
                _ => algorithm.next_recall_stability(d, s, r, g),
            };
            card
        });
        cards[Grade::Again.index()].lapses += 1;
        self.schedule_all(cards, elapsed_days, grade)
    }

    /// Order the four intervals strictly, move every card to Review and
    /// memoize the outcomes.
    fn schedule_all(&mut self, cards: [Card; 4], elapsed_days: i64, grade: Grade) -> RecordLogItem {
        let [mut again, mut hard, mut good, mut easy] = cards;
        let algorithm = self.ctx.algorithm;
        let seed = self.ctx.seed.as_str();
        let [again_ivl, hard_ivl, good_ivl, easy_ivl] = [&again, &hard, &good, &easy]
            .map(|card| algorithm.next_interval(card.stability, elapsed_days, seed));

        let again_ivl = again_ivl.min(hard_ivl);
        let hard_ivl = hard_ivl.max(again_ivl + 1);
        let good_ivl = good_ivl.max(hard_ivl + 1);
        let easy_ivl = easy_ivl.max(good_ivl + 1);

        for (card, interval) in [
            (&mut again, again_ivl),
            (&mut hard, hard_ivl),
            (&mut good, good_ivl),
            (&mut easy, easy_ivl),
        ] {
            self.ctx.schedule_days(card, interval);
            card.state = State::Review;
            card.learning_steps = 0;
        }

        let items = [
            (Grade::Again, again),
            (Grade::Hard, hard),
            (Grade::Good, good),
            (Grade::Easy, easy),
        ]
        .map(|(g, card)| self.ctx.store(g, card));
        items[grade.index()].clone()
    }
}

impl Scheduler for LongTermScheduler<'_> {
    fn review(&mut self, grade: Grade) -> RecordLogItem {
        if let Some(item) = self.ctx.cached(grade) {
            return item;
        }
        match self.ctx.last.state {
            State::New => self.new_state(grade),
            State::Learning | State::Relearning | State::Review => self.review_state(grade),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;
    use crate::scheduler::DefaultSeedStrategy;
    use chrono::TimeZone;

    fn algorithm() -> Algorithm {
        Algorithm::new(Parameters::default().with_enable_short_term(false).unwrap())
    }

    #[test]
    fn test_new_card_goes_straight_to_review() {
        let algorithm = algorithm();
        let now = Utc.with_ymd_and_hms(2022, 12, 29, 12, 30, 0).unwrap();
        let card = Card::new(now);
        let preview = LongTermScheduler::new(&algorithm, &card, now, &DefaultSeedStrategy).preview();

        let intervals: Vec<i64> = preview.iter().map(|i| i.card.scheduled_days).collect();
        for window in intervals.windows(2) {
            assert!(window[1] > window[0], "{:?}", intervals);
        }
        for item in &preview {
            assert_eq!(item.card.state, State::Review);
            assert_eq!(item.card.learning_steps, 0);
            assert_eq!(item.log.elapsed_days, 0);
            assert_eq!(item.card.lapses, 0);
        }
    }

    #[test]
    fn test_learning_card_is_reviewed_as_review() {
        let algorithm = algorithm();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let mut card = Card::new(now);
        card.state = State::Learning;
        card.stability = 3.0;
        card.difficulty = 5.0;
        card.reps = 1;
        card.last_review = Some(now - chrono::Duration::days(3));

        let item = LongTermScheduler::new(&algorithm, &card, now, &DefaultSeedStrategy).review(Grade::Again);
        assert_eq!(item.card.state, State::Review);
        assert_eq!(item.card.lapses, 1);
        assert!(item.card.stability <= 3.0);
        assert_eq!(item.log.state, State::Learning);
        assert_eq!(item.log.elapsed_days, 3);
    }
}
