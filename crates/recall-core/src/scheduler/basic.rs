//! Scheduler with learning and relearning steps.

use chrono::{DateTime, Utc};

use super::{LearningStepsStrategy, Scheduler, SchedulerContext, SeedStrategy};
use crate::algorithm::Algorithm;
use crate::types::{add_minutes, Card, Grade, RecordLogItem, State};

const MINUTES_PER_DAY: i64 = 1440;

/// Short-term scheduler.
///
/// New cards enter Learning and lapsed cards enter Relearning, moving
/// through the configured steps before graduating to Review.
pub struct BasicScheduler<'a> {
    ctx: SchedulerContext<'a>,
    steps: &'a dyn LearningStepsStrategy,
}

impl<'a> BasicScheduler<'a> {
    pub fn new(
        algorithm: &'a Algorithm,
        card: &Card,
        review_time: DateTime<Utc>,
        seed_strategy: &dyn SeedStrategy,
        steps: &'a dyn LearningStepsStrategy,
    ) -> Self {
        Self {
            ctx: SchedulerContext::new(algorithm, card, review_time, seed_strategy),
            steps,
        }
    }

    /// Minutes to wait and the next step index for a grade. Zero minutes
    /// means the step list has nothing for this grade.
    fn learning_info(&self, grade: Grade) -> (i64, u32) {
        let card = &self.ctx.current;
        let cur_step = if card.state == State::Learning && grade >= Grade::Good {
            card.learning_steps + 1
        } else {
            card.learning_steps
        };
        let plan = self
            .steps
            .resolve(self.ctx.algorithm.params(), card.state, cur_step);
        match plan.get(grade) {
            Some(outcome) => (outcome.scheduled_minutes.max(0), outcome.next_step),
            None => (0, 0),
        }
    }

    /// Place a card on its next learning step, or graduate it to Review.
    fn apply_learning_steps(&self, next: &mut Card, grade: Grade, to_state: State) {
        let (minutes, next_step) = self.learning_info(grade);
        let review_time = self.ctx.review_time;

        if minutes > 0 && minutes < MINUTES_PER_DAY {
            next.learning_steps = next_step;
            next.scheduled_days = 0;
            next.state = to_state;
            next.due = add_minutes(review_time, minutes);
        } else if minutes >= MINUTES_PER_DAY {
            next.state = State::Review;
            next.learning_steps = next_step;
            next.due = add_minutes(review_time, minutes);
            next.scheduled_days = minutes / MINUTES_PER_DAY;
        } else {
            next.state = State::Review;
            next.learning_steps = 0;
            let interval = self.ctx.next_interval(next.stability);
            self.ctx.schedule_days(next, interval);
        }
    }

    fn new_state(&mut self, grade: Grade) -> RecordLogItem {
        let algorithm = self.ctx.algorithm;
        let mut next = self.ctx.current.clone();
        next.difficulty = algorithm.init_difficulty(grade);
        next.stability = algorithm.init_stability(grade);
        self.apply_learning_steps(&mut next, grade, State::Learning);
        self.ctx.store(grade, next)
    }

    fn learning_state(&mut self, grade: Grade) -> RecordLogItem {
        let algorithm = self.ctx.algorithm;
        let last = &self.ctx.last;
        let mut next = self.ctx.current.clone();
        next.difficulty = algorithm.next_difficulty(last.difficulty, grade);
        next.stability = algorithm.next_short_term_stability(last.stability, grade);
        let to_state = last.state;
        self.apply_learning_steps(&mut next, grade, to_state);
        self.ctx.store(grade, next)
    }

    /// Computes all four outcomes at once so their intervals can be ordered.
    fn review_state(&mut self, grade: Grade) -> RecordLogItem {
        let algorithm = self.ctx.algorithm;
        let (d, s) = (self.ctx.last.difficulty, self.ctx.last.stability);
        let r = algorithm.forgetting_curve(self.ctx.elapsed_days, s);

        let [mut again, mut hard, mut good, mut easy] = Grade::ALL.map(|g| {
            let mut card = self.ctx.current.clone();
            card.difficulty = algorithm.next_difficulty(d, g);
            card.stability = match g {
                Grade::Again => algorithm
                    .short_term_lapse_floor(s)
                    .min(algorithm.next_forget_stability(d, s, r)),
                _ => algorithm.next_recall_stability(d, s, r, g),
            };
            card
        });

        let mut hard_ivl = self.ctx.next_interval(hard.stability);
        let mut good_ivl = self.ctx.next_interval(good.stability);
        hard_ivl = hard_ivl.min(good_ivl);
        good_ivl = good_ivl.max(hard_ivl + 1);
        let easy_ivl = self.ctx.next_interval(easy.stability).max(good_ivl + 1);

        for (card, interval) in [(&mut hard, hard_ivl), (&mut good, good_ivl), (&mut easy, easy_ivl)] {
            self.ctx.schedule_days(card, interval);
            card.state = State::Review;
            card.learning_steps = 0;
        }

        self.apply_learning_steps(&mut again, Grade::Again, State::Relearning);
        again.lapses += 1;

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

impl Scheduler for BasicScheduler<'_> {
    fn review(&mut self, grade: Grade) -> RecordLogItem {
        if let Some(item) = self.ctx.cached(grade) {
            return item;
        }
        match self.ctx.last.state {
            State::New => self.new_state(grade),
            State::Learning | State::Relearning => self.learning_state(grade),
            State::Review => self.review_state(grade),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;
    use crate::scheduler::{BasicLearningSteps, DefaultSeedStrategy, MockLearningStepsStrategy, StepOutcome, StepPlan};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 12, 29, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_first_review_outcomes() {
        let algorithm = Algorithm::default();
        let card = Card::new(now());
        let mut scheduler =
            BasicScheduler::new(&algorithm, &card, now(), &DefaultSeedStrategy, &BasicLearningSteps);
        let preview = scheduler.preview();

        let stabilities: Vec<f64> = preview.iter().map(|i| i.card.stability).collect();
        assert_eq!(stabilities, vec![0.2172, 1.1771, 3.2602, 16.1507]);
        let states: Vec<State> = preview.iter().map(|i| i.card.state).collect();
        assert_eq!(states, vec![State::Learning, State::Learning, State::Learning, State::Review]);

        assert_eq!(preview[Grade::Again].card.due, add_minutes(now(), 1));
        assert_eq!(preview[Grade::Hard].card.due, add_minutes(now(), 6));
        assert_eq!(preview[Grade::Good].card.due, add_minutes(now(), 10));
        assert_eq!(preview[Grade::Good].card.learning_steps, 1);
        assert_eq!(preview[Grade::Easy].card.scheduled_days, 16);

        for item in &preview {
            assert_eq!(item.card.reps, 1);
            assert_eq!(item.card.last_review, Some(now()));
            assert_eq!(item.log.state, State::New);
            assert_eq!(item.log.due, now());
        }
    }

    #[test]
    fn test_outcomes_are_memoized() {
        let algorithm = Algorithm::default();
        let card = Card::new(now());
        let mut mock = MockLearningStepsStrategy::new();
        mock.expect_resolve().times(1).returning(|_, _, _| StepPlan::default());

        let mut scheduler = BasicScheduler::new(&algorithm, &card, now(), &DefaultSeedStrategy, &mock);
        let first = scheduler.review(Grade::Good);
        let second = scheduler.review(Grade::Good);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_steps_strategy_is_consulted() {
        let algorithm = Algorithm::default();
        let card = Card::new(now());
        let mut mock = MockLearningStepsStrategy::new();
        mock.expect_resolve()
            .withf(|_, state, cur_step| *state == State::New && *cur_step == 0)
            .returning(|_, _, _| {
                let mut plan = StepPlan::default();
                plan.set(
                    Grade::Hard,
                    StepOutcome {
                        scheduled_minutes: 2 * 1440,
                        next_step: 3,
                    },
                );
                plan
            });

        let mut scheduler = BasicScheduler::new(&algorithm, &card, now(), &DefaultSeedStrategy, &mock);
        let item = scheduler.review(Grade::Hard);
        assert_eq!(item.card.state, State::Review, "day-long steps graduate");
        assert_eq!(item.card.scheduled_days, 2);
        assert_eq!(item.card.learning_steps, 3);
        assert_eq!(item.card.due, add_minutes(now(), 2880));
    }

    #[test]
    fn test_review_interval_ordering() {
        let algorithm = Algorithm::default();
        for (s, d) in [(0.5, 9.0), (3.0, 5.0), (40.0, 2.0), (300.0, 7.0)] {
            let mut card = Card::new(now());
            card.state = State::Review;
            card.stability = s;
            card.difficulty = d;
            card.reps = 5;
            card.last_review = Some(now() - chrono::Duration::days(s.ceil() as i64));
            let mut scheduler =
                BasicScheduler::new(&algorithm, &card, now(), &DefaultSeedStrategy, &BasicLearningSteps);
            let preview = scheduler.preview();
            let hard = preview[Grade::Hard].card.scheduled_days;
            let good = preview[Grade::Good].card.scheduled_days;
            let easy = preview[Grade::Easy].card.scheduled_days;
            assert!(hard <= good && good >= hard + 1 && easy >= good + 1, "s={} d={}", s, d);
            assert_eq!(preview[Grade::Again].card.state, State::Relearning);
            assert_eq!(preview[Grade::Again].card.lapses, 1);
        }
    }

    #[test]
    fn test_empty_relearning_steps_send_lapse_to_review() {
        let params = Parameters::default().with_relearning_steps(Vec::new()).unwrap();
        let algorithm = Algorithm::new(params);
        let mut card = Card::new(now());
        card.state = State::Review;
        card.stability = 20.0;
        card.difficulty = 5.0;
        card.reps = 3;
        card.last_review = Some(now() - chrono::Duration::days(20));

        let mut scheduler =
            BasicScheduler::new(&algorithm, &card, now(), &DefaultSeedStrategy, &BasicLearningSteps);
        let item = scheduler.review(Grade::Again);
        assert_eq!(item.card.state, State::Review);
        assert!(item.card.scheduled_days >= 1);
        assert_eq!(item.card.lapses, 1);
    }
}
