//! Resolution of learning and relearning steps into per-grade waits.

use crate::params::Parameters;
use crate::types::{Grade, GradeSteps, LearningStep, State};

/// Wait before the next review and the step index the card moves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub scheduled_minutes: i64,
    pub next_step: u32,
}

/// Per-grade step outcomes. A missing grade falls through to the
/// stability-derived interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepPlan {
    outcomes: [Option<StepOutcome>; 4],
}

impl StepPlan {
    pub fn get(&self, grade: Grade) -> Option<StepOutcome> {
        self.outcomes[grade.index()]
    }

    pub fn set(&mut self, grade: Grade, outcome: StepOutcome) {
        self.outcomes[grade.index()] = Some(outcome);
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.iter().all(Option::is_none)
    }
}

/// Maps a card position in its step list to per-grade waits.
#[cfg_attr(test, mockall::automock)]
pub trait LearningStepsStrategy {
    /// Resolve the plan for a card in `state` at step index `cur_step`.
    fn resolve(&self, params: &Parameters, state: State, cur_step: u32) -> StepPlan;
}

/// Default step resolution.
///
/// Review and Relearning cards use the relearning steps, everything else
/// the learning steps. Again restarts at step 0, Hard stays on the current
/// step and Good advances to the next one when it exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicLearningSteps;

fn grade_minutes(steps: &GradeSteps, grade: Grade) -> Option<i64> {
    let unit = match grade {
        Grade::Again => steps.again,
        Grade::Hard => steps.hard,
        Grade::Good => steps.good,
        Grade::Easy => None,
    };
    unit.map(|u| i64::from(u.to_minutes()))
}

/// Minutes Good would wait on this step, if any.
fn good_minutes(step: &LearningStep) -> Option<i64> {
    match step {
        LearningStep::Uniform(unit) => Some(i64::from(unit.to_minutes())),
        LearningStep::PerGrade(map) => grade_minutes(map, Grade::Good),
    }
}

fn round_half(minutes: f64) -> i64 {
    minutes.round() as i64
}

impl BasicLearningSteps {
    fn again_minutes(first: &LearningStep) -> i64 {
        match first {
            LearningStep::Uniform(unit) => i64::from(unit.to_minutes()),
            LearningStep::PerGrade(map) => grade_minutes(map, Grade::Again).unwrap_or(1),
        }
    }

    fn hard_minutes(steps: &[LearningStep]) -> i64 {
        match &steps[0] {
            LearningStep::PerGrade(map) => grade_minutes(map, Grade::Hard).unwrap_or(0),
            LearningStep::Uniform(unit) => {
                let first = i64::from(unit.to_minutes());
                if steps.len() == 1 {
                    return round_half(first as f64 * 1.5);
                }
                match good_minutes(&steps[1]).filter(|&m| m != 0) {
                    Some(next) => round_half((first + next) as f64 / 2.0),
                    None => round_half(first as f64 * 1.5),
                }
            }
        }
    }
}

impl LearningStepsStrategy for BasicLearningSteps {
    fn resolve(&self, params: &Parameters, state: State, cur_step: u32) -> StepPlan {
        let steps = match state {
            State::Review | State::Relearning => params.relearning_steps(),
            State::New | State::Learning => params.learning_steps(),
        };
        let len = steps.len();
        let cur = cur_step as usize;
        let mut plan = StepPlan::default();
        if len == 0 || cur >= len {
            return plan;
        }

        let step_info = &steps[cur.min(len - 1)];

        if state == State::Review {
            let minutes = match step_info {
                LearningStep::Uniform(unit) => i64::from(unit.to_minutes()),
                LearningStep::PerGrade(map) => grade_minutes(map, Grade::Again).unwrap_or(0),
            };
            plan.set(
                Grade::Again,
                StepOutcome {
                    scheduled_minutes: minutes,
                    next_step: 0,
                },
            );
            return plan;
        }

        match step_info {
            LearningStep::Uniform(_) => {
                plan.set(
                    Grade::Again,
                    StepOutcome {
                        scheduled_minutes: Self::again_minutes(&steps[0]),
                        next_step: 0,
                    },
                );
                plan.set(
                    Grade::Hard,
                    StepOutcome {
                        scheduled_minutes: Self::hard_minutes(steps),
                        next_step: cur_step,
                    },
                );
                if cur + 1 < len {
                    if let Some(next) = good_minutes(&steps[cur + 1]).filter(|&m| m != 0) {
                        plan.set(
                            Grade::Good,
                            StepOutcome {
                                scheduled_minutes: next,
                                next_step: cur_step + 1,
                            },
                        );
                    }
                }
            }
            LearningStep::PerGrade(map) => {
                let next_steps = [(Grade::Again, 0), (Grade::Hard, cur_step), (Grade::Good, cur_step + 1)];
                for (grade, next_step) in next_steps {
                    if let Some(minutes) = grade_minutes(map, grade) {
                        plan.set(
                            grade,
                            StepOutcome {
                                scheduled_minutes: minutes,
                                next_step,
                            },
                        );
                    }
                }
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StepUnit;

    fn params(learning: &[&str], relearning: &[&str]) -> Parameters {
        Parameters::default()
            .with_learning_steps(LearningStep::parse_list(learning).unwrap())
            .unwrap()
            .with_relearning_steps(LearningStep::parse_list(relearning).unwrap())
            .unwrap()
    }

    fn outcome(scheduled_minutes: i64, next_step: u32) -> Option<StepOutcome> {
        Some(StepOutcome {
            scheduled_minutes,
            next_step,
        })
    }

    #[test]
    fn test_new_card_default_steps() {
        let plan = BasicLearningSteps.resolve(&params(&["1m", "10m"], &["10m"]), State::New, 0);
        assert_eq!(plan.get(Grade::Again), outcome(1, 0));
        assert_eq!(plan.get(Grade::Hard), outcome(6, 0));
        assert_eq!(plan.get(Grade::Good), outcome(10, 1));
        assert_eq!(plan.get(Grade::Easy), None);
    }

    #[test]
    fn test_last_learning_step_has_no_good() {
        let plan = BasicLearningSteps.resolve(&params(&["1m", "10m"], &["10m"]), State::Learning, 1);
        assert_eq!(plan.get(Grade::Again), outcome(1, 0));
        assert_eq!(plan.get(Grade::Hard), outcome(6, 1));
        assert_eq!(plan.get(Grade::Good), None);
    }

    #[test]
    fn test_review_lapse_only_sets_again() {
        let plan = BasicLearningSteps.resolve(&params(&["1m", "10m"], &["10m"]), State::Review, 0);
        assert_eq!(plan.get(Grade::Again), outcome(10, 0));
        assert_eq!(plan.get(Grade::Hard), None);
        assert_eq!(plan.get(Grade::Good), None);
    }

    #[test]
    fn test_single_relearning_step() {
        let p = params(&["1m", "10m"], &["10m"]);
        let plan = BasicLearningSteps.resolve(&p, State::Relearning, 0);
        assert_eq!(plan.get(Grade::Again), outcome(10, 0));
        assert_eq!(plan.get(Grade::Hard), outcome(15, 0));
        assert_eq!(plan.get(Grade::Good), None);

        assert!(BasicLearningSteps.resolve(&p, State::Relearning, 1).is_empty());
    }

    #[test]
    fn test_two_relearning_steps() {
        let plan =
            BasicLearningSteps.resolve(&params(&["1m", "10m"], &["10m", "20m"]), State::Relearning, 0);
        assert_eq!(plan.get(Grade::Again), outcome(10, 0));
        assert_eq!(plan.get(Grade::Hard), outcome(15, 0));
        assert_eq!(plan.get(Grade::Good), outcome(20, 1));
    }

    #[test]
    fn test_empty_steps() {
        let p = params(&[], &[]);
        assert!(BasicLearningSteps.resolve(&p, State::New, 0).is_empty());
        assert!(BasicLearningSteps.resolve(&p, State::Review, 0).is_empty());
    }

    #[test]
    fn test_per_grade_step() {
        let map = GradeSteps {
            again: Some(StepUnit::minutes(5)),
            hard: Some(StepUnit::minutes(10)),
            good: Some(StepUnit::hours(1)),
            easy: Some(StepUnit::days(1)),
        };
        let p = Parameters::default()
            .with_learning_steps(vec![map.into(), StepUnit::hours(2).into()])
            .unwrap();
        let plan = BasicLearningSteps.resolve(&p, State::Learning, 0);
        assert_eq!(plan.get(Grade::Again), outcome(5, 0));
        assert_eq!(plan.get(Grade::Hard), outcome(10, 0));
        assert_eq!(plan.get(Grade::Good), outcome(60, 1));
        assert_eq!(plan.get(Grade::Easy), None, "Easy is never stepped");
    }

    #[test]
    fn test_hard_averages_with_per_grade_second_step() {
        let second = GradeSteps {
            good: Some(StepUnit::minutes(30)),
            ..Default::default()
        };
        let p = Parameters::default()
            .with_learning_steps(vec![StepUnit::minutes(10).into(), second.into()])
            .unwrap();
        let plan = BasicLearningSteps.resolve(&p, State::New, 0);
        assert_eq!(plan.get(Grade::Hard), outcome(20, 0));
        assert_eq!(plan.get(Grade::Good), outcome(30, 1));
    }
}
