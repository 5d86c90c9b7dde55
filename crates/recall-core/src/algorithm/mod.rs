//! FSRS memory model.
//!
//! Pure formulas for difficulty, stability, retrievability and intervals.
//! All stored values are rounded to eight decimals so replays reproduce
//! them exactly. Fuzzed intervals depend only on an explicit seed string.

pub mod alea;
pub mod fuzz;
pub mod math;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, RecallError, RecallResult};
use crate::params::{Parameters, S_MAX, S_MIN};
use crate::types::Grade;
use alea::Alea;
use fuzz::get_fuzz_range;
use math::{clamp, round8};

/// Stability and difficulty of a memory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    pub stability: f64,
    pub difficulty: f64,
}

/// The FSRS formulas bound to one parameter set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Algorithm {
    params: Parameters,
}

impl Algorithm {
    pub fn new(params: Parameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    fn w(&self, index: usize) -> f64 {
        self.params.w()[index]
    }

    /// Initial stability after the first rating: `max(w[g-1], 0.1)`.
    pub fn init_stability(&self, grade: Grade) -> f64 {
        self.w(grade.index()).max(0.1)
    }

    /// Initial difficulty before rounding and clamping:
    /// `w4 - e^((g-1)*w5) + 1`.
    ///
    /// Mean reversion pulls toward this value for Easy, unrounded.
    pub fn raw_init_difficulty(&self, grade: Grade) -> f64 {
        self.w(4) - ((grade.value() - 1.0) * self.w(5)).exp() + 1.0
    }

    /// Initial difficulty, rounded and clamped to [1, 10].
    pub fn init_difficulty(&self, grade: Grade) -> f64 {
        clamp(round8(self.raw_init_difficulty(grade)), 1.0, 10.0)
    }

    fn linear_damping(delta: f64, difficulty: f64) -> f64 {
        round8(delta * (10.0 - difficulty) / 9.0)
    }

    fn mean_reversion(&self, init: f64, current: f64) -> f64 {
        round8(self.w(7) * init + (1.0 - self.w(7)) * current)
    }

    /// Difficulty after a review.
    ///
    /// The grade shifts difficulty by `-w6 * (g - 3)`, damped as difficulty
    /// approaches 10, then reverted toward the initial Easy difficulty.
    pub fn next_difficulty(&self, difficulty: f64, grade: Grade) -> f64 {
        let delta = -self.w(6) * (grade.value() - 3.0);
        let next = difficulty + Self::linear_damping(delta, difficulty);
        let reverted = self.mean_reversion(self.raw_init_difficulty(Grade::Easy), next);
        clamp(reverted, 1.0, 10.0)
    }

    /// Stability after a successful recall (Hard, Good or Easy).
    ///
    /// # Arguments
    /// * `difficulty` - Difficulty before the review
    /// * `stability` - Stability before the review
    /// * `retrievability` - Recall probability at review time
    /// * `grade` - Hard applies the w15 penalty, Easy the w16 bonus
    pub fn next_recall_stability(
        &self,
        difficulty: f64,
        stability: f64,
        retrievability: f64,
        grade: Grade,
    ) -> f64 {
        let hard_penalty = if grade == Grade::Hard { self.w(15) } else { 1.0 };
        let easy_bonus = if grade == Grade::Easy { self.w(16) } else { 1.0 };
        let growth = self.w(8).exp()
            * (11.0 - difficulty)
            * stability.powf(-self.w(9))
            * (((1.0 - retrievability) * self.w(10)).exp() - 1.0)
            * hard_penalty
            * easy_bonus;
        round8(clamp(stability * (1.0 + growth), S_MIN, S_MAX))
    }

    /// Stability after a lapse.
    pub fn next_forget_stability(&self, difficulty: f64, stability: f64, retrievability: f64) -> f64 {
        let value = self.w(11)
            * difficulty.powf(-self.w(12))
            * ((stability + 1.0).powf(self.w(13)) - 1.0)
            * ((1.0 - retrievability) * self.w(14)).exp();
        round8(clamp(value, S_MIN, S_MAX))
    }

    /// Stability after a same-day review.
    ///
    /// Good and Easy never lower stability.
    pub fn next_short_term_stability(&self, stability: f64, grade: Grade) -> f64 {
        let mut sinc = stability.powf(-self.w(19))
            * (self.w(17) * (grade.value() - 3.0 + self.w(18))).exp();
        if grade >= Grade::Good {
            sinc = sinc.max(1.0);
        }
        round8(clamp(stability * sinc, S_MIN, S_MAX))
    }

    /// Lower bound for post-lapse stability when short-term scheduling is
    /// on: the previous stability divided by `e^(w17 * w18)`.
    pub(crate) fn short_term_lapse_floor(&self, stability: f64) -> f64 {
        round8(stability / (self.w(17) * self.w(18)).exp()).max(S_MIN)
    }

    /// Probability of recall after `elapsed_days` at the given stability.
    pub fn forgetting_curve(&self, elapsed_days: i64, stability: f64) -> f64 {
        math::forgetting_curve(self.w(20), elapsed_days as f64, stability)
    }

    /// Interval in days before fuzzing: `round(s * modifier)` within
    /// `[1, maximum_interval]`.
    pub fn raw_interval(&self, stability: f64) -> i64 {
        let interval = (stability * self.params.interval_modifier()).round();
        let interval = if interval.is_finite() { interval as i64 } else { i64::MAX };
        interval.max(1).min(self.params.maximum_interval())
    }

    /// Next interval in days for a stability, fuzzed with `seed` when fuzz
    /// is enabled.
    pub fn next_interval(&self, stability: f64, elapsed_days: i64, seed: &str) -> i64 {
        self.apply_fuzz(self.raw_interval(stability) as f64, elapsed_days, seed)
    }

    /// Spread an interval over its fuzz window.
    ///
    /// Intervals below 2.5 days and disabled fuzz return the rounded input.
    pub fn apply_fuzz(&self, interval: f64, elapsed_days: i64, seed: &str) -> i64 {
        if !self.params.enable_fuzz() || interval < 2.5 {
            return interval.round() as i64;
        }
        let fuzz_factor = Alea::new(seed).next_f64();
        let range = get_fuzz_range(interval, elapsed_days, self.params.maximum_interval());
        (fuzz_factor * (range.max_ivl - range.min_ivl + 1) as f64 + range.min_ivl as f64).floor()
            as i64
    }

    /// Step a memory state through one review `t` days after the previous
    /// one. `None` (or an all-zero state) is a new memory.
    ///
    /// # Errors
    /// Negative `t` and states with difficulty below 1 or stability below
    /// the minimum are validation errors.
    pub fn next_state(
        &self,
        memory: Option<MemoryState>,
        t: i64,
        grade: Grade,
    ) -> RecallResult<MemoryState> {
        if t < 0 {
            return Err(RecallError::validation_with_suggestion(
                ErrorCode::ValInvalidInput,
                format!("Invalid delta_t \"{}\"", t),
                "Elapsed days must not be negative",
            ));
        }

        let MemoryState {
            stability: s,
            difficulty: d,
        } = memory.unwrap_or(MemoryState {
            stability: 0.0,
            difficulty: 0.0,
        });

        if d == 0.0 && s == 0.0 {
            return Ok(MemoryState {
                stability: self.init_stability(grade),
                difficulty: self.init_difficulty(grade),
            });
        }
        if d < 1.0 || s < S_MIN {
            return Err(RecallError::validation(format!(
                "Invalid memory state {{ difficulty: {}, stability: {} }}",
                d, s
            )));
        }

        let r = self.forgetting_curve(t, s);
        let difficulty = self.next_difficulty(d, grade);
        let mut stability = match grade {
            Grade::Again => {
                let after_fail = self.next_forget_stability(d, s, r);
                if self.params.enable_short_term() {
                    self.short_term_lapse_floor(s).min(after_fail)
                } else {
                    after_fail
                }
            }
            _ => self.next_recall_stability(d, s, r, grade),
        };

        if t == 0 && self.params.enable_short_term() {
            stability = self.next_short_term_stability(s, grade);
        }

        Ok(MemoryState {
            stability,
            difficulty,
        })
    }
}
