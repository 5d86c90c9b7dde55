//! Versioned weight vectors and their migration to the canonical layout.
//!
//! FSRS-4.5 vectors have 17 weights, FSRS-5 vectors 19 and FSRS-6 vectors
//! 21. Every version is migrated to 21 weights with each slot clamped to its
//! documented range.

use tracing::{debug, warn};

use super::{FSRS5_DEFAULT_DECAY, INIT_S_MAX, S_MIN, W17_W18_CEILING};
use crate::algorithm::math::{clamp, round8};
use crate::error::{ErrorCode, RecallError, RecallResult};

/// Number of weights in the canonical (FSRS-6) layout.
pub const WEIGHT_COUNT: usize = 21;

/// Canonical weight vector.
pub type Weights = [f64; WEIGHT_COUNT];

/// A weight vector tagged by model version.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightVector {
    /// FSRS-4.5 (17 weights).
    V4([f64; 17]),
    /// FSRS-5 (19 weights).
    V5([f64; 19]),
    /// FSRS-6 (21 weights).
    V6([f64; 21]),
}

struct Migration {
    len: usize,
    version: &'static str,
    migrate: fn(&[f64], f64) -> Weights,
}

const MIGRATIONS: [Migration; 3] = [
    Migration {
        len: 17,
        version: "FSRS-4.5",
        migrate: migrate_v4,
    },
    Migration {
        len: 19,
        version: "FSRS-5",
        migrate: migrate_v5,
    },
    Migration {
        len: 21,
        version: "FSRS-6",
        migrate: migrate_v6,
    },
];

impl WeightVector {
    /// Tag a raw slice by its length.
    ///
    /// # Errors
    /// Lengths other than 17, 19 or 21 are a validation error.
    pub fn from_slice(weights: &[f64]) -> RecallResult<Self> {
        match weights.len() {
            17 => Ok(Self::V4(copy_array(weights))),
            19 => Ok(Self::V5(copy_array(weights))),
            21 => Ok(Self::V6(copy_array(weights))),
            len => Err(RecallError::validation_with_suggestion(
                ErrorCode::ValInvalidParameters,
                format!("Invalid parameter length: {}", len),
                "Must be 17, 19 or 21 for FSRS-4.5, FSRS-5 and FSRS-6 respectively",
            )),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::V4(w) => w,
            Self::V5(w) => w,
            Self::V6(w) => w,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Model version name.
    pub fn version(&self) -> &'static str {
        self.migration().version
    }

    fn migration(&self) -> &'static Migration {
        let len = self.len();
        MIGRATIONS
            .iter()
            .find(|m| m.len == len)
            .unwrap_or(&MIGRATIONS[2])
    }

    /// Migrate to the canonical 21-weight layout.
    ///
    /// The short-term weights w17/w18 get a tighter ceiling when more than
    /// one relearning step is configured.
    pub fn migrate(&self, num_relearning_steps: usize) -> Weights {
        let migration = self.migration();
        if migration.len != WEIGHT_COUNT {
            debug!(
                from = migration.len,
                version = migration.version,
                "filling weights to 21 entries"
            );
        }
        let ceiling = w17_w18_ceiling(self.as_slice(), num_relearning_steps);
        (migration.migrate)(self.as_slice(), ceiling)
    }
}

impl From<Weights> for WeightVector {
    fn from(weights: Weights) -> Self {
        Self::V6(weights)
    }
}

fn copy_array<const N: usize>(weights: &[f64]) -> [f64; N] {
    let mut out = [0.0; N];
    out.copy_from_slice(weights);
    out
}

/// Per-slot clamp ranges for the canonical layout.
pub fn clamp_ranges(w17_w18_ceiling: f64) -> [(f64, f64); WEIGHT_COUNT] {
    [
        (S_MIN, INIT_S_MAX),
        (S_MIN, INIT_S_MAX),
        (S_MIN, INIT_S_MAX),
        (S_MIN, INIT_S_MAX),
        (1.0, 10.0),
        (0.001, 4.0),
        (0.001, 4.0),
        (0.001, 0.75),
        (0.0, 4.5),
        (0.0, 0.8),
        (0.001, 3.5),
        (0.001, 5.0),
        (0.001, 0.25),
        (0.001, 0.9),
        (0.0, 4.0),
        (0.0, 1.0),
        (1.0, 6.0),
        (0.0, w17_w18_ceiling),
        (0.0, w17_w18_ceiling),
        (0.0, 0.8),
        (0.1, 0.8),
    ]
}

/// Upper bound for w17 and w18.
///
/// With n relearning steps the post-lapse stability multiplied by
/// e^(n * w17 * w18) must not exceed the pre-lapse stability for
/// D = 1, R = 0.7, S = 1.
pub fn w17_w18_ceiling(weights: &[f64], num_relearning_steps: usize) -> f64 {
    if num_relearning_steps <= 1 {
        return W17_W18_CEILING;
    }
    let value = -(weights[11].ln() + (2f64.powf(weights[13]) - 1.0).ln() + weights[14] * 0.3)
        / num_relearning_steps as f64;
    if !value.is_finite() {
        return W17_W18_CEILING;
    }
    clamp(round8(value), 0.01, W17_W18_CEILING)
}

/// Clamp every slot to its range. NaN becomes 0 before clamping.
fn clip(weights: &[f64], ceiling: f64) -> Vec<f64> {
    clamp_ranges(ceiling)
        .iter()
        .zip(weights)
        .enumerate()
        .map(|(index, (&(min, max), &value))| {
            if !value.is_finite() {
                warn!(index, value, "non-finite weight normalized");
            }
            let value = if value.is_nan() { 0.0 } else { value };
            clamp(value, min, max)
        })
        .collect()
}

fn migrate_v6(weights: &[f64], ceiling: f64) -> Weights {
    copy_array(&clip(weights, ceiling))
}

fn migrate_v5(weights: &[f64], ceiling: f64) -> Weights {
    let mut w = clip(weights, ceiling);
    w.extend_from_slice(&[0.0, FSRS5_DEFAULT_DECAY]);
    copy_array(&w)
}

fn migrate_v4(weights: &[f64], ceiling: f64) -> Weights {
    let mut w = clip(weights, ceiling);
    w[4] = round8(w[5] * 2.0 + w[4]);
    w[5] = round8((w[5] * 3.0 + 1.0).ln() / 3.0);
    w[6] = round8(w[6] + 0.5);
    w.extend_from_slice(&[0.0, 0.0, 0.0, FSRS5_DEFAULT_DECAY]);
    copy_array(&w)
}
