//! Numeric helpers for the forgetting-curve formulas.

/// Round to a fixed number of decimal places.
///
/// Stored stability, difficulty and retrievability values are kept at eight
/// decimals so that replays reproduce them exactly.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Eight-decimal rounding used throughout the model.
pub(crate) fn round8(value: f64) -> f64 {
    round_to(value, 8)
}

/// Clamp without panicking on inverted or NaN bounds. A NaN value lands on
/// `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Decay exponent and curve factor derived from the decay weight (w20).
///
/// The factor is chosen so that retrievability is exactly 0.9 when the
/// elapsed time equals the stability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayFactor {
    pub decay: f64,
    pub factor: f64,
}

impl DecayFactor {
    pub fn from_weight(w20: f64) -> Self {
        let decay = -w20;
        let factor = 0.9f64.powf(1.0 / decay) - 1.0;
        Self { decay, factor }
    }
}

/// R(t, S) = (1 + FACTOR * t / S) ^ DECAY, rounded to eight decimals.
pub fn forgetting_curve(w20: f64, elapsed_days: f64, stability: f64) -> f64 {
    let DecayFactor { decay, factor } = DecayFactor::from_weight(w20);
    round8((1.0 + factor * elapsed_days / stability).powf(decay))
}
