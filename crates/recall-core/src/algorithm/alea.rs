//! Alea: a small seeded PRNG with three fractional state words and a carry.
//!
//! Interval fuzzing draws from this generator so that a given seed string
//! always produces the same fuzzed interval across hosts. The arithmetic
//! reproduces 32-bit truncation exactly on top of `f64`.

use serde::{Deserialize, Serialize};

const TWO_POW_32: f64 = 4_294_967_296.0;
const TWO_POW_NEG_32: f64 = 2.328_306_436_538_696_3e-10;
const TWO_POW_NEG_53: f64 = 1.110_223_024_625_156_5e-16;

/// Truncate to an unsigned 32-bit value, wrapping.
fn to_uint32(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.trunc().rem_euclid(TWO_POW_32)
}

/// Truncate to a signed 32-bit value, wrapping.
fn to_int32(value: f64) -> i32 {
    let unsigned = to_uint32(value);
    if unsigned >= TWO_POW_32 / 2.0 {
        (unsigned - TWO_POW_32) as i32
    } else {
        unsigned as i32
    }
}

/// String hash feeding the generator state. Keeps its accumulator across
/// calls.
struct Mash {
    n: f64,
}

impl Mash {
    fn new() -> Self {
        Self {
            n: f64::from(0xefc8_249d_u32),
        }
    }

    fn hash(&mut self, data: &str) -> f64 {
        let mut n = self.n;
        for unit in data.encode_utf16() {
            n += f64::from(unit);
            let mut h = 0.025_196_032_824_169_38 * n;
            n = to_uint32(h);
            h -= n;
            h *= n;
            n = to_uint32(h);
            h -= n;
            n += h * TWO_POW_32;
        }
        self.n = n;
        to_uint32(n) * TWO_POW_NEG_32
    }
}

/// Snapshot of the generator, for export and import.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AleaState {
    pub c: i32,
    pub s0: f64,
    pub s1: f64,
    pub s2: f64,
}

/// Seeded generator.
#[derive(Debug, Clone)]
pub struct Alea {
    c: i32,
    s0: f64,
    s1: f64,
    s2: f64,
}

impl Alea {
    /// Seed a new generator from a string.
    pub fn new(seed: &str) -> Self {
        let mut mash = Mash::new();
        let mut s0 = mash.hash(" ");
        let mut s1 = mash.hash(" ");
        let mut s2 = mash.hash(" ");

        s0 -= mash.hash(seed);
        if s0 < 0.0 {
            s0 += 1.0;
        }
        s1 -= mash.hash(seed);
        if s1 < 0.0 {
            s1 += 1.0;
        }
        s2 -= mash.hash(seed);
        if s2 < 0.0 {
            s2 += 1.0;
        }

        Self { c: 1, s0, s1, s2 }
    }

    /// Restore a generator from a snapshot.
    pub fn from_state(state: AleaState) -> Self {
        Self {
            c: state.c,
            s0: state.s0,
            s1: state.s1,
            s2: state.s2,
        }
    }

    pub fn state(&self) -> AleaState {
        AleaState {
            c: self.c,
            s0: self.s0,
            s1: self.s1,
            s2: self.s2,
        }
    }

    /// Next value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        let t = 2_091_639.0 * self.s0 + f64::from(self.c) * TWO_POW_NEG_32;
        self.s0 = self.s1;
        self.s1 = self.s2;
        self.c = to_int32(t);
        self.s2 = t - f64::from(self.c);
        self.s2
    }

    /// Next value as a signed 32-bit integer.
    pub fn int32(&mut self) -> i32 {
        to_int32(self.next_f64() * TWO_POW_32)
    }

    /// Next value with 53 bits of precision. Consumes two draws.
    pub fn double(&mut self) -> f64 {
        let high = self.next_f64();
        let low = self.next_f64();
        high + f64::from(to_int32(low * 2_097_152.0)) * TWO_POW_NEG_53
    }
}
