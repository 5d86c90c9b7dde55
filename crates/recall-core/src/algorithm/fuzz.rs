//! Fuzz window around a computed interval.

/// One tier of the fuzz window: each day of interval in `[start, end)`
/// widens the window by `factor` days.
struct FuzzTier {
    start: f64,
    end: f64,
    factor: f64,
}

const FUZZ_TIERS: [FuzzTier; 3] = [
    FuzzTier {
        start: 2.5,
        end: 7.0,
        factor: 0.15,
    },
    FuzzTier {
        start: 7.0,
        end: 20.0,
        factor: 0.1,
    },
    FuzzTier {
        start: 20.0,
        end: f64::INFINITY,
        factor: 0.05,
    },
];

/// Inclusive bounds a fuzzed interval may land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzRange {
    pub min_ivl: i64,
    pub max_ivl: i64,
}

impl FuzzRange {
    pub fn contains(&self, interval: i64) -> bool {
        (self.min_ivl..=self.max_ivl).contains(&interval)
    }
}

/// Compute the fuzz window for an interval.
///
/// The lower bound never drops below 2 days and, when the interval is
/// longer than the time already elapsed, never schedules the card earlier
/// than one day past the elapsed time.
pub fn get_fuzz_range(interval: f64, elapsed_days: i64, maximum_interval: i64) -> FuzzRange {
    let delta = FUZZ_TIERS.iter().fold(1.0, |acc, tier| {
        acc + tier.factor * (interval.min(tier.end) - tier.start).max(0.0)
    });
    let interval = interval.min(maximum_interval as f64);
    let mut min_ivl = ((interval - delta).round() as i64).max(2);
    let max_ivl = ((interval + delta).round() as i64).min(maximum_interval);
    if interval > elapsed_days as f64 {
        min_ivl = min_ivl.max(elapsed_days + 1);
    }
    min_ivl = min_ivl.min(max_ivl);
    FuzzRange { min_ivl, max_ivl }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_interval_range() {
        assert_eq!(get_fuzz_range(3.0, 0, 36500), FuzzRange { min_ivl: 2, max_ivl: 4 });
    }

    #[test]
    fn test_tiers_accumulate() {
        assert_eq!(get_fuzz_range(10.0, 0, 36500), FuzzRange { min_ivl: 8, max_ivl: 12 });
        assert_eq!(get_fuzz_range(100.0, 3, 36500), FuzzRange { min_ivl: 93, max_ivl: 107 });
    }

    #[test]
    fn test_elapsed_past_interval_does_not_raise_floor() {
        assert_eq!(get_fuzz_range(30.0, 40, 36500), FuzzRange { min_ivl: 27, max_ivl: 33 });
    }

    #[test]
    fn test_elapsed_raises_floor() {
        let range = get_fuzz_range(10.0, 9, 36500);
        assert_eq!(range.min_ivl, 10);
        assert_eq!(range.max_ivl, 12);
    }

    #[test]
    fn test_capped_by_maximum_interval() {
        assert_eq!(get_fuzz_range(400.0, 0, 365), FuzzRange { min_ivl: 343, max_ivl: 365 });
    }

    #[test]
    fn test_min_never_exceeds_max() {
        for ivl in [2.5, 3.0, 5.0, 50.0, 500.0] {
            for elapsed in [0, 10, 100, 1000] {
                let range = get_fuzz_range(ivl, elapsed, 30);
                assert!(range.min_ivl <= range.max_ivl, "ivl={} elapsed={}", ivl, elapsed);
            }
        }
    }
}
