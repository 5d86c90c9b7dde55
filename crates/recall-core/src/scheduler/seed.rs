//! Seeds for interval fuzzing.

use chrono::{DateTime, Utc};

use crate::types::Card;

/// What a seed strategy can see: the review time and the card after its
/// repetition count was incremented.
#[derive(Debug, Clone, Copy)]
pub struct SeedContext<'a> {
    pub review_time: DateTime<Utc>,
    pub card: &'a Card,
}

/// Derives the fuzz seed for one review.
pub trait SeedStrategy {
    fn seed(&self, ctx: &SeedContext<'_>) -> String;
}

/// `"{review_ms}_{reps}_{difficulty * stability}"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSeedStrategy;

impl SeedStrategy for DefaultSeedStrategy {
    fn seed(&self, ctx: &SeedContext<'_>) -> String {
        format!(
            "{}_{}_{}",
            ctx.review_time.timestamp_millis(),
            ctx.card.reps,
            ctx.card.difficulty * ctx.card.stability
        )
    }
}

/// `"{card_id}{reps}"`: a seed stable across review times, for hosts that
/// want the same card to fuzz the same way regardless of when it is
/// reviewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardIdSeedStrategy {
    card_id: String,
}

impl CardIdSeedStrategy {
    pub fn new(card_id: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
        }
    }
}

impl SeedStrategy for CardIdSeedStrategy {
    fn seed(&self, ctx: &SeedContext<'_>) -> String {
        format!("{}{}", self.card_id, ctx.card.reps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reviewed_card() -> (DateTime<Utc>, Card) {
        let now = Utc.with_ymd_and_hms(2022, 12, 29, 12, 30, 0).unwrap();
        let mut card = Card::new(now);
        card.reps = 1;
        (now, card)
    }

    #[test]
    fn test_default_seed_for_new_card() {
        let (now, card) = reviewed_card();
        let seed = DefaultSeedStrategy.seed(&SeedContext {
            review_time: now,
            card: &card,
        });
        assert_eq!(seed, "1672317000000_1_0");
    }

    #[test]
    fn test_default_seed_uses_memory_product() {
        let (now, mut card) = reviewed_card();
        card.difficulty = 5.0;
        card.stability = 3.1;
        let seed = DefaultSeedStrategy.seed(&SeedContext {
            review_time: now,
            card: &card,
        });
        assert_eq!(seed, "1672317000000_1_15.5");
    }

    #[test]
    fn test_card_id_seed() {
        let (now, mut card) = reviewed_card();
        card.reps = 4;
        let strategy = CardIdSeedStrategy::new("e2ecb1f7-8d15-420b-bec4-c7212ad2e5dc");
        let seed = strategy.seed(&SeedContext {
            review_time: now,
            card: &card,
        });
        assert_eq!(seed, "e2ecb1f7-8d15-420b-bec4-c7212ad2e5dc4");
    }
}
