//! Review logs and scheduling outcomes.

use std::ops::Index;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Card, Grade, Rating, State};

/// Immutable record of one scheduling decision.
///
/// All memory fields hold the values the card had before the review, so a
/// log plus its resulting card is enough to roll the review back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
    pub rating: Rating,
    /// State before the review.
    pub state: State,
    /// Previous review time, or the due date for a card that was new.
    pub due: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    pub elapsed_days: i64,
    /// `elapsed_days` the card carried before this update.
    pub last_elapsed_days: i64,
    /// Interval in effect before this review.
    pub scheduled_days: i64,
    #[serde(default)]
    pub learning_steps: u32,
    /// When the review happened.
    pub review: DateTime<Utc>,
}

/// A resulting card together with the log that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLogItem {
    pub card: Card,
    pub log: ReviewLog,
}

/// The four possible outcomes of one review, indexed by grade.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    items: [RecordLogItem; 4],
}

impl Preview {
    pub(crate) fn new(items: [RecordLogItem; 4]) -> Self {
        Self { items }
    }

    /// Outcome for a grade.
    pub fn get(&self, grade: Grade) -> &RecordLogItem {
        &self.items[grade.index()]
    }

    /// Outcomes in Again, Hard, Good, Easy order.
    pub fn iter(&self) -> std::slice::Iter<'_, RecordLogItem> {
        self.items.iter()
    }

    /// Take the outcome for a grade, dropping the others.
    pub fn into_item(self, grade: Grade) -> RecordLogItem {
        let [again, hard, good, easy] = self.items;
        match grade {
            Grade::Again => again,
            Grade::Hard => hard,
            Grade::Good => good,
            Grade::Easy => easy,
        }
    }
}

impl Index<Grade> for Preview {
    type Output = RecordLogItem;

    fn index(&self, grade: Grade) -> &Self::Output {
        self.get(grade)
    }
}

impl IntoIterator for Preview {
    type Item = RecordLogItem;
    type IntoIter = std::array::IntoIter<RecordLogItem, 4>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Preview {
    type Item = &'a RecordLogItem;
    type IntoIter = std::slice::Iter<'a, RecordLogItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
