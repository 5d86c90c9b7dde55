//! Operations over a card's review history.

mod forget;
mod reschedule;
mod rollback;

pub use forget::forget;
pub use reschedule::{HistoryEntry, HistoryOrder, RescheduleOptions, RescheduleResult, Rescheduler};
pub use rollback::rollback;
