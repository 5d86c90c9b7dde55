//! recall-core - FSRS spaced-repetition scheduling.
//!
//! This crate computes when a flashcard should next be reviewed from its
//! review history, using the FSRS memory model. It is a synchronous, pure
//! library: every operation takes the card and the review time explicitly
//! and returns new values.
//!
//! # Example
//!
//! ```ignore
//! use chrono::Utc;
//! use recall_core::{Card, Fsrs, Grade};
//!
//! let fsrs = Fsrs::default();
//! let now = Utc::now();
//! let card = Card::new(now);
//!
//! // All four outcomes
//! let preview = fsrs.preview(&card, now);
//! println!("Good is due {}", preview[Grade::Good].card.due);
//!
//! // Commit one
//! let item = fsrs.review(&card, now, Grade::Good);
//! let undone = fsrs.rollback(&item.card, &item.log)?;
//! ```

pub mod algorithm;
pub mod config;
pub mod error;
pub mod fsrs;
pub mod history;
pub mod params;
pub mod scheduler;
pub mod types;

// Re-export commonly used types
pub use algorithm::{Algorithm, MemoryState};
pub use config::{Preset, SchedulerConfig, SchedulerConfigBuilder};
pub use error::{ErrorCode, RecallError, RecallResult};
pub use fsrs::Fsrs;
pub use history::{HistoryEntry, RescheduleOptions, RescheduleResult};
pub use params::{Parameters, WeightVector, DEFAULT_W};
pub use scheduler::{
    BasicLearningSteps, CardIdSeedStrategy, DefaultSeedStrategy, LearningStepsStrategy,
    SeedStrategy,
};
pub use types::{
    Card, CardInput, Grade, GradeSteps, LearningStep, Preview, Rating, RecordLogItem, ReviewLog,
    State, StepUnit,
};
