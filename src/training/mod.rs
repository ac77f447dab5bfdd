//! Training infrastructure: self-play games, terminal credit assignment,
//! metrics collection, and the trainer that persists the learned tables.

pub mod episode;
pub mod metrics;
pub mod trainer;

pub use episode::{GameRecord, SelfPlayGame};
pub use trainer::{Trainer, TrainerConfig, TrainingReport, TrainingRun};
