pub mod config;
pub mod flashcards;
pub mod storage;

pub use config::StudyConfig;
pub use flashcards::{ReviewStore, SchedulerError};
pub use storage::{StorageError, StudyDatabase};
