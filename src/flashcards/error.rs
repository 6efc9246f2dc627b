//! Error types for review scheduling

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Flashcard not found: {0}")]
    FlashcardNotFound(Uuid),

    #[error("Invalid difficulty rating: {0:?} (expected hard, medium or easy)")]
    InvalidDifficultyRating(String),

    #[error("Repetition {repetition_count} already recorded for flashcard {flashcard_id}")]
    DuplicateRepetition {
        flashcard_id: Uuid,
        repetition_count: u32,
    },

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Review interval of {days} days is outside the representable time range")]
    IntervalOutOfRange { days: f64 },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
