//! Persistence boundary for review scheduling
//!
//! Every scheduling operation takes the store as an explicit argument.
//! Implementations must reject a second record with the same
//! `(flashcard_id, repetition_count)` pair with
//! [`SchedulerError::DuplicateRepetition`], and a successful
//! [`ReviewStore::create_review_record`] must be durable before it returns.

use uuid::Uuid;

use super::error::Result;
use super::models::{Flashcard, ReviewRecord};

pub trait ReviewStore {
    /// Look up a single flashcard
    fn get_flashcard(&self, flashcard_id: Uuid) -> Result<Option<Flashcard>>;

    /// All flashcards, or those of one lecture, in creation order
    fn list_flashcards(&self, lecture_id: Option<Uuid>) -> Result<Vec<Flashcard>>;

    /// Review history of a card, most recent first
    fn list_review_records(&self, flashcard_id: Uuid) -> Result<Vec<ReviewRecord>>;

    /// Append a review record
    fn create_review_record(&self, record: ReviewRecord) -> Result<ReviewRecord>;

    /// Most recent review of a card, if any
    fn latest_review_record(&self, flashcard_id: Uuid) -> Result<Option<ReviewRecord>> {
        Ok(self.list_review_records(flashcard_id)?.into_iter().next())
    }
}
