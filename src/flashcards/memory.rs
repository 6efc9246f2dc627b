//! In-memory review store
//!
//! Holds flashcards and review history in process memory with the same
//! uniqueness rule as the SQLite store. Useful for tests and for
//! throwaway study sessions that never touch disk.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use super::error::{Result, SchedulerError};
use super::models::{Flashcard, ReviewRecord};
use super::store::ReviewStore;

#[derive(Default)]
struct MemoryState {
    cards: Vec<Flashcard>,
    reviews: HashMap<Uuid, Vec<ReviewRecord>>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| SchedulerError::PersistenceUnavailable("memory store lock poisoned".into()))
    }

    pub fn add_flashcard(&self, card: Flashcard) -> Result<Flashcard> {
        self.lock()?.cards.push(card.clone());
        Ok(card)
    }

    /// Remove a card together with its review history
    pub fn delete_flashcard(&self, flashcard_id: Uuid) -> Result<bool> {
        let mut state = self.lock()?;
        let before = state.cards.len();
        state.cards.retain(|c| c.id != flashcard_id);
        state.reviews.remove(&flashcard_id);
        Ok(state.cards.len() != before)
    }

    /// Remove every card of a lecture
    pub fn delete_lecture(&self, lecture_id: Uuid) -> Result<usize> {
        let mut state = self.lock()?;
        let removed: Vec<Uuid> = state
            .cards
            .iter()
            .filter(|c| c.lecture_id == lecture_id)
            .map(|c| c.id)
            .collect();
        state.cards.retain(|c| c.lecture_id != lecture_id);
        for id in &removed {
            state.reviews.remove(id);
        }
        Ok(removed.len())
    }
}

impl ReviewStore for MemoryStore {
    fn get_flashcard(&self, flashcard_id: Uuid) -> Result<Option<Flashcard>> {
        Ok(self
            .lock()?
            .cards
            .iter()
            .find(|c| c.id == flashcard_id)
            .cloned())
    }

    fn list_flashcards(&self, lecture_id: Option<Uuid>) -> Result<Vec<Flashcard>> {
        Ok(self
            .lock()?
            .cards
            .iter()
            .filter(|c| lecture_id.map_or(true, |id| c.lecture_id == id))
            .cloned()
            .collect())
    }

    fn list_review_records(&self, flashcard_id: Uuid) -> Result<Vec<ReviewRecord>> {
        let state = self.lock()?;
        let mut records = state.reviews.get(&flashcard_id).cloned().unwrap_or_default();
        records.sort_by(|a, b| {
            b.reviewed_at
                .cmp(&a.reviewed_at)
                .then(b.repetition_count.cmp(&a.repetition_count))
        });
        Ok(records)
    }

    fn create_review_record(&self, record: ReviewRecord) -> Result<ReviewRecord> {
        let mut state = self.lock()?;
        if !state.cards.iter().any(|c| c.id == record.flashcard_id) {
            return Err(SchedulerError::FlashcardNotFound(record.flashcard_id));
        }

        let history = state.reviews.entry(record.flashcard_id).or_default();
        if history
            .iter()
            .any(|r| r.repetition_count == record.repetition_count)
        {
            return Err(SchedulerError::DuplicateRepetition {
                flashcard_id: record.flashcard_id,
                repetition_count: record.repetition_count,
            });
        }

        history.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::models::Difficulty;
    use crate::flashcards::record_review;
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread;

    fn record(card_id: Uuid, repetition: u32) -> ReviewRecord {
        let now = Utc::now();
        ReviewRecord::new(card_id, now, Difficulty::Medium, now, repetition)
    }

    #[test]
    fn test_rejects_duplicate_repetition() {
        let store = MemoryStore::new();
        let card = store
            .add_flashcard(Flashcard::new(Uuid::new_v4(), "Q".into(), "A".into()))
            .unwrap();

        store.create_review_record(record(card.id, 1)).unwrap();
        let err = store.create_review_record(record(card.id, 1)).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::DuplicateRepetition { repetition_count: 1, .. }
        ));
    }

    #[test]
    fn test_rejects_unknown_card() {
        let store = MemoryStore::new();
        let err = store
            .create_review_record(record(Uuid::new_v4(), 1))
            .unwrap_err();
        assert!(matches!(err, SchedulerError::FlashcardNotFound(_)));
    }

    #[test]
    fn test_delete_lecture_cascades() {
        let store = MemoryStore::new();
        let lecture = Uuid::new_v4();
        let other = Uuid::new_v4();
        let card = store
            .add_flashcard(Flashcard::new(lecture, "Q1".into(), "A1".into()))
            .unwrap();
        store
            .add_flashcard(Flashcard::new(other, "Q2".into(), "A2".into()))
            .unwrap();
        store.create_review_record(record(card.id, 1)).unwrap();

        assert_eq!(store.delete_lecture(lecture).unwrap(), 1);
        assert!(store.get_flashcard(card.id).unwrap().is_none());
        assert!(store.list_review_records(card.id).unwrap().is_empty());
        assert_eq!(store.list_flashcards(None).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_flashcard_drops_history() {
        let store = MemoryStore::new();
        let lecture = Uuid::new_v4();
        let kept = store
            .add_flashcard(Flashcard::new(lecture, "Q1".into(), "A1".into()))
            .unwrap();
        let removed = store
            .add_flashcard(Flashcard::new(lecture, "Q2".into(), "A2".into()))
            .unwrap();
        store.create_review_record(record(removed.id, 1)).unwrap();

        assert!(store.delete_flashcard(removed.id).unwrap());
        assert!(!store.delete_flashcard(removed.id).unwrap());
        assert!(store.list_review_records(removed.id).unwrap().is_empty());
        assert_eq!(store.list_flashcards(Some(lecture)).unwrap(), vec![kept]);
        assert!(matches!(
            store.create_review_record(record(removed.id, 1)),
            Err(SchedulerError::FlashcardNotFound(_))
        ));
    }

    #[test]
    fn test_poisoned_lock_is_persistence_error() {
        let store = Arc::new(MemoryStore::new());
        let card = store
            .add_flashcard(Flashcard::new(Uuid::new_v4(), "Q".into(), "A".into()))
            .unwrap();

        let holder = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _state = holder.state.lock().unwrap();
            panic!("store holder crashed");
        })
        .join();

        let err = record_review(&*store, card.id, Difficulty::Easy).unwrap_err();
        assert!(matches!(err, SchedulerError::PersistenceUnavailable(_)));
        assert!(matches!(
            store.list_flashcards(None),
            Err(SchedulerError::PersistenceUnavailable(_))
        ));
    }
}
