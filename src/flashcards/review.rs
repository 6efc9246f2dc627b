//! Review operations: scheduling, due selection and progress
//!
//! Due status is derived on every query from the latest review record of
//! each card; nothing is cached and no background timer runs.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::algorithm::{compute_next_interval, next_review_at, preview_intervals};
use super::error::{Result, SchedulerError};
use super::models::{CardWithReview, Difficulty, Flashcard, ReviewRecord, StudyProgress};
use super::store::ReviewStore;

/// Record a review of a card rated `difficulty` and schedule its next review
pub fn record_review<S: ReviewStore + ?Sized>(
    store: &S,
    flashcard_id: Uuid,
    difficulty: Difficulty,
) -> Result<ReviewRecord> {
    record_review_with_clock(store, flashcard_id, difficulty, &Utc::now)
}

/// Same as [`record_review`] with a fixed review time
pub fn record_review_at<S: ReviewStore + ?Sized>(
    store: &S,
    flashcard_id: Uuid,
    difficulty: Difficulty,
    now: DateTime<Utc>,
) -> Result<ReviewRecord> {
    record_review_with_clock(store, flashcard_id, difficulty, &|| now)
}

/// Parse a raw rating ("1".."3" or "hard"/"medium"/"easy") and record it.
///
/// An unrecognised rating fails before the store is touched.
pub fn record_rating<S: ReviewStore + ?Sized>(
    store: &S,
    flashcard_id: Uuid,
    rating: &str,
) -> Result<ReviewRecord> {
    let difficulty: Difficulty = rating.parse()?;
    record_review(store, flashcard_id, difficulty)
}

fn record_review_with_clock<S: ReviewStore + ?Sized>(
    store: &S,
    flashcard_id: Uuid,
    difficulty: Difficulty,
    clock: &dyn Fn() -> DateTime<Utc>,
) -> Result<ReviewRecord> {
    match append_review(store, flashcard_id, difficulty, clock()) {
        Err(SchedulerError::DuplicateRepetition {
            repetition_count, ..
        }) => {
            log::warn!(
                "Concurrent review of flashcard {} claimed repetition {}, retrying",
                flashcard_id,
                repetition_count
            );
            append_review(store, flashcard_id, difficulty, clock())
        }
        other => other,
    }
}

/// One read-compute-append pass. The store's uniqueness rule on
/// `(flashcard_id, repetition_count)` rejects the loser of a race.
fn append_review<S: ReviewStore + ?Sized>(
    store: &S,
    flashcard_id: Uuid,
    difficulty: Difficulty,
    now: DateTime<Utc>,
) -> Result<ReviewRecord> {
    if store.get_flashcard(flashcard_id)?.is_none() {
        return Err(SchedulerError::FlashcardNotFound(flashcard_id));
    }

    let prior = store.list_review_records(flashcard_id)?;
    let repetition_count = next_repetition(prior.len());

    // Keep timestamp order aligned with repetition order even if the
    // caller's clock lags behind the record that won a race.
    let reviewed_at = prior
        .first()
        .map_or(now, |latest| latest.reviewed_at.max(now));

    let days = compute_next_interval(difficulty, repetition_count);
    let next_review = next_review_at(reviewed_at, days)?;

    let record = store.create_review_record(ReviewRecord::new(
        flashcard_id,
        reviewed_at,
        difficulty,
        next_review,
        repetition_count,
    ))?;

    log::info!(
        "Recorded {} review #{} for flashcard {}, next review {}",
        difficulty,
        repetition_count,
        flashcard_id,
        record.next_review_at
    );

    Ok(record)
}

fn next_repetition(prior_count: usize) -> u32 {
    u32::try_from(prior_count)
        .map(|count| count.saturating_add(1))
        .unwrap_or(u32::MAX)
}

/// Intervals (Hard, Medium, Easy) the next review of a card would produce
pub fn preview_review<S: ReviewStore + ?Sized>(store: &S, flashcard_id: Uuid) -> Result<[f64; 3]> {
    if store.get_flashcard(flashcard_id)?.is_none() {
        return Err(SchedulerError::FlashcardNotFound(flashcard_id));
    }
    let prior = store.list_review_records(flashcard_id)?.len();
    Ok(preview_intervals(next_repetition(prior)))
}

// ==================== Due Selection ====================

/// Cards eligible for review now, optionally limited to one lecture
pub fn due_flashcards<S: ReviewStore + ?Sized>(
    store: &S,
    lecture_id: Option<Uuid>,
) -> Result<Vec<Flashcard>> {
    due_flashcards_at(store, lecture_id, Utc::now())
}

pub fn due_flashcards_at<S: ReviewStore + ?Sized>(
    store: &S,
    lecture_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Vec<Flashcard>> {
    Ok(due_with_reviews_at(store, lecture_id, now)?
        .into_iter()
        .map(|c| c.card)
        .collect())
}

/// Due cards paired with their latest review, in card creation order.
///
/// A card is due when it has never been reviewed or its latest
/// `next_review_at` is not after `now`.
pub fn due_with_reviews_at<S: ReviewStore + ?Sized>(
    store: &S,
    lecture_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Vec<CardWithReview>> {
    let mut due = Vec::new();
    for card in store.list_flashcards(lecture_id)? {
        let last_review = store.latest_review_record(card.id)?;
        if last_review.as_ref().map_or(true, |r| r.is_due(now)) {
            due.push(CardWithReview { card, last_review });
        }
    }
    Ok(due)
}

// ==================== Progress ====================

/// Share of a lecture's cards that have been reviewed at least once
pub fn study_progress<S: ReviewStore + ?Sized>(store: &S, lecture_id: Uuid) -> Result<StudyProgress> {
    let cards = store.list_flashcards(Some(lecture_id))?;

    let mut reviewed = 0;
    for card in &cards {
        if store.latest_review_record(card.id)?.is_some() {
            reviewed += 1;
        }
    }

    Ok(StudyProgress::new(cards.len(), reviewed))
}
