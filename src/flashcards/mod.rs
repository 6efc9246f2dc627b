//! Flashcard review scheduling
//!
//! This module provides:
//! - The interval policy (Hard/Medium/Easy base intervals with 1.5x growth)
//! - An append-only review history behind the `ReviewStore` trait
//! - Review recording, due-card selection and per-lecture progress

pub mod algorithm;
mod error;
pub mod memory;
pub mod models;
pub mod review;
mod store;

pub use error::{Result, SchedulerError};
pub use memory::MemoryStore;
pub use models::*;
pub use review::{
    due_flashcards, due_flashcards_at, due_with_reviews_at, preview_review, record_rating,
    record_review, record_review_at, study_progress,
};
pub use store::ReviewStore;
