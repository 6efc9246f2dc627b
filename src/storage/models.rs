//! Data models for lectures and their generated study material

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::flashcards::Flashcard;

/// A recorded lecture or scanned set of notes. Owns all study material
/// generated from it; deleting it deletes everything below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub id: Uuid,
    pub title: String,
    /// Name of the uploaded audio or image file
    pub filename: String,
    /// Size of the uploaded file in bytes
    #[serde(default)]
    pub file_size: u64,
    /// Audio duration in seconds (0 for scanned notes)
    #[serde(default)]
    pub duration: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lecture {
    pub fn new(title: String, filename: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            filename,
            file_size: 0,
            duration: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub lecture_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub lecture_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Multiple choice question. Accepts the content generator's snake_case
/// keys and writes camelCase like the other models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(alias = "correct_answer")]
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Open-ended question with a model answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenEndedQuestion {
    pub question: String,
    #[serde(default, alias = "sample_answer")]
    pub sample_answer: String,
    #[serde(default, alias = "key_points")]
    pub key_points: Vec<String>,
}

/// Quiz payload, read from the generator's JSON shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizContent {
    #[serde(default, alias = "multiple_choice")]
    pub multiple_choice: Vec<MultipleChoiceQuestion>,
    #[serde(default, alias = "open_ended")]
    pub open_ended: Vec<OpenEndedQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub lecture_id: Uuid,
    #[serde(flatten)]
    pub content: QuizContent,
    pub created_at: DateTime<Utc>,
}

/// Flashcard text as produced by the content generator, before it is stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFlashcard {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Everything needed to create a lecture with its generated material
#[derive(Debug, Clone, Default)]
pub struct LectureImport {
    pub title: String,
    pub filename: String,
    pub file_size: u64,
    pub duration: u64,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub quiz: Option<QuizContent>,
    pub flashcards: Vec<NewFlashcard>,
}

/// A lecture with all of its study material
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureContent {
    pub lecture: Lecture,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Transcript>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
    pub flashcards: Vec<Flashcard>,
}

/// Flashcards as emitted by the content generator: either a bare array
/// or an object with a `flashcards` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GeneratedFlashcards {
    Wrapped { flashcards: Vec<NewFlashcard> },
    List(Vec<NewFlashcard>),
}

impl GeneratedFlashcards {
    pub fn parse(json: &str) -> serde_json::Result<Vec<NewFlashcard>> {
        Ok(match serde_json::from_str::<Self>(json)? {
            GeneratedFlashcards::Wrapped { flashcards } => flashcards,
            GeneratedFlashcards::List(cards) => cards,
        })
    }
}
