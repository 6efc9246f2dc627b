//! Data models for flashcard review

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::SchedulerError;

/// A question/answer study unit belonging to a lecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub lecture_id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Flashcard {
    pub fn new(lecture_id: Uuid, question: String, answer: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            lecture_id,
            question,
            answer,
            category: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.trim().is_empty() {
            None
        } else {
            Some(category)
        };
        self
    }
}

/// How hard the user found a card when reviewing it
///
/// On the wire a rating is either the integer scale
/// (1 = Hard, 2 = Medium, 3 = Easy) or the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Hard,
    Medium,
    Easy,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Hard, Difficulty::Medium, Difficulty::Easy];

    /// Integer rating stored in the database
    pub fn as_rating(self) -> i32 {
        match self {
            Difficulty::Hard => 1,
            Difficulty::Medium => 2,
            Difficulty::Easy => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Hard => "hard",
            Difficulty::Medium => "medium",
            Difficulty::Easy => "easy",
        }
    }
}

impl TryFrom<i32> for Difficulty {
    type Error = SchedulerError;

    fn try_from(rating: i32) -> Result<Self, Self::Error> {
        match rating {
            1 => Ok(Difficulty::Hard),
            2 => Ok(Difficulty::Medium),
            3 => Ok(Difficulty::Easy),
            other => Err(SchedulerError::InvalidDifficultyRating(other.to_string())),
        }
    }
}

impl FromStr for Difficulty {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(rating) = trimmed.parse::<i32>() {
            return Difficulty::try_from(rating);
        }
        match trimmed.to_lowercase().as_str() {
            "hard" => Ok(Difficulty::Hard),
            "medium" => Ok(Difficulty::Medium),
            "easy" => Ok(Difficulty::Easy),
            _ => Err(SchedulerError::InvalidDifficultyRating(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One review event for a flashcard. Never mutated after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: Uuid,
    pub flashcard_id: Uuid,
    pub reviewed_at: DateTime<Utc>,
    pub difficulty: Difficulty,
    /// When the card becomes eligible for review again
    pub next_review_at: DateTime<Utc>,
    /// 1-based ordinal of this review among all reviews of the card
    pub repetition_count: u32,
}

impl ReviewRecord {
    pub fn new(
        flashcard_id: Uuid,
        reviewed_at: DateTime<Utc>,
        difficulty: Difficulty,
        next_review_at: DateTime<Utc>,
        repetition_count: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            flashcard_id,
            reviewed_at,
            difficulty,
            next_review_at,
            repetition_count,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}

/// Completion statistics for one lecture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyProgress {
    pub total: usize,
    pub reviewed: usize,
    pub percentage: f64,
}

impl StudyProgress {
    pub fn new(total: usize, reviewed: usize) -> Self {
        let percentage = if total > 0 {
            reviewed as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total,
            reviewed,
            percentage,
        }
    }
}

/// A card paired with its most recent review, used for review sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardWithReview {
    pub card: Flashcard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<ReviewRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_rating() {
        assert_eq!(Difficulty::try_from(1).unwrap(), Difficulty::Hard);
        assert_eq!(Difficulty::try_from(2).unwrap(), Difficulty::Medium);
        assert_eq!(Difficulty::try_from(3).unwrap(), Difficulty::Easy);
        assert!(matches!(
            Difficulty::try_from(4),
            Err(SchedulerError::InvalidDifficultyRating(_))
        ));
        assert!(Difficulty::try_from(0).is_err());
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("2".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("again".parse::<Difficulty>().is_err());
        assert!("".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_difficulty_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let back: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(back, Difficulty::Easy);
    }

    #[test]
    fn test_empty_category_is_none() {
        let card = Flashcard::new(Uuid::new_v4(), "Q".into(), "A".into()).with_category("  ");
        assert!(card.category.is_none());
        let card = card.with_category("Definitions");
        assert_eq!(card.category.as_deref(), Some("Definitions"));
    }

    #[test]
    fn test_progress_empty_is_zero() {
        let progress = StudyProgress::new(0, 0);
        assert_eq!(progress.total, 0);
        assert_eq!(progress.reviewed, 0);
        assert_eq!(progress.percentage, 0.0);
    }

    #[test]
    fn test_progress_percentage() {
        let progress = StudyProgress::new(4, 1);
        assert_eq!(progress.percentage, 25.0);
    }
}
