//! SQLite storage for lectures, flashcards and review history.
//!
//! All timestamps are stored as milliseconds since the Unix epoch and all
//! ids as UUID text. Foreign keys cascade from lectures down to review
//! records, and `review_records` carries a uniqueness constraint on
//! `(flashcard_id, repetition_count)` so a lost review race is rejected
//! instead of silently duplicating a repetition.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use thiserror::Error;
use uuid::Uuid;

use super::models::*;
use crate::flashcards::{Difficulty, Flashcard, ReviewRecord, ReviewStore, SchedulerError};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lecture not found: {0}")]
    LectureNotFound(Uuid),

    #[error("Flashcard not found: {0}")]
    FlashcardNotFound(Uuid),

    #[error("Repetition {repetition_count} already recorded for flashcard {flashcard_id}")]
    DuplicateRepetition {
        flashcard_id: Uuid,
        repetition_count: u32,
    },

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl From<StorageError> for SchedulerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FlashcardNotFound(id) => SchedulerError::FlashcardNotFound(id),
            StorageError::DuplicateRepetition {
                flashcard_id,
                repetition_count,
            } => SchedulerError::DuplicateRepetition {
                flashcard_id,
                repetition_count,
            },
            other => SchedulerError::PersistenceUnavailable(other.to_string()),
        }
    }
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS lectures (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        filename TEXT NOT NULL,
        file_size INTEGER NOT NULL DEFAULT 0,
        duration INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transcripts (
        lecture_id TEXT PRIMARY KEY REFERENCES lectures(id) ON DELETE CASCADE,
        content TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS summaries (
        lecture_id TEXT PRIMARY KEY REFERENCES lectures(id) ON DELETE CASCADE,
        content TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS quizzes (
        lecture_id TEXT PRIMARY KEY REFERENCES lectures(id) ON DELETE CASCADE,
        multiple_choice TEXT NOT NULL,
        open_ended TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS flashcards (
        id TEXT PRIMARY KEY,
        lecture_id TEXT NOT NULL REFERENCES lectures(id) ON DELETE CASCADE,
        question TEXT NOT NULL,
        answer TEXT NOT NULL,
        category TEXT,
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS review_records (
        id TEXT PRIMARY KEY,
        flashcard_id TEXT NOT NULL REFERENCES flashcards(id) ON DELETE CASCADE,
        reviewed_at INTEGER NOT NULL,
        difficulty INTEGER NOT NULL CHECK (difficulty IN (1, 2, 3)),
        next_review_at INTEGER NOT NULL,
        repetition_count INTEGER NOT NULL CHECK (repetition_count >= 1),
        UNIQUE (flashcard_id, repetition_count)
    );

    CREATE INDEX IF NOT EXISTS idx_flashcards_lecture_id ON flashcards(lecture_id);
    CREATE INDEX IF NOT EXISTS idx_review_records_card_time
        ON review_records(flashcard_id, reviewed_at);
"#;

/// SQLite-backed store. One connection, guarded by a mutex so the handle
/// can be shared between threads; no lock is held across calls.
pub struct StudyDatabase {
    conn: Mutex<Connection>,
}

impl StudyDatabase {
    /// Open (or create) the database file at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::init(conn, &db_path.display().to_string())
    }

    /// Open a private database that lives only as long as this handle
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, ":memory:")
    }

    fn init(conn: Connection, location: &str) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        log::debug!("Initialized study database at {}", location);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    // ==================== Lecture Operations ====================

    /// Create a new lecture record
    pub fn create_lecture(
        &self,
        title: String,
        filename: String,
        file_size: u64,
        duration: u64,
    ) -> Result<Lecture> {
        let now = Utc::now().trunc_subsecs(3);
        let lecture = Lecture {
            file_size,
            duration,
            created_at: now,
            updated_at: now,
            ..Lecture::new(title, filename)
        };

        let conn = self.lock()?;
        insert_lecture(&conn, &lecture)?;

        log::info!("Created lecture {} ({})", lecture.id, lecture.title);
        Ok(lecture)
    }

    /// Create a lecture together with its transcript, summary, quiz and
    /// flashcards. Either all of it is stored or none of it.
    pub fn import_lecture(&self, import: LectureImport) -> Result<LectureContent> {
        let now = Utc::now().trunc_subsecs(3);
        let lecture = Lecture {
            file_size: import.file_size,
            duration: import.duration,
            created_at: now,
            updated_at: now,
            ..Lecture::new(import.title, import.filename)
        };
        let transcript = import.transcript.map(|content| Transcript {
            lecture_id: lecture.id,
            content,
            created_at: now,
        });
        let summary = import.summary.map(|content| Summary {
            lecture_id: lecture.id,
            content,
            created_at: now,
        });
        let quiz = import.quiz.map(|content| Quiz {
            lecture_id: lecture.id,
            content,
            created_at: now,
        });

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        insert_lecture(&tx, &lecture)?;
        if let Some(transcript) = &transcript {
            upsert_transcript(&tx, transcript)?;
        }
        if let Some(summary) = &summary {
            upsert_summary(&tx, summary)?;
        }
        if let Some(quiz) = &quiz {
            upsert_quiz(&tx, quiz)?;
        }
        let flashcards = insert_flashcards(&tx, lecture.id, import.flashcards, now)?;
        tx.commit()?;

        log::info!(
            "Imported lecture {} ({}) with {} flashcards",
            lecture.id,
            lecture.title,
            flashcards.len()
        );
        Ok(LectureContent {
            lecture,
            transcript,
            summary,
            quiz,
            flashcards,
        })
    }

    /// All lectures, most recent first
    pub fn list_lectures(&self) -> Result<Vec<Lecture>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, filename, file_size, duration, created_at, updated_at
             FROM lectures ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map([], LectureRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(LectureRow::into_lecture).collect()
    }

    pub fn get_lecture(&self, lecture_id: Uuid) -> Result<Lecture> {
        let conn = self.lock()?;
        query_lecture(&conn, lecture_id)?.ok_or(StorageError::LectureNotFound(lecture_id))
    }

    /// Delete a lecture and everything generated from it.
    /// Returns `false` if no such lecture existed.
    pub fn delete_lecture(&self, lecture_id: Uuid) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM lectures WHERE id = ?1",
            params![lecture_id.to_string()],
        )?;

        if deleted > 0 {
            log::info!("Deleted lecture {}", lecture_id);
        }
        Ok(deleted > 0)
    }

    // ==================== Generated Content ====================

    /// Store the transcript of a lecture, replacing any previous one
    pub fn save_transcript(&self, lecture_id: Uuid, content: String) -> Result<Transcript> {
        let transcript = Transcript {
            lecture_id,
            content,
            created_at: Utc::now().trunc_subsecs(3),
        };

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        ensure_lecture(&tx, lecture_id)?;
        upsert_transcript(&tx, &transcript)?;
        touch_lecture(&tx, lecture_id, transcript.created_at)?;
        tx.commit()?;

        Ok(transcript)
    }

    pub fn get_transcript(&self, lecture_id: Uuid) -> Result<Option<Transcript>> {
        let conn = self.lock()?;
        query_transcript(&conn, lecture_id)
    }

    /// Store the summary of a lecture, replacing any previous one
    pub fn save_summary(&self, lecture_id: Uuid, content: String) -> Result<Summary> {
        let summary = Summary {
            lecture_id,
            content,
            created_at: Utc::now().trunc_subsecs(3),
        };

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        ensure_lecture(&tx, lecture_id)?;
        upsert_summary(&tx, &summary)?;
        touch_lecture(&tx, lecture_id, summary.created_at)?;
        tx.commit()?;

        Ok(summary)
    }

    pub fn get_summary(&self, lecture_id: Uuid) -> Result<Option<Summary>> {
        let conn = self.lock()?;
        query_summary(&conn, lecture_id)
    }

    /// Store the quiz of a lecture, replacing any previous one
    pub fn save_quiz(&self, lecture_id: Uuid, content: QuizContent) -> Result<Quiz> {
        let quiz = Quiz {
            lecture_id,
            content,
            created_at: Utc::now().trunc_subsecs(3),
        };

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        ensure_lecture(&tx, lecture_id)?;
        upsert_quiz(&tx, &quiz)?;
        touch_lecture(&tx, lecture_id, quiz.created_at)?;
        tx.commit()?;

        Ok(quiz)
    }

    pub fn get_quiz(&self, lecture_id: Uuid) -> Result<Option<Quiz>> {
        let conn = self.lock()?;
        query_quiz(&conn, lecture_id)
    }

    // ==================== Flashcard Operations ====================

    /// Store generated flashcards for a lecture in one transaction
    pub fn save_flashcards(&self, lecture_id: Uuid, cards: Vec<NewFlashcard>) -> Result<Vec<Flashcard>> {
        let now = Utc::now().trunc_subsecs(3);

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        ensure_lecture(&tx, lecture_id)?;
        let saved = insert_flashcards(&tx, lecture_id, cards, now)?;
        touch_lecture(&tx, lecture_id, now)?;
        tx.commit()?;

        log::info!("Saved {} flashcards for lecture {}", saved.len(), lecture_id);
        Ok(saved)
    }

    /// Delete a flashcard together with its review history
    pub fn delete_flashcard(&self, flashcard_id: Uuid) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM flashcards WHERE id = ?1",
            params![flashcard_id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// A lecture with its transcript, summary, quiz and flashcards
    pub fn lecture_content(&self, lecture_id: Uuid) -> Result<LectureContent> {
        let conn = self.lock()?;
        let lecture =
            query_lecture(&conn, lecture_id)?.ok_or(StorageError::LectureNotFound(lecture_id))?;

        Ok(LectureContent {
            lecture,
            transcript: query_transcript(&conn, lecture_id)?,
            summary: query_summary(&conn, lecture_id)?,
            quiz: query_quiz(&conn, lecture_id)?,
            flashcards: query_flashcards(&conn, Some(lecture_id))?,
        })
    }

    // ==================== Review Records ====================

    fn insert_review_record(&self, record: ReviewRecord) -> Result<ReviewRecord> {
        let record = ReviewRecord {
            reviewed_at: record.reviewed_at.trunc_subsecs(3),
            next_review_at: record.next_review_at.trunc_subsecs(3),
            ..record
        };

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM flashcards WHERE id = ?1)",
            params![record.flashcard_id.to_string()],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StorageError::FlashcardNotFound(record.flashcard_id));
        }

        let inserted = tx.execute(
            "INSERT INTO review_records
                (id, flashcard_id, reviewed_at, difficulty, next_review_at, repetition_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id.to_string(),
                record.flashcard_id.to_string(),
                record.reviewed_at.timestamp_millis(),
                record.difficulty.as_rating(),
                record.next_review_at.timestamp_millis(),
                i64::from(record.repetition_count),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(StorageError::DuplicateRepetition {
                    flashcard_id: record.flashcard_id,
                    repetition_count: record.repetition_count,
                });
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit()?;
        Ok(record)
    }

    fn query_review_records(&self, flashcard_id: Uuid, limit: Option<usize>) -> Result<Vec<ReviewRecord>> {
        let conn = self.lock()?;
        let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
        let mut stmt = conn.prepare(
            "SELECT id, flashcard_id, reviewed_at, difficulty, next_review_at, repetition_count
             FROM review_records WHERE flashcard_id = ?1
             ORDER BY reviewed_at DESC, repetition_count DESC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![flashcard_id.to_string(), limit], ReviewRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ReviewRow::into_record).collect()
    }
}

impl ReviewStore for StudyDatabase {
    fn get_flashcard(&self, flashcard_id: Uuid) -> crate::flashcards::Result<Option<Flashcard>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT id, lecture_id, question, answer, category, created_at
                 FROM flashcards WHERE id = ?1",
                params![flashcard_id.to_string()],
                FlashcardRow::from_row,
            )
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(FlashcardRow::into_flashcard).transpose()?)
    }

    fn list_flashcards(&self, lecture_id: Option<Uuid>) -> crate::flashcards::Result<Vec<Flashcard>> {
        let conn = self.lock()?;
        Ok(query_flashcards(&conn, lecture_id)?)
    }

    fn list_review_records(&self, flashcard_id: Uuid) -> crate::flashcards::Result<Vec<ReviewRecord>> {
        Ok(self.query_review_records(flashcard_id, None)?)
    }

    fn create_review_record(&self, record: ReviewRecord) -> crate::flashcards::Result<ReviewRecord> {
        Ok(self.insert_review_record(record)?)
    }

    fn latest_review_record(&self, flashcard_id: Uuid) -> crate::flashcards::Result<Option<ReviewRecord>> {
        Ok(self
            .query_review_records(flashcard_id, Some(1))?
            .into_iter()
            .next())
    }
}

// ==================== Row Mapping ====================

struct LectureRow {
    id: String,
    title: String,
    filename: String,
    file_size: i64,
    duration: i64,
    created_at: i64,
    updated_at: i64,
}

impl LectureRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            filename: row.get(2)?,
            file_size: row.get(3)?,
            duration: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn into_lecture(self) -> Result<Lecture> {
        Ok(Lecture {
            id: parse_uuid(&self.id)?,
            title: self.title,
            filename: self.filename,
            file_size: from_sql_int(self.file_size, "file_size")?,
            duration: from_sql_int(self.duration, "duration")?,
            created_at: from_millis(self.created_at)?,
            updated_at: from_millis(self.updated_at)?,
        })
    }
}

struct FlashcardRow {
    id: String,
    lecture_id: String,
    question: String,
    answer: String,
    category: Option<String>,
    created_at: i64,
}

impl FlashcardRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            lecture_id: row.get(1)?,
            question: row.get(2)?,
            answer: row.get(3)?,
            category: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_flashcard(self) -> Result<Flashcard> {
        Ok(Flashcard {
            id: parse_uuid(&self.id)?,
            lecture_id: parse_uuid(&self.lecture_id)?,
            question: self.question,
            answer: self.answer,
            category: self.category,
            created_at: from_millis(self.created_at)?,
        })
    }
}

struct ReviewRow {
    id: String,
    flashcard_id: String,
    reviewed_at: i64,
    difficulty: i32,
    next_review_at: i64,
    repetition_count: i64,
}

impl ReviewRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            flashcard_id: row.get(1)?,
            reviewed_at: row.get(2)?,
            difficulty: row.get(3)?,
            next_review_at: row.get(4)?,
            repetition_count: row.get(5)?,
        })
    }

    fn into_record(self) -> Result<ReviewRecord> {
        let difficulty = Difficulty::try_from(self.difficulty)
            .map_err(|e| StorageError::InvalidRecord(e.to_string()))?;
        let repetition_count = u32::try_from(self.repetition_count).map_err(|_| {
            StorageError::InvalidRecord(format!("repetition count {}", self.repetition_count))
        })?;

        Ok(ReviewRecord {
            id: parse_uuid(&self.id)?,
            flashcard_id: parse_uuid(&self.flashcard_id)?,
            reviewed_at: from_millis(self.reviewed_at)?,
            difficulty,
            next_review_at: from_millis(self.next_review_at)?,
            repetition_count,
        })
    }
}

// ==================== Query Helpers ====================

fn query_lecture(conn: &Connection, lecture_id: Uuid) -> Result<Option<Lecture>> {
    conn.query_row(
        "SELECT id, title, filename, file_size, duration, created_at, updated_at
         FROM lectures WHERE id = ?1",
        params![lecture_id.to_string()],
        LectureRow::from_row,
    )
    .optional()?
    .map(LectureRow::into_lecture)
    .transpose()
}

fn insert_lecture(conn: &Connection, lecture: &Lecture) -> Result<()> {
    conn.execute(
        "INSERT INTO lectures (id, title, filename, file_size, duration, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            lecture.id.to_string(),
            lecture.title,
            lecture.filename,
            to_sql_int(lecture.file_size, "file_size")?,
            to_sql_int(lecture.duration, "duration")?,
            lecture.created_at.timestamp_millis(),
            lecture.updated_at.timestamp_millis(),
        ],
    )?;
    Ok(())
}

fn upsert_transcript(conn: &Connection, transcript: &Transcript) -> Result<()> {
    conn.execute(
        "INSERT INTO transcripts (lecture_id, content, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(lecture_id) DO UPDATE SET
            content = excluded.content, created_at = excluded.created_at",
        params![
            transcript.lecture_id.to_string(),
            transcript.content,
            transcript.created_at.timestamp_millis()
        ],
    )?;
    Ok(())
}

fn upsert_summary(conn: &Connection, summary: &Summary) -> Result<()> {
    conn.execute(
        "INSERT INTO summaries (lecture_id, content, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(lecture_id) DO UPDATE SET
            content = excluded.content, created_at = excluded.created_at",
        params![
            summary.lecture_id.to_string(),
            summary.content,
            summary.created_at.timestamp_millis()
        ],
    )?;
    Ok(())
}

fn upsert_quiz(conn: &Connection, quiz: &Quiz) -> Result<()> {
    conn.execute(
        "INSERT INTO quizzes (lecture_id, multiple_choice, open_ended, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(lecture_id) DO UPDATE SET
            multiple_choice = excluded.multiple_choice,
            open_ended = excluded.open_ended,
            created_at = excluded.created_at",
        params![
            quiz.lecture_id.to_string(),
            serde_json::to_string(&quiz.content.multiple_choice)?,
            serde_json::to_string(&quiz.content.open_ended)?,
            quiz.created_at.timestamp_millis()
        ],
    )?;
    Ok(())
}

fn insert_flashcards(
    conn: &Connection,
    lecture_id: Uuid,
    cards: Vec<NewFlashcard>,
    now: DateTime<Utc>,
) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(
        "INSERT INTO flashcards (id, lecture_id, question, answer, category, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    let mut saved = Vec::with_capacity(cards.len());
    for new_card in cards {
        let mut card = Flashcard::new(lecture_id, new_card.question, new_card.answer)
            .with_category(new_card.category.unwrap_or_default());
        card.created_at = now;

        stmt.execute(params![
            card.id.to_string(),
            lecture_id.to_string(),
            card.question,
            card.answer,
            card.category,
            card.created_at.timestamp_millis(),
        ])?;
        saved.push(card);
    }
    Ok(saved)
}

fn ensure_lecture(conn: &Connection, lecture_id: Uuid) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM lectures WHERE id = ?1)",
        params![lecture_id.to_string()],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(StorageError::LectureNotFound(lecture_id))
    }
}

fn touch_lecture(conn: &Connection, lecture_id: Uuid, at: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "UPDATE lectures SET updated_at = ?1 WHERE id = ?2",
        params![at.timestamp_millis(), lecture_id.to_string()],
    )?;
    Ok(())
}

fn query_flashcards(conn: &Connection, lecture_id: Option<Uuid>) -> Result<Vec<Flashcard>> {
    let rows = match lecture_id {
        Some(id) => {
            let mut stmt = conn.prepare(
                "SELECT id, lecture_id, question, answer, category, created_at
                 FROM flashcards WHERE lecture_id = ?1 ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map(params![id.to_string()], FlashcardRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, lecture_id, question, answer, category, created_at
                 FROM flashcards ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([], FlashcardRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        }
    };
    rows.into_iter().map(FlashcardRow::into_flashcard).collect()
}

fn query_transcript(conn: &Connection, lecture_id: Uuid) -> Result<Option<Transcript>> {
    conn.query_row(
        "SELECT content, created_at FROM transcripts WHERE lecture_id = ?1",
        params![lecture_id.to_string()],
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
    )
    .optional()?
    .map(|(content, created_at)| -> Result<Transcript> {
        Ok(Transcript {
            lecture_id,
            content,
            created_at: from_millis(created_at)?,
        })
    })
    .transpose()
}

fn query_summary(conn: &Connection, lecture_id: Uuid) -> Result<Option<Summary>> {
    conn.query_row(
        "SELECT content, created_at FROM summaries WHERE lecture_id = ?1",
        params![lecture_id.to_string()],
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
    )
    .optional()?
    .map(|(content, created_at)| -> Result<Summary> {
        Ok(Summary {
            lecture_id,
            content,
            created_at: from_millis(created_at)?,
        })
    })
    .transpose()
}

fn query_quiz(conn: &Connection, lecture_id: Uuid) -> Result<Option<Quiz>> {
    conn.query_row(
        "SELECT multiple_choice, open_ended, created_at FROM quizzes WHERE lecture_id = ?1",
        params![lecture_id.to_string()],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        },
    )
    .optional()?
    .map(|(multiple_choice, open_ended, created_at)| -> Result<Quiz> {
        Ok(Quiz {
            lecture_id,
            content: QuizContent {
                multiple_choice: serde_json::from_str(&multiple_choice)?,
                open_ended: serde_json::from_str(&open_ended)?,
            },
            created_at: from_millis(created_at)?,
        })
    })
    .transpose()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| StorageError::InvalidRecord(format!("bad id {:?}: {}", s, e)))
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StorageError::InvalidRecord(format!("timestamp out of range: {}", ms)))
}

fn to_sql_int(value: u64, field: &str) -> Result<i64> {
    i64::try_from(value).map_err(|_| StorageError::InvalidRecord(format!("{} too large: {}", field, value)))
}

fn from_sql_int(value: i64, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| StorageError::InvalidRecord(format!("negative {}: {}", field, value)))
}
