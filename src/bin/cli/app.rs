use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use study_aid_lib::config::{StudyConfig, DATABASE_ENV};
use study_aid_lib::flashcards::{Flashcard, ReviewStore};
use study_aid_lib::storage::{Lecture, StudyDatabase};

/// Shared application state for CLI commands
pub struct App {
    pub config: StudyConfig,
    pub db: StudyDatabase,
}

impl App {
    /// Load config from the default data directory and open the database
    pub fn new(database: Option<PathBuf>) -> Result<Self> {
        let data_dir = StudyConfig::default_data_dir()
            .context("Failed to get data directory")?;
        let config = StudyConfig::load(&data_dir)
            .context("Failed to load configuration")?;

        let db_path = match database {
            Some(path) => path,
            None => config.database_path(&data_dir, std::env::var(DATABASE_ENV).ok()),
        };
        log::debug!("Using database {}", db_path.display());

        let db = StudyDatabase::open(&db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;

        Ok(Self { config, db })
    }

    /// Resolve a lecture from its id, its full title, or the start of
    /// its title. Titles compare case-insensitively.
    pub fn find_lecture(&self, query: &str) -> Result<Lecture> {
        if let Ok(id) = Uuid::parse_str(query) {
            return self.db.get_lecture(id).context("Failed to get lecture");
        }

        let needle = query.trim().to_lowercase();
        let mut candidates: Vec<Lecture> = self
            .db
            .list_lectures()
            .context("Failed to list lectures")?
            .into_iter()
            .filter(|l| l.title.to_lowercase().starts_with(&needle))
            .collect();

        // A full title wins even when it is also a prefix of other titles
        if let Some(pos) = candidates
            .iter()
            .position(|l| l.title.to_lowercase() == needle)
        {
            return Ok(candidates.swap_remove(pos));
        }

        single_match(candidates, "lecture", query, |l| {
            format!("{}  {}", short_id(l.id), l.title)
        })
    }

    /// Resolve a flashcard from its id or a unique id prefix
    pub fn find_flashcard(&self, query: &str) -> Result<Flashcard> {
        if let Ok(id) = Uuid::parse_str(query) {
            return self
                .db
                .get_flashcard(id)
                .context("Failed to get flashcard")?
                .with_context(|| format!("No flashcard with id {}", id));
        }

        let prefix = query.trim().to_lowercase();
        let candidates: Vec<Flashcard> = self
            .db
            .list_flashcards(None)
            .context("Failed to list flashcards")?
            .into_iter()
            .filter(|c| c.id.to_string().starts_with(&prefix))
            .collect();

        single_match(candidates, "flashcard", query, |c| {
            format!("{}  {}", short_id(c.id), c.question)
        })
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn single_match<T>(
    mut candidates: Vec<T>,
    kind: &str,
    query: &str,
    describe: impl Fn(&T) -> String,
) -> Result<T> {
    match candidates.len() {
        0 => bail!("No {} matches '{}'", kind, query),
        1 => Ok(candidates.remove(0)),
        n => {
            let listing: Vec<String> = candidates.iter().map(|c| format!("  {}", describe(c))).collect();
            bail!("'{}' matches {} {}s:\n{}", query, n, kind, listing.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app(titles: &[&str]) -> App {
        let db = StudyDatabase::open_in_memory().unwrap();
        for title in titles {
            db.create_lecture(title.to_string(), "lecture.mp3".into(), 0, 0)
                .unwrap();
        }
        App {
            config: StudyConfig::default(),
            db,
        }
    }

    #[test]
    fn test_full_title_beats_longer_prefix_matches() {
        let app = test_app(&["Physics", "Physics II"]);
        assert_eq!(app.find_lecture("physics").unwrap().title, "Physics");
        assert_eq!(app.find_lecture("Physics I").unwrap().title, "Physics II");
    }

    #[test]
    fn test_ambiguous_prefix_lists_candidates() {
        let app = test_app(&["Chemistry", "Chemical Bonds"]);
        let message = app.find_lecture("chem").unwrap_err().to_string();
        assert!(message.contains("matches 2 lectures"), "{}", message);
        assert!(message.contains("Chemical Bonds"), "{}", message);
        assert!(app.find_lecture("biology").is_err());
    }

    #[test]
    fn test_flashcard_by_id_prefix() {
        let app = test_app(&["Biology"]);
        let lecture = app.find_lecture("bio").unwrap();
        let cards = app
            .db
            .save_flashcards(
                lecture.id,
                vec![study_aid_lib::storage::NewFlashcard {
                    question: "Q".into(),
                    answer: "A".into(),
                    category: None,
                }],
            )
            .unwrap();

        let prefix = &cards[0].id.to_string()[..8];
        assert_eq!(app.find_flashcard(prefix).unwrap(), cards[0]);
        assert_eq!(
            app.find_flashcard(&cards[0].id.to_string()).unwrap(),
            cards[0]
        );
    }
}
