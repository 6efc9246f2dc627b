use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use study_aid_lib::storage::{GeneratedFlashcards, LectureImport, QuizContent};

use crate::app::App;
use crate::OutputFormat;

pub struct ImportRequest {
    pub title: String,
    pub filename: String,
    pub flashcards: Option<PathBuf>,
    pub quiz: Option<PathBuf>,
    pub transcript: Option<PathBuf>,
    pub summary: Option<PathBuf>,
    pub file_size: u64,
    pub duration: u64,
}

fn read_file(path: &PathBuf) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn run(app: &App, request: ImportRequest, format: &OutputFormat) -> Result<()> {
    let flashcards = request
        .flashcards
        .as_ref()
        .map(|path| {
            GeneratedFlashcards::parse(&read_file(path)?)
                .with_context(|| format!("Invalid flashcards JSON in {}", path.display()))
        })
        .transpose()?
        .unwrap_or_default();
    let quiz = request
        .quiz
        .as_ref()
        .map(|path| {
            serde_json::from_str::<QuizContent>(&read_file(path)?)
                .with_context(|| format!("Invalid quiz JSON in {}", path.display()))
        })
        .transpose()?;

    let content = app
        .db
        .import_lecture(LectureImport {
            title: request.title,
            filename: request.filename,
            file_size: request.file_size,
            duration: request.duration,
            transcript: request.transcript.as_ref().map(read_file).transpose()?,
            summary: request.summary.as_ref().map(read_file).transpose()?,
            quiz,
            flashcards,
        })
        .context("Failed to import lecture")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "lecture": content.lecture,
                "flashcards": content.flashcards.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Imported '{}' ({}) with {} flashcards",
                content.lecture.title,
                content.lecture.id,
                content.flashcards.len()
            );
        }
    }

    Ok(())
}
