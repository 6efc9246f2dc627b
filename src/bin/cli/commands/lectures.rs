use anyhow::{Context, Result};

use study_aid_lib::flashcards::study_progress;

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let lectures = app.db.list_lectures().context("Failed to list lectures")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&lectures)?);
        }
        OutputFormat::Plain => {
            if lectures.is_empty() {
                println!("No lectures yet.");
                return Ok(());
            }

            for lecture in &lectures {
                let progress = study_progress(&app.db, lecture.id)?;
                println!(
                    "{}  {}  ({} cards, {:.0}% reviewed)",
                    &lecture.id.to_string()[..8],
                    lecture.title,
                    progress.total,
                    progress.percentage
                );
                println!(
                    "          {} - {}",
                    lecture.filename,
                    lecture.created_at.format("%Y-%m-%d %H:%M")
                );
            }

            println!("\n{} lectures total", lectures.len());
        }
    }

    Ok(())
}

pub fn run_show(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let lecture = app.find_lecture(query)?;
    let content = app
        .db
        .lecture_content(lecture.id)
        .context("Failed to load lecture content")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        OutputFormat::Plain => {
            println!("{}", content.lecture.title);
            println!("{}", "\u{2500}".repeat(content.lecture.title.chars().count().max(10)));
            println!("id:       {}", content.lecture.id);
            println!("file:     {}", content.lecture.filename);
            if content.lecture.duration > 0 {
                println!(
                    "duration: {}:{:02}",
                    content.lecture.duration / 60,
                    content.lecture.duration % 60
                );
            }

            if let Some(summary) = &content.summary {
                println!("\nSummary\n\n{}", summary.content.trim());
            }

            if let Some(quiz) = &content.quiz {
                println!(
                    "\nQuiz: {} multiple choice, {} open-ended",
                    quiz.content.multiple_choice.len(),
                    quiz.content.open_ended.len()
                );
            }

            if let Some(transcript) = &content.transcript {
                println!(
                    "\nTranscript: {} words",
                    transcript.content.split_whitespace().count()
                );
            }

            println!("\nFlashcards ({})", content.flashcards.len());
            for card in &content.flashcards {
                let category = card
                    .category
                    .as_deref()
                    .map(|c| format!(" [{}]", c))
                    .unwrap_or_default();
                println!("  {}{} {}", &card.id.to_string()[..8], category, card.question);
            }
        }
    }

    Ok(())
}

pub fn run_delete(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let lecture = app.find_lecture(query)?;
    let deleted = app
        .db
        .delete_lecture(lecture.id)
        .context("Failed to delete lecture")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": lecture.id.to_string(),
                "deleted": deleted,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted lecture '{}' and its study material.", lecture.title);
        }
    }

    Ok(())
}
