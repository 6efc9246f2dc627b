use anyhow::{Context, Result};

use study_aid_lib::flashcards::algorithm::format_interval;
use study_aid_lib::flashcards::{preview_review, record_rating, Difficulty};

use crate::app::App;
use crate::OutputFormat;

pub fn run_review(app: &App, card_query: &str, rating: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_flashcard(card_query)?;
    let record = record_rating(&app.db, card.id, rating).context("Failed to record review")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Plain => {
            println!("{}", card.question);
            println!(
                "Rated {} (review #{}). Next review {}",
                record.difficulty,
                record.repetition_count,
                record.next_review_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
    }

    Ok(())
}

pub fn run_preview(app: &App, card_query: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_flashcard(card_query)?;
    let intervals = preview_review(&app.db, card.id).context("Failed to preview intervals")?;

    match format {
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = Difficulty::ALL
                .iter()
                .zip(intervals)
                .map(|(d, days)| (d.to_string(), serde_json::json!(days)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", card.question);
            for (difficulty, days) in Difficulty::ALL.iter().zip(intervals) {
                println!("  {:<7} {}", difficulty.to_string(), format_interval(days));
            }
        }
    }

    Ok(())
}
