use anyhow::{Context, Result};
use chrono::Utc;

use study_aid_lib::flashcards::due_with_reviews_at;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, lecture_query: Option<&str>, format: &OutputFormat) -> Result<()> {
    let lecture_id = lecture_query
        .map(|q| app.find_lecture(q).map(|l| l.id))
        .transpose()?;

    let due = due_with_reviews_at(&app.db, lecture_id, Utc::now())
        .context("Failed to load due flashcards")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due. Come back later.");
                return Ok(());
            }

            for entry in &due {
                let status = match &entry.last_review {
                    None => "new".to_string(),
                    Some(review) => format!("#{} {}", review.repetition_count, review.difficulty),
                };
                println!(
                    "{}  {:<12} {}",
                    &entry.card.id.to_string()[..8],
                    status,
                    entry.card.question
                );
            }

            println!("\n{} cards due", due.len());
        }
    }

    Ok(())
}
