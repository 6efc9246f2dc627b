use anyhow::{Context, Result};

use study_aid_lib::flashcards::study_progress;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, lecture_query: &str, format: &OutputFormat) -> Result<()> {
    let lecture = app.find_lecture(lecture_query)?;
    let progress = study_progress(&app.db, lecture.id).context("Failed to compute progress")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        OutputFormat::Plain => {
            const WIDTH: usize = 30;
            let filled = ((progress.percentage / 100.0) * WIDTH as f64).round() as usize;
            println!("{}", lecture.title);
            println!(
                "[{}{}] {}/{} reviewed ({:.1}%)",
                "\u{2588}".repeat(filled.min(WIDTH)),
                "\u{2591}".repeat(WIDTH - filled.min(WIDTH)),
                progress.reviewed,
                progress.total,
                progress.percentage
            );
        }
    }

    Ok(())
}
