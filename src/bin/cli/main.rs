mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use study_aid_lib::config::OutputMode;

#[derive(Parser)]
#[command(name = "study-aid", about = "Lecture study material and flashcard review", version)]
struct Cli {
    /// Database file (overrides config.toml and STUDY_DATABASE)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Output format (default from config.toml, else plain)
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

impl From<OutputMode> for OutputFormat {
    fn from(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Plain => OutputFormat::Plain,
            OutputMode::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Lecture listing and management
    #[command(subcommand)]
    Lectures(LectureCommand),

    /// Import generated study material as a new lecture
    Import {
        /// Lecture title
        title: String,
        /// Source audio or image filename (defaults to the title)
        #[arg(long)]
        filename: Option<String>,
        /// Flashcards JSON from the content generator
        #[arg(long)]
        flashcards: Option<PathBuf>,
        /// Quiz JSON from the content generator
        #[arg(long)]
        quiz: Option<PathBuf>,
        /// Transcript text file
        #[arg(long)]
        transcript: Option<PathBuf>,
        /// Summary markdown file
        #[arg(long)]
        summary: Option<PathBuf>,
        /// Size of the source file in bytes
        #[arg(long, default_value = "0")]
        file_size: u64,
        /// Audio duration in seconds
        #[arg(long, default_value = "0")]
        duration: u64,
    },

    /// Rate a flashcard and schedule its next review
    Review {
        /// Flashcard id (or unique id prefix)
        card: String,
        /// hard, medium, easy (or 1, 2, 3)
        rating: String,
    },

    /// Show the intervals each rating would give a card
    Preview {
        /// Flashcard id (or unique id prefix)
        card: String,
    },

    /// List flashcards due for review
    Due {
        /// Limit to one lecture (id or title prefix)
        #[arg(long)]
        lecture: Option<String>,
    },

    /// Show how many of a lecture's flashcards have been reviewed
    Progress {
        /// Lecture id or title prefix
        lecture: String,
    },
}

#[derive(Subcommand)]
enum LectureCommand {
    /// List all lectures, newest first
    List,

    /// Show a lecture with its generated material
    Show {
        /// Lecture id or title prefix
        lecture: String,
    },

    /// Delete a lecture and everything generated from it
    Delete {
        /// Lecture id or title prefix
        lecture: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.database)?;
    let format = cli
        .format
        .unwrap_or_else(|| app.config.default_output.into());

    match cli.command {
        Command::Lectures(LectureCommand::List) => {
            commands::lectures::run_list(&app, &format)?;
        }
        Command::Lectures(LectureCommand::Show { lecture }) => {
            commands::lectures::run_show(&app, &lecture, &format)?;
        }
        Command::Lectures(LectureCommand::Delete { lecture }) => {
            commands::lectures::run_delete(&app, &lecture, &format)?;
        }
        Command::Import {
            title,
            filename,
            flashcards,
            quiz,
            transcript,
            summary,
            file_size,
            duration,
        } => {
            let request = commands::import::ImportRequest {
                filename: filename.unwrap_or_else(|| title.clone()),
                title,
                flashcards,
                quiz,
                transcript,
                summary,
                file_size,
                duration,
            };
            commands::import::run(&app, request, &format)?;
        }
        Command::Review { card, rating } => {
            commands::review::run_review(&app, &card, &rating, &format)?;
        }
        Command::Preview { card } => {
            commands::review::run_preview(&app, &card, &format)?;
        }
        Command::Due { lecture } => {
            commands::due::run(&app, lecture.as_deref(), &format)?;
        }
        Command::Progress { lecture } => {
            commands::progress::run(&app, &lecture, &format)?;
        }
    }

    Ok(())
}
