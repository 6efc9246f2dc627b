mod database;
mod models;

pub use database::{StorageError, StudyDatabase};
pub use models::*;
