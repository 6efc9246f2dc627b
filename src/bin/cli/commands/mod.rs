pub mod due;
pub mod import;
pub mod lectures;
pub mod progress;
pub mod review;
