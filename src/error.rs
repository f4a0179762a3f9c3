use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown level '{0}', use beginner, intermediate or advanced")]
    InvalidLevel(String),

    #[error("invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("step {index} out of range, routine has {len} steps")]
    StepOutOfRange { index: usize, len: usize },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
