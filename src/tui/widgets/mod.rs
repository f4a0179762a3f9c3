pub mod plan;
pub mod progress;
pub mod today;
