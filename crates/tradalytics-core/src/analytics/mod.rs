pub mod categories;
pub mod engine;
pub mod equity;
pub mod streaks;
pub mod summary;

pub use engine::{analyze_journal, analyze_normalized, analyze_records, AnalyticsResult};
