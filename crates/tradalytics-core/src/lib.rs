pub mod analytics;
pub mod config;
pub mod error;
pub mod journal;
pub mod types;

pub use analytics::{analyze_journal, AnalyticsResult};
pub use config::AnalyticsConfig;
pub use error::TradalyticsError;
pub use types::*;

/// Standard result type for all tradalytics operations
pub type TradalyticsResult<T> = Result<T, TradalyticsError>;
