pub mod columns;
pub mod normalize;

pub use columns::ColumnMap;
pub use normalize::{normalize, NormalizedJournal, Outcome, TradeRecord};
