use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TradalyticsError {
    #[error("Missing column: no header matches {column}")]
    MissingColumn { column: String },

    #[error("Invalid data in row {row}, field {field} ('{value}'): {reason}")]
    InvalidData {
        row: usize,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}
