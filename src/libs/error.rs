use thiserror::Error;

/// Rejections raised by the dashboard before anything reaches a store.
///
/// These travel inside `anyhow::Error`; callers that need to react to a
/// specific case use `downcast_ref::<DashboardError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("No active session. Run `taktline login` first")]
    NoSession,

    #[error("Please select both Line and Line Lead")]
    InvalidSession,

    #[error("Please fill in all fields: {0}")]
    MissingFields(String),

    #[error("Unknown packing format: {0}")]
    InvalidPackingFormat(String),

    #[error("Unknown product status: {0}")]
    InvalidStatus(String),

    #[error("Unrecognized time: {0}")]
    InvalidTime(String),

    #[error("End time {end} must be at least 15 minutes after start time {start}")]
    InvalidTimeWindow { start: String, end: String },

    #[error("Employee count must be a positive number, got {0}")]
    InvalidEmployeeCount(u32),

    #[error("Actual units cannot be negative, got {0}")]
    NegativeUnits(i64),

    #[error("Unknown column: {0}")]
    InvalidColumn(String),

    #[error("Filters must look like column=value, got {0}")]
    InvalidFilter(String),

    #[error("Batch {0} not found")]
    NotFound(i64),

    #[error("Batch {0} is locked and can no longer be changed")]
    Locked(i64),
}
