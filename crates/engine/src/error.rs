//! The module contains the errors the engine can throw.
//!
//! - [`ValidationError`] when a proposed alarm is refused. The user fixes the
//!   input and submits again.
//! - [`StoreError`] when the key-value store cannot be read or written.
//! - [`RepositoryError`] when loading, saving or clearing the alarm list
//!   fails. It carries the underlying cause as text.
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("hour and minute are both required")]
    MissingField,
    #[error("hour must be 0-23 and minute 0-59")]
    InvalidNumber,
    #[error("weekday-only alarm refused on a weekend")]
    WeekendRejected,
    #[error("weekday-only alarm refused on a national holiday")]
    HolidayRejected,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("corrupt store: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Cannot load alarms: {0}")]
    Load(String),
    #[error("Cannot save alarms: {0}")]
    Save(String),
    #[error("Cannot clear alarms: {0}")]
    Clear(String),
}
