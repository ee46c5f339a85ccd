//! Alarm bookkeeping: the alarm record, the rules an alarm must satisfy to be
//! accepted and the persistence of the alarm list in a key-value store.
//!
//! Nothing here schedules or fires alarms. The list is plain data.
pub use alarm::Alarm;
pub use error::{RepositoryError, StoreError, ValidationError};
pub use repository::{ALARMS_KEY, AlarmRepository};
pub use store::{FileStore, KeyValueStore, MemoryStore, Storage};
pub use validation::validate;

pub mod calendar;

mod alarm;
mod error;
mod repository;
mod store;
mod validation;

type ResultStore<T> = Result<T, StoreError>;
type ResultRepository<T> = Result<T, RepositoryError>;
