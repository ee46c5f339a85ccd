//! The module contains the alarm repository.
//!
//! The whole list lives under one key as a JSON array. Every change is a
//! read-modify-write of the full list; there is no per-alarm update.
use std::sync::Arc;

use super::{ResultRepository, alarm::Alarm, error::RepositoryError, store::KeyValueStore};

/// Storage key holding the alarm list.
pub const ALARMS_KEY: &str = "alarms";

#[derive(Debug)]
pub struct AlarmRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for AlarmRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> AlarmRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the saved alarms in insertion order.
    ///
    /// An absent key is an empty list. A value that is not a list of valid
    /// alarms is an error, it is never replaced by an empty list.
    pub async fn load(&self) -> ResultRepository<Vec<Alarm>> {
        let stored = self
            .store
            .get(ALARMS_KEY)
            .await
            .map_err(|err| RepositoryError::Load(err.to_string()))?;

        let Some(raw) = stored else {
            tracing::debug!("no alarms stored yet");
            return Ok(Vec::new());
        };

        let alarms: Vec<Alarm> = serde_json::from_str(&raw).map_err(|err| {
            tracing::warn!("stored alarms are unreadable: {err}");
            RepositoryError::Load(err.to_string())
        })?;
        tracing::debug!("loaded {} alarms", alarms.len());
        Ok(alarms)
    }

    /// Overwrites the stored list with `alarms`.
    pub async fn save(&self, alarms: &[Alarm]) -> ResultRepository<()> {
        let payload =
            serde_json::to_string(alarms).map_err(|err| RepositoryError::Save(err.to_string()))?;
        self.store
            .set(ALARMS_KEY, payload)
            .await
            .map_err(|err| RepositoryError::Save(err.to_string()))?;
        tracing::debug!("saved {} alarms", alarms.len());
        Ok(())
    }

    /// Deletes the key, not just its content.
    pub async fn clear(&self) -> ResultRepository<()> {
        self.store
            .remove(ALARMS_KEY)
            .await
            .map_err(|err| RepositoryError::Clear(err.to_string()))?;
        tracing::info!("alarms cleared");
        Ok(())
    }
}
