//! services/api/src/adapters/local_aoi.rs
//!
//! The local implementation of the `AoiProvider` port. The whole collection is one
//! JSON list in the store; every write is read-modify-write with no atomicity
//! across concurrent writers (last write wins).

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use geowatch_core::domain::{Aoi, AoiPatch, NewAoi, MAX_CHANGES_DETECTED};
use geowatch_core::ports::{AoiProvider, KeyValueStore, PortError, PortResult};
use geowatch_core::random::RandomSource;
use std::sync::Arc;
use tracing::{debug, info};

use super::records::{load_aois, load_user, save_aois, SimulatedLatency, FALLBACK_USER_ID};

fn validate_patch(patch: &AoiPatch) -> PortResult<()> {
    match patch.total_changes_detected {
        Some(total) if total > MAX_CHANGES_DETECTED => Err(PortError::Validation(format!(
            "totalChangesDetected must be at most {}",
            MAX_CHANGES_DETECTED
        ))),
        _ => Ok(()),
    }
}

pub struct LocalAoiAdapter {
    store: Arc<dyn KeyValueStore>,
    random: RandomSource,
    latency: SimulatedLatency,
}

impl LocalAoiAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>, random: RandomSource, latency: SimulatedLatency) -> Self {
        Self {
            store,
            random,
            latency,
        }
    }
}

/// `now`, nudged forward if needed so it lands strictly after `previous`.
fn later_than(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

#[async_trait]
impl AoiProvider for LocalAoiAdapter {
    async fn list(&self) -> PortResult<Vec<Aoi>> {
        self.latency.pause(SimulatedLatency::LIST_MS).await;
        load_aois(self.store.as_ref()).await
    }

    async fn get(&self, id: &str) -> PortResult<Option<Aoi>> {
        self.latency.pause(SimulatedLatency::GET_MS).await;
        let aois = self.list().await?;
        Ok(aois.into_iter().find(|aoi| aoi.id == id))
    }

    async fn create(&self, data: NewAoi) -> PortResult<Aoi> {
        self.latency.pause(SimulatedLatency::CREATE_MS).await;

        let user_id = load_user(self.store.as_ref())
            .await?
            .map(|user| user.id)
            .unwrap_or_else(|| FALLBACK_USER_ID.to_string());
        let aoi = Aoi::from_new(self.random.record_id(), user_id, data, Utc::now());

        let mut aois = self.list().await?;
        aois.push(aoi.clone());
        save_aois(self.store.as_ref(), &aois).await?;

        info!(aoi_id = %aoi.id, name = %aoi.name, "Created AOI");
        Ok(aoi)
    }

    async fn update(&self, id: &str, patch: AoiPatch) -> PortResult<Aoi> {
        self.latency.pause(SimulatedLatency::UPDATE_MS).await;
        validate_patch(&patch)?;

        let mut aois = self.list().await?;
        let aoi = aois
            .iter_mut()
            .find(|aoi| aoi.id == id)
            .ok_or_else(|| PortError::NotFound(format!("AOI {} not found", id)))?;

        aoi.apply(patch);
        aoi.updated_at = later_than(aoi.updated_at, Utc::now());
        let updated = aoi.clone();

        save_aois(self.store.as_ref(), &aois).await?;
        debug!(aoi_id = %id, "Updated AOI");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> PortResult<()> {
        self.latency.pause(SimulatedLatency::DELETE_MS).await;

        let mut aois = self.list().await?;
        let before = aois.len();
        aois.retain(|aoi| aoi.id != id);
        save_aois(self.store.as_ref(), &aois).await?;

        if aois.len() < before {
            info!(aoi_id = %id, "Deleted AOI");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_than_is_strict() {
        let t = Utc::now();
        assert!(later_than(t, t) > t);
        assert!(later_than(t, t - Duration::seconds(5)) > t);
        let future = t + Duration::seconds(1);
        assert_eq!(later_than(t, future), future);
    }
}
