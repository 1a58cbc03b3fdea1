//! services/api/src/adapters/records.rs
//!
//! Record names shared by the local adapters, the simulated network delay, and
//! JSON helpers over the `KeyValueStore` port.

use geowatch_core::domain::{Aoi, User};
use geowatch_core::ports::{KeyValueStore, PortError, PortResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

pub const USER_KEY: &str = "geowatch_user";
pub const TOKEN_KEY: &str = "geowatch_token";
pub const AOIS_KEY: &str = "geowatch_aois";
pub const THEME_KEY: &str = "geowatch_theme";

/// Owner assigned to AOIs created without a stored user.
pub const FALLBACK_USER_ID: &str = "demo_user";

//=========================================================================================
// Simulated Latency
//=========================================================================================

/// A fixed pause before each local operation resolves, so callers see the same
/// loading behaviour they would against a real backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulatedLatency {
    enabled: bool,
}

impl SimulatedLatency {
    pub const AUTH_MS: u64 = 500;
    pub const CURRENT_USER_MS: u64 = 200;
    pub const LIST_MS: u64 = 300;
    pub const GET_MS: u64 = 200;
    pub const CREATE_MS: u64 = 400;
    pub const UPDATE_MS: u64 = 300;
    pub const DELETE_MS: u64 = 300;
    pub const NDVI_MS: u64 = 400;
    pub const ALERTS_MS: u64 = 300;
    pub const REPORT_MS: u64 = 600;
    pub const SUMMARY_MS: u64 = 200;

    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn from_flag(enabled: bool) -> Self {
        Self { enabled }
    }

    pub async fn pause(&self, millis: u64) {
        if self.enabled {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::enabled()
    }
}

//=========================================================================================
// JSON Records
//=========================================================================================

/// Reads and parses a JSON record. A record that fails to parse is reported
/// and treated as absent.
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> PortResult<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(record = key, error = %e, "Stored record is not valid JSON, treating it as empty");
            Ok(None)
        }
    }
}

pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> PortResult<()> {
    let raw = serde_json::to_string(value)
        .map_err(|e| PortError::Unexpected(format!("failed to encode {}: {}", key, e)))?;
    store.set(key, &raw).await
}

pub async fn load_aois(store: &dyn KeyValueStore) -> PortResult<Vec<Aoi>> {
    Ok(read_json::<Vec<Aoi>>(store, AOIS_KEY).await?.unwrap_or_default())
}

pub async fn save_aois(store: &dyn KeyValueStore, aois: &[Aoi]) -> PortResult<()> {
    write_json(store, AOIS_KEY, aois).await
}

pub async fn load_user(store: &dyn KeyValueStore) -> PortResult<Option<User>> {
    read_json::<User>(store, USER_KEY).await
}
