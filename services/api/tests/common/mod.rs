//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use geowatch_api::adapters::{MemoryStore, SimulatedLatency};
use geowatch_api::providers::Providers;
use geowatch_core::domain::{ChangeType, MonitoringFrequency, NewAoi};
use geowatch_core::ports::KeyValueStore;
use geowatch_core::random::RandomSource;
use serde_json::json;
use std::sync::Arc;

pub const SEED: u64 = 42;

/// Local providers over a fresh in-memory store, with no delays and a fixed seed.
pub fn local_providers() -> (Providers, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let providers = Providers::local(
        store.clone(),
        RandomSource::seeded(SEED),
        SimulatedLatency::disabled(),
    );
    (providers, store)
}

pub fn test_zone() -> NewAoi {
    NewAoi {
        name: "Test Zone".to_string(),
        description: None,
        geojson: json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
            }
        }),
        change_type: ChangeType::Waterbody,
        monitoring_frequency: MonitoringFrequency::Monthly,
        confidence_threshold: 75,
        email_alerts: false,
        in_app_notifications: true,
        status: None,
        last_monitored: None,
    }
}
