//! services/api/src/providers.rs
//!
//! Builds the set of service providers once, at startup, from configuration.
//! Everything downstream holds trait objects and never knows which backend it got.

use geowatch_core::ports::{AnalysisProvider, AoiProvider, AuthProvider, KeyValueStore};
use geowatch_core::random::RandomSource;
use std::sync::Arc;
use tracing::info;

use crate::adapters::{
    HttpAnalysisAdapter, HttpAoiAdapter, HttpAuthAdapter, HttpSession, LocalAnalysisAdapter,
    LocalAoiAdapter, LocalAuthAdapter, MemoryStore, RedbStore, SimulatedLatency,
};
use crate::config::{Backend, Config};
use crate::error::ApiError;

#[derive(Clone)]
pub struct Providers {
    pub auth: Arc<dyn AuthProvider>,
    pub aois: Arc<dyn AoiProvider>,
    pub analysis: Arc<dyn AnalysisProvider>,
}

impl Providers {
    /// Local providers over `store`.
    pub fn local(
        store: Arc<dyn KeyValueStore>,
        random: RandomSource,
        latency: SimulatedLatency,
    ) -> Self {
        let auth = Arc::new(LocalAuthAdapter::new(
            store.clone(),
            random.clone(),
            latency,
        ));
        let aois: Arc<dyn AoiProvider> =
            Arc::new(LocalAoiAdapter::new(store, random.clone(), latency));
        let analysis = Arc::new(LocalAnalysisAdapter::new(aois.clone(), random, latency));
        Self {
            auth,
            aois,
            analysis,
        }
    }

    /// REST client providers sharing one session.
    pub fn http(session: HttpSession) -> Self {
        Self {
            auth: Arc::new(HttpAuthAdapter::new(session.clone())),
            aois: Arc::new(HttpAoiAdapter::new(session.clone())),
            analysis: Arc::new(HttpAnalysisAdapter::new(session)),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        match config.backend {
            Backend::Mock => {
                let store = open_store(config)?;
                let random = match config.rng_seed {
                    Some(seed) => RandomSource::seeded(seed),
                    None => RandomSource::from_os(),
                };
                let latency = SimulatedLatency::from_flag(config.simulated_latency);
                info!(latency = config.simulated_latency, "Using local providers");
                Ok(Self::local(store, random, latency))
            }
            Backend::Http => {
                info!(base_url = %config.api_base_url, "Using HTTP providers");
                Ok(Self::http(HttpSession::new(config.api_base_url.clone())))
            }
        }
    }
}

/// The configured store: a redb file when a path is set, memory otherwise.
pub fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>, ApiError> {
    match &config.store_path {
        Some(path) => {
            let store = RedbStore::open(path).map_err(|e| {
                ApiError::Internal(format!("failed to open store {}: {}", path.display(), e))
            })?;
            info!(path = %path.display(), "Opened redb store");
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}
