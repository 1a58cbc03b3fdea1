//! services/api/src/adapters/local_analysis.rs
//!
//! The local implementation of the `AnalysisProvider` port. Reads AOIs through the
//! `AoiProvider` port and regenerates every figure on each call; nothing here is
//! stored.

use async_trait::async_trait;
use chrono::Utc;
use geowatch_core::analysis;
use geowatch_core::domain::{Aoi, ChangeAlert, NdviTimeSeries, Report, SummaryStats};
use geowatch_core::ports::{AnalysisProvider, AoiProvider, PortError, PortResult};
use geowatch_core::random::RandomSource;
use std::sync::Arc;
use tracing::debug;

use super::records::SimulatedLatency;

pub struct LocalAnalysisAdapter {
    aois: Arc<dyn AoiProvider>,
    random: RandomSource,
    latency: SimulatedLatency,
}

impl LocalAnalysisAdapter {
    pub fn new(aois: Arc<dyn AoiProvider>, random: RandomSource, latency: SimulatedLatency) -> Self {
        Self {
            aois,
            random,
            latency,
        }
    }

    async fn require_aoi(&self, aoi_id: &str) -> PortResult<Aoi> {
        self.aois
            .get(aoi_id)
            .await?
            .ok_or_else(|| PortError::NotFound(format!("AOI {} not found", aoi_id)))
    }
}

#[async_trait]
impl AnalysisProvider for LocalAnalysisAdapter {
    async fn ndvi_time_series(&self, aoi_id: &str) -> PortResult<NdviTimeSeries> {
        self.latency.pause(SimulatedLatency::NDVI_MS).await;

        self.require_aoi(aoi_id).await?;
        let today = Utc::now().date_naive();
        let series = self
            .random
            .with(|rng| analysis::ndvi_time_series(rng, today));

        debug!(aoi_id, trend = ?series.trend, "Generated NDVI series");
        Ok(series)
    }

    async fn change_alerts(&self, aoi_id: &str) -> PortResult<Vec<ChangeAlert>> {
        self.latency.pause(SimulatedLatency::ALERTS_MS).await;

        let Some(aoi) = self.aois.get(aoi_id).await? else {
            return Ok(Vec::new());
        };
        let now = Utc::now();
        let alerts = self
            .random
            .with(|rng| analysis::change_alerts(rng, &aoi, now));

        debug!(aoi_id, count = alerts.len(), "Generated change alerts");
        Ok(alerts)
    }

    async fn generate_report(&self, aoi_id: &str) -> PortResult<Report> {
        self.latency.pause(SimulatedLatency::REPORT_MS).await;

        let aoi = self.require_aoi(aoi_id).await?;
        let ndvi = self.ndvi_time_series(aoi_id).await?;
        let alerts = self.change_alerts(aoi_id).await?;

        Ok(analysis::build_report(&aoi, &ndvi, &alerts, Utc::now()))
    }

    async fn summary_stats(&self) -> PortResult<SummaryStats> {
        self.latency.pause(SimulatedLatency::SUMMARY_MS).await;

        let aois = self.aois.list().await?;
        Ok(self.random.with(|rng| analysis::summary_stats(rng, &aois)))
    }
}
