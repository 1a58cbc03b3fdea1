//! crates/geowatch_core/src/analysis.rs
//!
//! Synthetic analysis data: NDVI series, change alerts, reports and dashboard
//! totals. Everything here is pure; randomness and the current time come in as
//! arguments so output is reproducible under a seeded RNG.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use rand::Rng;

use crate::domain::{
    Aoi, AoiSnapshot, AoiStatus, ChangeAlert, ChangeType, NdviPoint, NdviQuality, NdviStatistics,
    NdviTimeSeries, Report, Severity, SummaryStats, Trend, MAX_CHANGES_DETECTED,
};
use crate::random::record_id;

pub const SERIES_LENGTH: usize = 12;
pub const NDVI_FLOOR: f64 = 0.1;
pub const NDVI_CEILING: f64 = 0.9;
pub const TREND_THRESHOLD: f64 = 0.05;
pub const RECENT_ALERT_LIMIT: usize = 5;

pub const REPORT_TITLE: &str = "GeoWatch Analysis Report";
pub const REPORT_AUTHOR: &str = "GeoWatch Platform";
pub const REPORT_FOOTER: &str = "Generated by GeoWatch";

const SEVERITY_BUCKETS: [Severity; 4] = [
    Severity::Low,
    Severity::Moderate,
    Severity::High,
    Severity::Critical,
];

// NASA Earth Observatory scenes used as placeholder before/after imagery.
const BEFORE_IMAGES: [&str; 5] = [
    "https://eoimages.gsfc.nasa.gov/images/imagerecords/151000/151807/amazon_oli_2023225_lrg.jpg",
    "https://eoimages.gsfc.nasa.gov/images/imagerecords/152000/152061/india_vir_2023340_lrg.jpg",
    "https://eoimages.gsfc.nasa.gov/images/imagerecords/151000/151890/chilika_oli_2023244_lrg.jpg",
    "https://eoimages.gsfc.nasa.gov/images/imagerecords/150000/150887/dubai_oli_2023009_lrg.jpg",
    "https://eoimages.gsfc.nasa.gov/images/imagerecords/151000/151426/mumbai_oli_2023139_lrg.jpg",
];

const AFTER_IMAGES: [&str; 5] = [
    "https://eoimages.gsfc.nasa.gov/images/imagerecords/152000/152288/amazon_oli_2024001_lrg.jpg",
    "https://eoimages.gsfc.nasa.gov/images/imagerecords/152000/152415/india_vir_2024025_lrg.jpg",
    "https://eoimages.gsfc.nasa.gov/images/imagerecords/151000/151950/chilika_oli_2023299_lrg.jpg",
    "https://eoimages.gsfc.nasa.gov/images/imagerecords/151000/151577/dubai_oli_2023189_lrg.jpg",
    "https://eoimages.gsfc.nasa.gov/images/imagerecords/152000/152100/mumbai_oli_2023355_lrg.jpg",
];

fn descriptions(change_type: ChangeType) -> [&'static str; 3] {
    match change_type {
        ChangeType::Deforestation => [
            "Tree cover loss detected",
            "Forest clearing activity observed",
            "Vegetation reduction identified",
        ],
        ChangeType::Construction => [
            "New construction detected",
            "Building footprint identified",
            "Urban expansion observed",
        ],
        ChangeType::Waterbody => [
            "Water level change detected",
            "Shoreline modification observed",
            "Water coverage change",
        ],
        ChangeType::Agricultural => [
            "Crop pattern change detected",
            "Field boundary modification",
            "Harvest activity observed",
        ],
        ChangeType::Other => [
            "Land use change detected",
            "Surface modification observed",
            "Terrain change identified",
        ],
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

//=========================================================================================
// NDVI
//=========================================================================================

/// Monsoon months (July through October) read greener.
fn seasonal_offset(date: NaiveDate) -> f64 {
    if (6..=9).contains(&date.month0()) {
        0.15
    } else {
        -0.05
    }
}

/// Twelve monthly points ending at `today`'s month.
pub fn ndvi_series<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Vec<NdviPoint> {
    let base = 0.55 + rng.random::<f64>() * 0.15;

    (0..SERIES_LENGTH as u32)
        .rev()
        .map(|months_back| {
            let date = today
                .checked_sub_months(Months::new(months_back))
                .unwrap_or(today);
            let jitter = (rng.random::<f64>() - 0.5) * 0.1;
            let ndvi = (base + seasonal_offset(date) + jitter).clamp(NDVI_FLOOR, NDVI_CEILING);
            let quality = if rng.random::<f64>() > 0.2 {
                NdviQuality::Good
            } else {
                NdviQuality::Cloudy
            };
            NdviPoint {
                date,
                ndvi: round_to(ndvi, 4),
                quality,
            }
        })
        .collect()
}

/// Compares the mean of the second half of the series with the first half.
pub fn classify_trend(points: &[NdviPoint]) -> Trend {
    let values: Vec<f64> = points.iter().map(|p| p.ndvi).collect();
    let split = values.len() / 2;
    let diff = mean(&values[split..]) - mean(&values[..split]);

    if diff > TREND_THRESHOLD {
        Trend::Increasing
    } else if diff < -TREND_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

pub fn ndvi_statistics(points: &[NdviPoint], trend: Trend) -> NdviStatistics {
    let values: Vec<f64> = points.iter().map(|p| p.ndvi).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let current = values.last().copied().unwrap_or(0.0);

    NdviStatistics {
        min: format!("{:.4}", if values.is_empty() { 0.0 } else { min }),
        max: format!("{:.4}", if values.is_empty() { 0.0 } else { max }),
        avg: format!("{:.4}", mean(&values)),
        current: format!("{:.4}", current),
        trend,
        trend_description: trend.description().to_string(),
    }
}

pub fn ndvi_time_series<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NdviTimeSeries {
    let data = ndvi_series(rng, today);
    let trend = classify_trend(&data);
    let statistics = ndvi_statistics(&data, trend);
    NdviTimeSeries {
        data,
        trend,
        statistics,
    }
}

//=========================================================================================
// Change Alerts
//=========================================================================================

/// Buckets a change percentage into quarters of a 0-20 scale.
pub fn severity_for(change_percent: f64) -> Severity {
    let bucket = (change_percent / 5.0).floor();
    if bucket >= 0.0 && (bucket as usize) < SEVERITY_BUCKETS.len() {
        SEVERITY_BUCKETS[bucket as usize]
    } else {
        Severity::Moderate
    }
}

/// Alerts for `aoi`, most recent first. The AOI's change counter is the count
/// hint, capped at `MAX_CHANGES_DETECTED`; with no recorded changes a count in
/// 1..=5 is drawn instead.
pub fn change_alerts<R: Rng + ?Sized>(rng: &mut R, aoi: &Aoi, now: DateTime<Utc>) -> Vec<ChangeAlert> {
    let count = match aoi.total_changes_detected.min(MAX_CHANGES_DETECTED) {
        0 => rng.random_range(1..=5),
        n => n as usize,
    };
    let phrases = descriptions(aoi.change_type);

    let mut alerts: Vec<ChangeAlert> = (0..count)
        .map(|i| {
            let days_ago = rng.random_range(1..=60);
            let change_percent = round_to(rng.random::<f64>() * 15.0 + 2.0, 2);
            ChangeAlert {
                id: record_id(rng),
                aoi_id: aoi.id.clone(),
                detection_date: now - Duration::days(days_ago),
                change_percent,
                severity: severity_for(change_percent),
                change_type: aoi.change_type,
                before_image_url: BEFORE_IMAGES[i % BEFORE_IMAGES.len()].to_string(),
                after_image_url: AFTER_IMAGES[i % AFTER_IMAGES.len()].to_string(),
                description: phrases[i % phrases.len()].to_string(),
            }
        })
        .collect();

    alerts.sort_by(|a, b| b.detection_date.cmp(&a.detection_date));
    alerts
}

//=========================================================================================
// Reports and Totals
//=========================================================================================

/// Composes a report. `alerts` must already be sorted most recent first.
pub fn build_report(
    aoi: &Aoi,
    ndvi: &NdviTimeSeries,
    alerts: &[ChangeAlert],
    now: DateTime<Utc>,
) -> Report {
    Report {
        report_title: REPORT_TITLE.to_string(),
        generated_at: now,
        generated_by: REPORT_AUTHOR.to_string(),
        aoi: AoiSnapshot::from(aoi),
        ndvi_analysis: ndvi.statistics.clone(),
        total_alerts: alerts.len(),
        recent_alerts: alerts.iter().take(RECENT_ALERT_LIMIT).cloned().collect(),
        footer: REPORT_FOOTER.to_string(),
    }
}

pub fn summary_stats<R: Rng + ?Sized>(rng: &mut R, aois: &[Aoi]) -> SummaryStats {
    let total_aois = aois.len();
    let active_monitoring = aois
        .iter()
        .filter(|aoi| aoi.status == Some(AoiStatus::Active))
        .count();
    let recent_alerts = aois
        .iter()
        .map(|aoi| u64::from(aoi.total_changes_detected))
        .sum();
    let area = total_aois as f64 * 2.5 + rng.random::<f64>() * 5.0;

    SummaryStats {
        total_aois,
        active_monitoring,
        recent_alerts,
        coverage_area: format!("{:.1} km²", area),
    }
}
