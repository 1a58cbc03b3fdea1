//! crates/geowatch_core/src/domain.rs
//!
//! Defines the core data structures for GeoWatch.
//! Field names follow the JSON records the dashboard stores and exchanges, so the
//! serde attributes here are the persisted schema.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Upper bound on an AOI's recorded change count. Alerts are generated one per
/// recorded change, so larger counts are rejected on update.
pub const MAX_CHANGES_DETECTED: u32 = 1_000;

//=========================================================================================
// Users and Sessions
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    Free,
    Pro,
    Enterprise,
}

/// The single user active in a browser-style session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub subscription: Subscription,
}

/// Returned by login and signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

//=========================================================================================
// Areas of Interest
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Deforestation,
    Construction,
    Waterbody,
    Agricultural,
    Other,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Deforestation => "deforestation",
            ChangeType::Construction => "construction",
            ChangeType::Waterbody => "waterbody",
            ChangeType::Agricultural => "agricultural",
            ChangeType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MonitoringFrequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AoiStatus {
    Active,
    Pending,
    Inactive,
}

/// A monitored area. `geojson` is kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aoi {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub geojson: Value,
    pub change_type: ChangeType,
    pub monitoring_frequency: MonitoringFrequency,
    pub confidence_threshold: u32,
    pub email_alerts: bool,
    pub in_app_notifications: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AoiStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_monitored: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_changes_detected: u32,
}

/// Caller-supplied fields for a new AOI. Identity, ownership, timestamps and the
/// change counter are assigned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewAoi {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[cfg_attr(feature = "utoipa", schema(value_type = Object))]
    pub geojson: Value,
    pub change_type: ChangeType,
    pub monitoring_frequency: MonitoringFrequency,
    pub confidence_threshold: u32,
    pub email_alerts: bool,
    pub in_app_notifications: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AoiStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_monitored: Option<DateTime<Utc>>,
}

/// A shallow partial update. An absent field is left untouched. `description`
/// and `lastMonitored` can also be sent as `null` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AoiPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<String>))]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<Object>))]
    pub geojson: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<ChangeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_frequency: Option<MonitoringFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_alerts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_app_notifications: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AoiStatus>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<String>, format = DateTime))]
    pub last_monitored: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_changes_detected: Option<u32>,
}

/// A present field, `null` included, becomes `Some`. Absent fields fall back to
/// the `default` of `None`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Aoi {
    /// Builds a stored record from caller input plus provider-assigned fields.
    pub fn from_new(id: String, user_id: String, data: NewAoi, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            name: data.name,
            description: data.description,
            geojson: data.geojson,
            change_type: data.change_type,
            monitoring_frequency: data.monitoring_frequency,
            confidence_threshold: data.confidence_threshold,
            email_alerts: data.email_alerts,
            in_app_notifications: data.in_app_notifications,
            status: data.status,
            created_at: now,
            updated_at: now,
            last_monitored: data.last_monitored,
            total_changes_detected: 0,
        }
    }

    /// Merges every `Some` field of `patch` into the record. Does not touch
    /// `updated_at`; the caller decides the new timestamp.
    pub fn apply(&mut self, patch: AoiPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(geojson) = patch.geojson {
            self.geojson = geojson;
        }
        if let Some(change_type) = patch.change_type {
            self.change_type = change_type;
        }
        if let Some(frequency) = patch.monitoring_frequency {
            self.monitoring_frequency = frequency;
        }
        if let Some(threshold) = patch.confidence_threshold {
            self.confidence_threshold = threshold;
        }
        if let Some(email_alerts) = patch.email_alerts {
            self.email_alerts = email_alerts;
        }
        if let Some(in_app) = patch.in_app_notifications {
            self.in_app_notifications = in_app;
        }
        if let Some(status) = patch.status {
            self.status = Some(status);
        }
        if let Some(last_monitored) = patch.last_monitored {
            self.last_monitored = last_monitored;
        }
        if let Some(total) = patch.total_changes_detected {
            self.total_changes_detected = total;
        }
    }
}

//=========================================================================================
// Analysis Outputs (never persisted)
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NdviQuality {
    Good,
    Cloudy,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdviPoint {
    pub date: NaiveDate,
    pub ndvi: f64,
    pub quality: NdviQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn description(&self) -> &'static str {
        match self {
            Trend::Increasing => "Vegetation health is improving",
            Trend::Decreasing => "Vegetation health is declining",
            Trend::Stable => "Vegetation health is stable",
        }
    }
}

/// Summary figures over a series, formatted to four decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NdviStatistics {
    pub min: String,
    pub max: String,
    pub avg: String,
    pub current: String,
    pub trend: Trend,
    pub trend_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdviTimeSeries {
    pub data: Vec<NdviPoint>,
    pub trend: Trend,
    pub statistics: NdviStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeAlert {
    #[serde(rename = "_id")]
    pub id: String,
    pub aoi_id: String,
    pub detection_date: DateTime<Utc>,
    pub change_percent: f64,
    pub severity: Severity,
    pub change_type: ChangeType,
    pub before_image_url: String,
    pub after_image_url: String,
    pub description: String,
}

/// Denormalized AOI fields embedded in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AoiSnapshot {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub change_type: ChangeType,
    pub monitoring_frequency: MonitoringFrequency,
    pub status: Option<AoiStatus>,
    pub created_at: DateTime<Utc>,
}

impl From<&Aoi> for AoiSnapshot {
    fn from(aoi: &Aoi) -> Self {
        Self {
            id: aoi.id.clone(),
            name: aoi.name.clone(),
            description: aoi.description.clone(),
            change_type: aoi.change_type,
            monitoring_frequency: aoi.monitoring_frequency,
            status: aoi.status,
            created_at: aoi.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report_title: String,
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
    pub aoi: AoiSnapshot,
    pub ndvi_analysis: NdviStatistics,
    pub total_alerts: usize,
    pub recent_alerts: Vec<ChangeAlert>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(rename = "totalAOIs")]
    pub total_aois: usize,
    #[serde(rename = "activeMonitoring")]
    pub active_monitoring: usize,
    #[serde(rename = "recentAlerts")]
    pub recent_alerts: u64,
    #[serde(rename = "coverageArea")]
    pub coverage_area: String,
}

//=========================================================================================
// Preferences
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
