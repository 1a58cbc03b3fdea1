//! crates/geowatch_core/src/demo.rs
//!
//! The four sample AOIs every new local session starts with.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use crate::domain::{Aoi, AoiStatus, ChangeType, MonitoringFrequency};

/// Closed rectangle as a GeoJSON Feature, corners given as (lon, lat).
fn rectangle(west: f64, south: f64, east: f64, north: f64) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [west, south],
                [west, north],
                [east, north],
                [east, south],
                [west, south]
            ]]
        }
    })
}

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    bounds: (f64, f64, f64, f64),
    change_type: ChangeType,
    frequency: MonitoringFrequency,
    threshold: u32,
    email_alerts: bool,
    status: AoiStatus,
    changes: u32,
    created_days_ago: i64,
    updated_days_ago: i64,
    monitored_days_ago: Option<i64>,
}

const SEEDS: [Seed; 4] = [
    Seed {
        id: "demo_aoi_1",
        name: "Amazon Rainforest Zone A",
        description: "Monitoring deforestation activities in the northern Amazon basin",
        bounds: (-60.5, -3.2, -60.1, -2.8),
        change_type: ChangeType::Deforestation,
        frequency: MonitoringFrequency::Weekly,
        threshold: 70,
        email_alerts: true,
        status: AoiStatus::Active,
        changes: 5,
        created_days_ago: 30,
        updated_days_ago: 2,
        monitored_days_ago: Some(1),
    },
    Seed {
        id: "demo_aoi_2",
        name: "Mumbai Coastal Development",
        description: "Tracking urban expansion along the Mumbai coastline",
        bounds: (72.8, 19.0, 72.9, 19.1),
        change_type: ChangeType::Construction,
        frequency: MonitoringFrequency::Biweekly,
        threshold: 60,
        email_alerts: true,
        status: AoiStatus::Active,
        changes: 12,
        created_days_ago: 45,
        updated_days_ago: 5,
        monitored_days_ago: Some(3),
    },
    Seed {
        id: "demo_aoi_3",
        name: "Chilika Lake Ecosystem",
        description: "Monitoring water level and vegetation changes in Chilika Lake",
        bounds: (85.3, 19.7, 85.5, 19.8),
        change_type: ChangeType::Waterbody,
        frequency: MonitoringFrequency::Monthly,
        threshold: 75,
        email_alerts: false,
        status: AoiStatus::Active,
        changes: 3,
        created_days_ago: 60,
        updated_days_ago: 10,
        monitored_days_ago: Some(7),
    },
    Seed {
        id: "demo_aoi_4",
        name: "Punjab Agricultural Belt",
        description: "Seasonal crop pattern analysis and agricultural land changes",
        bounds: (75.8, 30.9, 76.2, 31.1),
        change_type: ChangeType::Agricultural,
        frequency: MonitoringFrequency::Weekly,
        threshold: 65,
        email_alerts: true,
        status: AoiStatus::Pending,
        changes: 0,
        created_days_ago: 15,
        updated_days_ago: 1,
        monitored_days_ago: None,
    },
];

/// The demo set owned by `user_id`, with timestamps relative to `now`.
pub fn demo_aois(user_id: &str, now: DateTime<Utc>) -> Vec<Aoi> {
    SEEDS
        .iter()
        .map(|seed| {
            let (west, south, east, north) = seed.bounds;
            Aoi {
                id: seed.id.to_string(),
                user_id: user_id.to_string(),
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                geojson: rectangle(west, south, east, north),
                change_type: seed.change_type,
                monitoring_frequency: seed.frequency,
                confidence_threshold: seed.threshold,
                email_alerts: seed.email_alerts,
                in_app_notifications: true,
                status: Some(seed.status),
                created_at: now - Duration::days(seed.created_days_ago),
                updated_at: now - Duration::days(seed.updated_days_ago),
                last_monitored: seed.monitored_days_ago.map(|d| now - Duration::days(d)),
                total_changes_detected: seed.changes,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_set_belongs_to_user() {
        let aois = demo_aois("abc", Utc::now());
        assert_eq!(aois.len(), 4);
        assert!(aois.iter().all(|a| a.user_id == "abc"));
        assert_eq!(aois[3].last_monitored, None);
        assert_eq!(aois[3].status, Some(AoiStatus::Pending));
    }

    #[test]
    fn polygons_are_closed_rings() {
        for aoi in demo_aois("abc", Utc::now()) {
            let ring = &aoi.geojson["geometry"]["coordinates"][0];
            assert_eq!(ring.as_array().map(|r| r.len()), Some(5));
            assert_eq!(ring[0], ring[4]);
        }
    }
}
