//! Behaviour of the local providers over an in-memory store.

mod common;

use chrono::Datelike;
use common::{local_providers, test_zone};
use geowatch_api::adapters::records::{AOIS_KEY, FALLBACK_USER_ID, TOKEN_KEY, USER_KEY};
use geowatch_core::domain::{AoiPatch, MAX_CHANGES_DETECTED};
use geowatch_core::ports::PortError;

//=========================================================================================
// Auth
//=========================================================================================

#[tokio::test]
async fn login_with_four_char_password_authenticates() {
    let (providers, store) = local_providers();

    let session = providers.auth.login("ana@example.com", "abcd").await.unwrap();

    assert!(providers.auth.is_authenticated().await.unwrap());
    assert!(session.token.starts_with("mock_jwt_token_"));
    assert_eq!(session.user.name, "Ana");
    assert_eq!(
        providers.auth.session_token().await.unwrap().as_deref(),
        Some(session.token.as_str())
    );
    assert!(store.get(USER_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn login_rejects_short_and_missing_credentials() {
    let (providers, _) = local_providers();

    assert_eq!(
        providers.auth.login("ana@example.com", "abc").await,
        Err(PortError::InvalidCredentials)
    );
    assert!(matches!(
        providers.auth.login("", "password").await,
        Err(PortError::Validation(_))
    ));
    assert!(matches!(
        providers.auth.login("ana@example.com", "").await,
        Err(PortError::Validation(_))
    ));
    assert!(!providers.auth.is_authenticated().await.unwrap());
}

#[tokio::test]
async fn signup_requires_six_char_password() {
    let (providers, _) = local_providers();

    assert_eq!(
        providers.auth.signup("new@user.com", "12345", None).await,
        Err(PortError::WeakPassword)
    );

    let session = providers
        .auth
        .signup("new@user.com", "123456", Some("Newcomer"))
        .await
        .unwrap();
    assert_eq!(session.user.name, "Newcomer");
    assert_eq!(session.user.email, "new@user.com");
}

#[tokio::test]
async fn logout_clears_the_session() {
    let (providers, store) = local_providers();
    providers.auth.signup("new@user.com", "password1", None).await.unwrap();

    providers.auth.logout().await.unwrap();

    assert!(!providers.auth.is_authenticated().await.unwrap());
    assert_eq!(providers.auth.current_user().await.unwrap(), None);
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    // The AOI collection outlives the session.
    assert!(store.get(AOIS_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn current_user_needs_a_token() {
    let (providers, store) = local_providers();
    let session = providers.auth.login("ana@example.com", "abcd").await.unwrap();

    assert_eq!(
        providers.auth.current_user().await.unwrap(),
        Some(session.user)
    );

    store.remove(TOKEN_KEY).await.unwrap();
    assert_eq!(providers.auth.current_user().await.unwrap(), None);
}

#[tokio::test]
async fn signup_resets_the_collection_to_the_demo_set() {
    let (providers, _) = local_providers();
    providers.auth.login("ana@example.com", "abcd").await.unwrap();
    providers.aois.create(test_zone()).await.unwrap();
    providers.aois.delete("demo_aoi_1").await.unwrap();
    assert_eq!(providers.aois.list().await.unwrap().len(), 4);

    let session = providers
        .auth
        .signup("new@user.com", "password1", None)
        .await
        .unwrap();

    let aois = providers.aois.list().await.unwrap();
    let ids: Vec<_> = aois.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["demo_aoi_1", "demo_aoi_2", "demo_aoi_3", "demo_aoi_4"]);
    assert!(aois.iter().all(|a| a.user_id == session.user.id));
}

#[tokio::test]
async fn login_keeps_an_existing_collection() {
    let (providers, _) = local_providers();
    providers.auth.login("ana@example.com", "abcd").await.unwrap();
    let created = providers.aois.create(test_zone()).await.unwrap();

    providers.auth.login("ana@example.com", "abcd").await.unwrap();

    let aois = providers.aois.list().await.unwrap();
    assert_eq!(aois.len(), 5);
    assert!(aois.iter().any(|a| a.id == created.id));
}

#[tokio::test]
async fn login_does_not_reseed_an_emptied_collection() {
    let (providers, _) = local_providers();
    providers.auth.login("ana@example.com", "abcd").await.unwrap();
    for id in ["demo_aoi_1", "demo_aoi_2", "demo_aoi_3", "demo_aoi_4"] {
        providers.aois.delete(id).await.unwrap();
    }

    providers.auth.login("ana@example.com", "abcd").await.unwrap();

    assert!(providers.aois.list().await.unwrap().is_empty());
}

//=========================================================================================
// AOIs
//=========================================================================================

#[tokio::test]
async fn create_then_get_returns_the_input_plus_assigned_fields() {
    let (providers, _) = local_providers();
    let session = providers.auth.login("ana@example.com", "abcd").await.unwrap();
    let before = providers.aois.list().await.unwrap().len();

    let input = test_zone();
    let created = providers.aois.create(input.clone()).await.unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.user_id, session.user.id);
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.total_changes_detected, 0);
    assert_eq!(created.status, None);
    assert_eq!(created.name, input.name);
    assert_eq!(created.geojson, input.geojson);
    assert_eq!(created.change_type, input.change_type);
    assert_eq!(created.monitoring_frequency, input.monitoring_frequency);
    assert_eq!(created.confidence_threshold, input.confidence_threshold);
    assert_eq!(created.email_alerts, input.email_alerts);
    assert_eq!(created.in_app_notifications, input.in_app_notifications);

    let fetched = providers.aois.get(&created.id).await.unwrap();
    assert_eq!(fetched, Some(created));
    assert_eq!(providers.aois.list().await.unwrap().len(), before + 1);
}

#[tokio::test]
async fn created_aoi_omits_status_on_the_wire() {
    let (providers, _) = local_providers();

    let created = providers.aois.create(test_zone()).await.unwrap();
    let json = serde_json::to_value(&created).unwrap();

    assert!(json.get("status").is_none());
    assert_eq!(json["totalChangesDetected"], 0);
    assert_eq!(json["_id"], created.id.as_str());
}

#[tokio::test]
async fn create_without_a_user_uses_the_fallback_owner() {
    let (providers, _) = local_providers();

    let created = providers.aois.create(test_zone()).await.unwrap();

    assert_eq!(created.user_id, FALLBACK_USER_ID);
    assert_eq!(providers.aois.list().await.unwrap(), vec![created]);
}

#[tokio::test]
async fn update_changes_only_the_patched_field_and_timestamp() {
    let (providers, _) = local_providers();
    let created = providers.aois.create(test_zone()).await.unwrap();

    let patch = AoiPatch {
        name: Some("X".to_string()),
        ..AoiPatch::default()
    };
    let updated = providers.aois.update(&created.id, patch).await.unwrap();

    assert_eq!(updated.name, "X");
    assert!(updated.updated_at > created.updated_at);

    let mut expected = created.clone();
    expected.name = "X".to_string();
    expected.updated_at = updated.updated_at;
    assert_eq!(updated, expected);
    assert_eq!(providers.aois.get(&created.id).await.unwrap(), Some(expected));
}

#[tokio::test]
async fn update_of_a_missing_id_is_not_found() {
    let (providers, _) = local_providers();

    let result = providers.aois.update("nope", AoiPatch::default()).await;

    assert!(matches!(result, Err(PortError::NotFound(_))));
}

#[tokio::test]
async fn update_rejects_a_change_count_over_the_cap() {
    let (providers, _) = local_providers();
    let created = providers.aois.create(test_zone()).await.unwrap();

    let patch = AoiPatch {
        total_changes_detected: Some(MAX_CHANGES_DETECTED + 1),
        ..AoiPatch::default()
    };
    let result = providers.aois.update(&created.id, patch).await;
    assert!(matches!(result, Err(PortError::Validation(_))));
    assert_eq!(providers.aois.get(&created.id).await.unwrap(), Some(created.clone()));

    let patch = AoiPatch {
        total_changes_detected: Some(MAX_CHANGES_DETECTED),
        ..AoiPatch::default()
    };
    let updated = providers.aois.update(&created.id, patch).await.unwrap();
    assert_eq!(updated.total_changes_detected, MAX_CHANGES_DETECTED);
    let alerts = providers.analysis.change_alerts(&created.id).await.unwrap();
    assert_eq!(alerts.len(), MAX_CHANGES_DETECTED as usize);
}

#[tokio::test]
async fn update_can_clear_the_description() {
    let (providers, _) = local_providers();
    let mut input = test_zone();
    input.description = Some("Shoreline".to_string());
    let created = providers.aois.create(input).await.unwrap();

    let patch = AoiPatch {
        description: Some(None),
        ..AoiPatch::default()
    };
    let updated = providers.aois.update(&created.id, patch).await.unwrap();

    assert_eq!(updated.description, None);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (providers, _) = local_providers();
    let created = providers.aois.create(test_zone()).await.unwrap();

    providers.aois.delete(&created.id).await.unwrap();
    assert_eq!(providers.aois.get(&created.id).await.unwrap(), None);

    providers.aois.delete(&created.id).await.unwrap();
    assert_eq!(providers.aois.get(&created.id).await.unwrap(), None);
}

#[tokio::test]
async fn unparseable_collection_reads_as_empty() {
    let (providers, store) = local_providers();
    store.set(AOIS_KEY, "{not json").await.unwrap();

    assert!(providers.aois.list().await.unwrap().is_empty());
    assert_eq!(providers.aois.get("demo_aoi_1").await.unwrap(), None);
}

//=========================================================================================
// Analysis
//=========================================================================================

#[tokio::test]
async fn ndvi_series_has_twelve_monthly_points_in_range() {
    let (providers, _) = local_providers();
    providers.auth.login("ana@example.com", "abcd").await.unwrap();

    let series = providers
        .analysis
        .ndvi_time_series("demo_aoi_1")
        .await
        .unwrap();

    assert_eq!(series.data.len(), 12);
    assert!(series
        .data
        .iter()
        .all(|p| (0.1..=0.9).contains(&p.ndvi)));
    let month_index = |d: chrono::NaiveDate| d.year() * 12 + d.month0() as i32;
    for pair in series.data.windows(2) {
        assert!(pair[0].date < pair[1].date);
        assert_eq!(month_index(pair[1].date) - month_index(pair[0].date), 1);
    }
    assert_eq!(series.statistics.trend, series.trend);
}

#[tokio::test]
async fn ndvi_for_unknown_aoi_is_not_found() {
    let (providers, _) = local_providers();

    let result = providers.analysis.ndvi_time_series("missing").await;

    assert!(matches!(result, Err(PortError::NotFound(_))));
}

#[tokio::test]
async fn alerts_follow_the_recorded_change_count() {
    let (providers, _) = local_providers();
    providers.auth.login("ana@example.com", "abcd").await.unwrap();

    let alerts = providers.analysis.change_alerts("demo_aoi_2").await.unwrap();

    assert_eq!(alerts.len(), 12);
    assert!(alerts.iter().all(|a| a.aoi_id == "demo_aoi_2"));
    for pair in alerts.windows(2) {
        assert!(pair[0].detection_date >= pair[1].detection_date);
    }
}

#[tokio::test]
async fn alerts_for_a_quiet_aoi_number_one_to_five() {
    let (providers, _) = local_providers();
    let created = providers.aois.create(test_zone()).await.unwrap();

    let alerts = providers.analysis.change_alerts(&created.id).await.unwrap();

    assert!((1..=5).contains(&alerts.len()));
}

#[tokio::test]
async fn alerts_for_unknown_aoi_are_empty() {
    let (providers, _) = local_providers();

    assert!(providers
        .analysis
        .change_alerts("missing")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn report_combines_ndvi_and_alerts() {
    let (providers, _) = local_providers();
    providers.auth.login("ana@example.com", "abcd").await.unwrap();

    let report = providers
        .analysis
        .generate_report("demo_aoi_2")
        .await
        .unwrap();

    assert_eq!(report.report_title, "GeoWatch Analysis Report");
    assert_eq!(report.aoi.id, "demo_aoi_2");
    assert_eq!(report.total_alerts, 12);
    assert_eq!(report.recent_alerts.len(), 5);
}

#[tokio::test]
async fn report_for_unknown_aoi_is_not_found() {
    let (providers, _) = local_providers();

    let result = providers.analysis.generate_report("missing").await;

    assert!(matches!(result, Err(PortError::NotFound(_))));
}

#[tokio::test]
async fn summary_counts_the_demo_collection() {
    let (providers, _) = local_providers();
    providers.auth.login("ana@example.com", "abcd").await.unwrap();

    let stats = providers.analysis.summary_stats().await.unwrap();

    assert_eq!(stats.total_aois, 4);
    assert_eq!(stats.active_monitoring, 3);
    assert_eq!(stats.recent_alerts, 20);
    assert!(stats.coverage_area.ends_with(" km²"));
    let area: f64 = stats
        .coverage_area
        .trim_end_matches(" km²")
        .parse()
        .unwrap();
    assert!((10.0..=15.0).contains(&area));
}

#[tokio::test]
async fn same_seed_gives_the_same_alerts() {
    let (first, _) = local_providers();
    let (second, _) = local_providers();
    for providers in [&first, &second] {
        providers.aois.create(test_zone()).await.unwrap();
    }
    let a = first.aois.list().await.unwrap();
    let b = second.aois.list().await.unwrap();

    let left = first.analysis.change_alerts(&a[0].id).await.unwrap();
    let right = second.analysis.change_alerts(&b[0].id).await.unwrap();

    assert_eq!(a[0].id, b[0].id);
    assert_eq!(left.len(), right.len());
    for (l, r) in left.iter().zip(&right) {
        assert_eq!(l.change_percent, r.change_percent);
        assert_eq!(l.severity, r.severity);
    }
}
