//! Key-value store backends and the theme preference built on them.

mod common;

use common::{test_zone, SEED};
use geowatch_api::adapters::{MemoryStore, RedbStore, SimulatedLatency, ThemeStore};
use geowatch_api::adapters::records::THEME_KEY;
use geowatch_api::config::Config;
use geowatch_api::providers::{open_store, Providers};
use geowatch_core::domain::Theme;
use geowatch_core::ports::KeyValueStore;
use geowatch_core::random::RandomSource;
use std::sync::Arc;

async fn exercise(store: &dyn KeyValueStore) {
    assert_eq!(store.get("missing").await.unwrap(), None);

    store.set("k", "v1").await.unwrap();
    store.set("k", "v2").await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

    store.remove("k").await.unwrap();
    store.remove("k").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn memory_store_basics() {
    exercise(&MemoryStore::new()).await;
}

#[tokio::test]
async fn redb_store_basics() {
    let dir = tempfile::tempdir().unwrap();
    let store = RedbStore::open(dir.path().join("geowatch.redb")).unwrap();
    exercise(&store).await;
}

#[tokio::test]
async fn redb_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geowatch.redb");

    let created_id = {
        let store: Arc<dyn KeyValueStore> = Arc::new(RedbStore::open(&path).unwrap());
        let providers = Providers::local(
            store,
            RandomSource::seeded(SEED),
            SimulatedLatency::disabled(),
        );
        providers.auth.login("ana@example.com", "abcd").await.unwrap();
        providers.aois.create(test_zone()).await.unwrap().id
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(RedbStore::open(&path).unwrap());
    let providers = Providers::local(
        store,
        RandomSource::seeded(SEED + 1),
        SimulatedLatency::disabled(),
    );
    assert!(providers.auth.is_authenticated().await.unwrap());
    let aois = providers.aois.list().await.unwrap();
    assert_eq!(aois.len(), 5);
    assert!(aois.iter().any(|a| a.id == created_id));
}

#[tokio::test]
async fn configured_path_opens_a_redb_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.redb");
    let path_str = path.to_string_lossy().to_string();
    let config = Config::from_lookup(|key| match key {
        "GEOWATCH_STORE_PATH" => Some(path_str.clone()),
        _ => None,
    })
    .unwrap();

    let store = open_store(&config).unwrap();
    store.set("k", "v").await.unwrap();

    assert!(path.exists());
}

#[tokio::test]
async fn theme_defaults_to_dark() {
    let themes = ThemeStore::new(Arc::new(MemoryStore::new()));

    assert_eq!(themes.current().await.unwrap(), Theme::Dark);
}

#[tokio::test]
async fn theme_set_and_toggle_persist() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let themes = ThemeStore::new(store.clone());

    themes.set(Theme::Light).await.unwrap();
    assert_eq!(store.get(THEME_KEY).await.unwrap().as_deref(), Some("light"));

    assert_eq!(themes.toggle().await.unwrap(), Theme::Dark);
    assert_eq!(themes.current().await.unwrap(), Theme::Dark);
    assert_eq!(themes.toggle().await.unwrap(), Theme::Light);
}

#[tokio::test]
async fn unknown_stored_theme_falls_back_to_dark() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set(THEME_KEY, "sepia").await.unwrap();

    let themes = ThemeStore::new(store);

    assert_eq!(themes.current().await.unwrap(), Theme::Dark);
    assert_eq!(themes.toggle().await.unwrap(), Theme::Light);
}
