//! services/api/src/adapters/theme.rs
//!
//! Light/dark preference kept next to the session records.

use geowatch_core::domain::Theme;
use geowatch_core::ports::{KeyValueStore, PortResult};
use std::sync::Arc;
use tracing::warn;

use super::records::THEME_KEY;

pub const DEFAULT_THEME: Theme = Theme::Dark;

pub struct ThemeStore {
    store: Arc<dyn KeyValueStore>,
}

impl ThemeStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored theme, or dark when nothing valid is stored.
    pub async fn current(&self) -> PortResult<Theme> {
        let stored = self.store.get(THEME_KEY).await?;
        Ok(match stored.as_deref().map(|raw| (raw, Theme::parse(raw))) {
            Some((_, Some(theme))) => theme,
            Some((raw, None)) => {
                warn!(value = raw, "Ignoring unknown stored theme");
                DEFAULT_THEME
            }
            None => DEFAULT_THEME,
        })
    }

    pub async fn set(&self, theme: Theme) -> PortResult<()> {
        self.store.set(THEME_KEY, theme.as_str()).await
    }

    pub async fn toggle(&self) -> PortResult<Theme> {
        let next = self.current().await?.toggled();
        self.set(next).await?;
        Ok(next)
    }
}
