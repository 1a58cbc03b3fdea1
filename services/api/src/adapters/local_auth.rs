//! services/api/src/adapters/local_auth.rs
//!
//! The local implementation of the `AuthProvider` port. Sessions are synthesized
//! on the spot: any password meeting the length policy is accepted, and the user
//! and token records are written to the injected store.

use async_trait::async_trait;
use chrono::Utc;
use geowatch_core::demo::demo_aois;
use geowatch_core::domain::{AuthSession, Subscription, User};
use geowatch_core::ports::{AuthProvider, KeyValueStore, PortError, PortResult};
use geowatch_core::random::RandomSource;
use std::sync::Arc;
use tracing::{debug, info};

use super::records::{
    load_user, save_aois, write_json, SimulatedLatency, AOIS_KEY, TOKEN_KEY, USER_KEY,
};

const LOGIN_MIN_PASSWORD: usize = 4;
const SIGNUP_MIN_PASSWORD: usize = 6;
const TOKEN_PREFIX: &str = "mock_jwt_token_";

/// Whether a login or signup replaces an existing AOI collection.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SeedPolicy {
    IfAbsent,
    Always,
}

pub struct LocalAuthAdapter {
    store: Arc<dyn KeyValueStore>,
    random: RandomSource,
    latency: SimulatedLatency,
}

impl LocalAuthAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>, random: RandomSource, latency: SimulatedLatency) -> Self {
        Self {
            store,
            random,
            latency,
        }
    }

    /// Persists a fresh user and token, then seeds the demo AOIs per `policy`.
    async fn open_session(
        &self,
        email: &str,
        name: Option<&str>,
        policy: SeedPolicy,
    ) -> PortResult<AuthSession> {
        let user = User {
            id: self.random.record_id(),
            email: email.to_string(),
            name: name
                .filter(|n| !n.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| display_name(email)),
            created_at: Utc::now(),
            subscription: Subscription::Free,
        };
        let token = format!("{}{}", TOKEN_PREFIX, self.random.record_id());

        write_json(self.store.as_ref(), USER_KEY, &user).await?;
        self.store.set(TOKEN_KEY, &token).await?;

        let seed = match policy {
            SeedPolicy::Always => true,
            SeedPolicy::IfAbsent => self.store.get(AOIS_KEY).await?.is_none(),
        };
        if seed {
            save_aois(self.store.as_ref(), &demo_aois(&user.id, Utc::now())).await?;
            debug!(user_id = %user.id, "Seeded demo AOIs");
        }

        info!(user_id = %user.id, "Session opened");
        Ok(AuthSession { user, token })
    }
}

/// The email's local part with its first character upper-cased.
fn display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn require_credentials(email: &str, password: &str) -> PortResult<()> {
    if email.is_empty() || password.is_empty() {
        return Err(PortError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl AuthProvider for LocalAuthAdapter {
    async fn login(&self, email: &str, password: &str) -> PortResult<AuthSession> {
        self.latency.pause(SimulatedLatency::AUTH_MS).await;

        require_credentials(email, password)?;
        if password.chars().count() < LOGIN_MIN_PASSWORD {
            return Err(PortError::InvalidCredentials);
        }

        self.open_session(email, None, SeedPolicy::IfAbsent).await
    }

    async fn signup(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> PortResult<AuthSession> {
        self.latency.pause(SimulatedLatency::AUTH_MS).await;

        require_credentials(email, password)?;
        if password.chars().count() < SIGNUP_MIN_PASSWORD {
            return Err(PortError::WeakPassword);
        }

        // A new account always starts from the demo set.
        self.open_session(email, name, SeedPolicy::Always).await
    }

    async fn current_user(&self) -> PortResult<Option<User>> {
        self.latency.pause(SimulatedLatency::CURRENT_USER_MS).await;

        if self.store.get(TOKEN_KEY).await?.is_none() {
            return Ok(None);
        }
        load_user(self.store.as_ref()).await
    }

    async fn logout(&self) -> PortResult<()> {
        self.store.remove(USER_KEY).await?;
        self.store.remove(TOKEN_KEY).await?;
        Ok(())
    }

    async fn is_authenticated(&self) -> PortResult<bool> {
        Ok(self.store.get(TOKEN_KEY).await?.is_some())
    }

    async fn session_token(&self) -> PortResult<Option<String>> {
        self.store.get(TOKEN_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_capitalizes_local_part() {
        assert_eq!(display_name("jane.doe@example.com"), "Jane.doe");
        assert_eq!(display_name("x@y"), "X");
        assert_eq!(display_name("élodie@example.fr"), "Élodie");
        assert_eq!(display_name("@nowhere"), "");
    }
}
