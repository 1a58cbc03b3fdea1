//! crates/geowatch_core/src/ports.rs
//!
//! Defines the service contracts (traits) for GeoWatch.
//! Each capability has a local implementation backed by a key-value store and a
//! remote one that talks to the REST API; callers only ever see these traits.

use async_trait::async_trait;

use crate::domain::{
    Aoi, AoiPatch, AuthSession, ChangeAlert, NdviTimeSeries, NewAoi, Report, SummaryStats, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error type for all port operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// A required field was missing or empty.
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password must be at least 6 characters")]
    WeakPassword,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// Stable machine-readable name, used as the `code` of error bodies on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            PortError::Validation(_) => "validation",
            PortError::InvalidCredentials => "invalid_credentials",
            PortError::WeakPassword => "weak_password",
            PortError::NotFound(_) => "not_found",
            PortError::Unauthorized => "unauthorized",
            PortError::Unexpected(_) => "unexpected",
        }
    }

    /// The payload of the variants that carry one, otherwise the display text.
    pub fn message(&self) -> String {
        match self {
            PortError::Validation(m) | PortError::NotFound(m) | PortError::Unexpected(m) => {
                m.clone()
            }
            other => other.to_string(),
        }
    }

    /// Rebuilds an error from a wire `code` and message.
    pub fn from_code(code: &str, message: String) -> Self {
        match code {
            "validation" => PortError::Validation(message),
            "invalid_credentials" => PortError::InvalidCredentials,
            "weak_password" => PortError::WeakPassword,
            "not_found" => PortError::NotFound(message),
            "unauthorized" => PortError::Unauthorized,
            _ => PortError::Unexpected(message),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Port
//=========================================================================================

/// Named string records, the shape of browser local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> PortResult<AuthSession>;

    async fn signup(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> PortResult<AuthSession>;

    /// The logged-in user, or `None` when there is no usable session.
    async fn current_user(&self) -> PortResult<Option<User>>;

    async fn logout(&self) -> PortResult<()>;

    async fn is_authenticated(&self) -> PortResult<bool>;

    async fn session_token(&self) -> PortResult<Option<String>>;
}

#[async_trait]
pub trait AoiProvider: Send + Sync {
    async fn list(&self) -> PortResult<Vec<Aoi>>;

    async fn get(&self, id: &str) -> PortResult<Option<Aoi>>;

    async fn create(&self, data: NewAoi) -> PortResult<Aoi>;

    /// Fails with `NotFound` when no AOI has this id.
    async fn update(&self, id: &str, patch: AoiPatch) -> PortResult<Aoi>;

    /// Succeeds whether or not the AOI exists.
    async fn delete(&self, id: &str) -> PortResult<()>;
}

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn ndvi_time_series(&self, aoi_id: &str) -> PortResult<NdviTimeSeries>;

    /// Empty when the AOI does not exist. Most recent first.
    async fn change_alerts(&self, aoi_id: &str) -> PortResult<Vec<ChangeAlert>>;

    async fn generate_report(&self, aoi_id: &str) -> PortResult<Report>;

    async fn summary_stats(&self) -> PortResult<SummaryStats>;
}
