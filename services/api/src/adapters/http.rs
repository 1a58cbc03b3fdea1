//! services/api/src/adapters/http.rs
//!
//! REST client implementations of the three service ports. They speak to a
//! GeoWatch API (such as the one in `crate::web`) and share one `HttpSession`,
//! which holds the bearer token handed out by login or signup.

use async_trait::async_trait;
use geowatch_core::domain::{
    Aoi, AoiPatch, AuthSession, ChangeAlert, NdviTimeSeries, NewAoi, Report, SummaryStats, User,
};
use geowatch_core::ports::{
    AnalysisProvider, AoiProvider, AuthProvider, PortError, PortResult,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ErrorBody;

//=========================================================================================
// Shared Session
//=========================================================================================

#[derive(Clone)]
pub struct HttpSession {
    client: reqwest::Client,
    base_url: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpSession {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
        }
    }

    async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    /// The base URL extended by `segments`. Each segment is percent-encoded, so an
    /// id containing `/`, `?` or `#` stays one segment.
    ///
    /// `.` and `..` would be dropped by URL normalization rather than encoded, and
    /// no record id takes either form, so they resolve to nothing.
    fn endpoint(&self, segments: &[&str]) -> PortResult<Url> {
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(PortError::NotFound(format!("no resource named '{}'", dot)));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PortError::Unexpected(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// A request to the endpoint at `segments`, with the bearer token if one is held.
    async fn request(&self, method: Method, segments: &[&str]) -> PortResult<RequestBuilder> {
        let builder = self.client.request(method, self.endpoint(segments)?);
        Ok(match self.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn execute(&self, builder: RequestBuilder) -> PortResult<Response> {
        let response = builder.send().await.map_err(network_error)?;
        debug!(status = %response.status(), url = %response.url(), "GeoWatch API response");
        Ok(response)
    }

    /// Sends the request and decodes a successful JSON body.
    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> PortResult<T> {
        let response = self.execute(builder).await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| PortError::Unexpected(format!("malformed response: {}", e)))
    }

    /// GETs the endpoint at `segments`, treating not-found as `None`.
    async fn fetch_optional<T: DeserializeOwned>(&self, segments: &[&str]) -> PortResult<Option<T>> {
        let fetched = match self.request(Method::GET, segments).await {
            Ok(builder) => self.fetch(builder).await,
            Err(e) => Err(e),
        };
        match fetched {
            Ok(value) => Ok(Some(value)),
            Err(PortError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn network_error(err: reqwest::Error) -> PortError {
    PortError::Unexpected(format!("request to GeoWatch API failed: {}", err))
}

/// Maps an error response back onto the port error it was rendered from.
async fn error_from_response(response: Response) -> PortError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        return PortError::from_code(&parsed.code, parsed.error);
    }

    warn!(%status, "GeoWatch API returned an unstructured error");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized,
        StatusCode::NOT_FOUND => PortError::NotFound(body),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => PortError::Validation(body),
        _ => PortError::Unexpected(format!("{}: {}", status, body)),
    }
}

//=========================================================================================
// Wire Payloads
//=========================================================================================

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Deserialize)]
struct MeResponse {
    user: User,
}

//=========================================================================================
// Auth
//=========================================================================================

pub struct HttpAuthAdapter {
    session: HttpSession,
}

impl HttpAuthAdapter {
    pub fn new(session: HttpSession) -> Self {
        Self { session }
    }

    async fn authenticate(&self, path: &[&str], credentials: Credentials<'_>) -> PortResult<AuthSession> {
        let builder = self
            .session
            .request(Method::POST, path)
            .await?
            .json(&credentials);
        let auth: AuthSession = self.session.fetch(builder).await?;
        self.session.set_token(Some(auth.token.clone())).await;
        Ok(auth)
    }
}

#[async_trait]
impl AuthProvider for HttpAuthAdapter {
    async fn login(&self, email: &str, password: &str) -> PortResult<AuthSession> {
        let credentials = Credentials {
            email,
            password,
            name: None,
        };
        self.authenticate(&["auth", "login"], credentials).await
    }

    async fn signup(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> PortResult<AuthSession> {
        let credentials = Credentials {
            email,
            password,
            name,
        };
        self.authenticate(&["auth", "signup"], credentials).await
    }

    async fn current_user(&self) -> PortResult<Option<User>> {
        if self.session.token().await.is_none() {
            return Ok(None);
        }
        let builder = self.session.request(Method::GET, &["auth", "me"]).await?;
        match self.session.fetch::<MeResponse>(builder).await {
            Ok(me) => Ok(Some(me.user)),
            Err(PortError::Unauthorized) | Err(PortError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn logout(&self) -> PortResult<()> {
        if self.session.token().await.is_none() {
            return Ok(());
        }
        let builder = self.session.request(Method::POST, &["auth", "logout"]).await?;
        self.session.set_token(None).await;

        let response = self.session.execute(builder).await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn is_authenticated(&self) -> PortResult<bool> {
        Ok(self.session.token().await.is_some())
    }

    async fn session_token(&self) -> PortResult<Option<String>> {
        Ok(self.session.token().await)
    }
}

//=========================================================================================
// AOIs
//=========================================================================================

pub struct HttpAoiAdapter {
    session: HttpSession,
}

impl HttpAoiAdapter {
    pub fn new(session: HttpSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl AoiProvider for HttpAoiAdapter {
    async fn list(&self) -> PortResult<Vec<Aoi>> {
        let builder = self.session.request(Method::GET, &["aois"]).await?;
        self.session.fetch(builder).await
    }

    async fn get(&self, id: &str) -> PortResult<Option<Aoi>> {
        self.session.fetch_optional(&["aois", id]).await
    }

    async fn create(&self, data: NewAoi) -> PortResult<Aoi> {
        let builder = self.session.request(Method::POST, &["aois"]).await?.json(&data);
        self.session.fetch(builder).await
    }

    async fn update(&self, id: &str, patch: AoiPatch) -> PortResult<Aoi> {
        let builder = self
            .session
            .request(Method::PUT, &["aois", id])
            .await?
            .json(&patch);
        self.session.fetch(builder).await
    }

    async fn delete(&self, id: &str) -> PortResult<()> {
        let builder = match self.session.request(Method::DELETE, &["aois", id]).await {
            Ok(builder) => builder,
            Err(PortError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e),
        };
        let response = self.session.execute(builder).await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}

//=========================================================================================
// Analysis
//=========================================================================================

pub struct HttpAnalysisAdapter {
    session: HttpSession,
}

impl HttpAnalysisAdapter {
    pub fn new(session: HttpSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl AnalysisProvider for HttpAnalysisAdapter {
    async fn ndvi_time_series(&self, aoi_id: &str) -> PortResult<NdviTimeSeries> {
        let builder = self
            .session
            .request(Method::GET, &["analysis", aoi_id, "ndvi"])
            .await?;
        self.session.fetch(builder).await
    }

    async fn change_alerts(&self, aoi_id: &str) -> PortResult<Vec<ChangeAlert>> {
        Ok(self
            .session
            .fetch_optional(&["aois", aoi_id, "changes"])
            .await?
            .unwrap_or_default())
    }

    async fn generate_report(&self, aoi_id: &str) -> PortResult<Report> {
        let builder = self
            .session
            .request(Method::GET, &["analysis", aoi_id, "report"])
            .await?;
        self.session.fetch(builder).await
    }

    async fn summary_stats(&self) -> PortResult<SummaryStats> {
        let builder = self.session.request(Method::GET, &["analysis", "summary"]).await?;
        self.session.fetch(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(base: &str) -> HttpSession {
        HttpSession::new(Url::parse(base).unwrap())
    }

    #[test]
    fn ids_stay_a_single_path_segment() {
        let session = session("http://localhost:8000/api/geowatch");

        let url = session.endpoint(&["aois", "zone?x=1#top/changes"]).unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/geowatch/aois/zone%3Fx=1%23top%2Fchanges"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn trailing_slash_on_the_base_is_ignored() {
        let session = session("http://localhost:8000/api/geowatch/");

        let url = session.endpoint(&["analysis", "summary"]).unwrap();

        assert_eq!(url.path(), "/api/geowatch/analysis/summary");
    }

    #[test]
    fn dot_segments_resolve_to_nothing() {
        let session = session("http://localhost:8000/api/geowatch");

        assert!(matches!(
            session.endpoint(&["aois", ".."]),
            Err(PortError::NotFound(_))
        ));
    }
}
