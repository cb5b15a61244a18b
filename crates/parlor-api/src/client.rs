//! The HTTP client and its builder.

use std::{sync::Arc, time::Duration};

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    ApiError, Error, Result, TokenProvider,
    handlers::{
        AnalyticsHandler, FeedHandler, FilesHandler, MeetingsHandler, MembersHandler,
        MessagesHandler, PaymentsHandler, RoomsHandler, UserHandler,
    },
};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Successful responses wrap their payload in a `data` field.
#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Authenticated client for the parlor backend.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) http: reqwest::Client,
    pub(crate) api_base: String,
    pub(crate) token: Arc<dyn TokenProvider>,
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: Option<String>,
    token: Option<Arc<dyn TokenProvider>>,
    user_agent: String,
    timeout: Duration,
}

impl ApiClient {
    /// Start building a client.
    #[must_use]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: None,
            token: None,
            user_agent: "parlor-client".to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The current user's account.
    #[must_use]
    pub fn user(&self) -> UserHandler {
        UserHandler { client: self.clone() }
    }

    /// The current user's rooms.
    #[must_use]
    pub fn rooms(&self) -> RoomsHandler {
        RoomsHandler { client: self.clone() }
    }

    /// A room's feed.
    #[must_use]
    pub fn feed(&self, room_id: parlor_core::RoomId) -> FeedHandler {
        FeedHandler { client: self.clone(), room_id }
    }

    /// A room's chat.
    #[must_use]
    pub fn messages(&self, room_id: parlor_core::RoomId) -> MessagesHandler {
        MessagesHandler { client: self.clone(), room_id }
    }

    /// A room's file tree.
    #[must_use]
    pub fn files(&self, room_id: parlor_core::RoomId) -> FilesHandler {
        FilesHandler { client: self.clone(), room_id }
    }

    /// A room's memberships.
    #[must_use]
    pub fn members(&self, room_id: parlor_core::RoomId) -> MembersHandler {
        MembersHandler { client: self.clone(), room_id }
    }

    /// A room's meetings.
    #[must_use]
    pub fn meetings(&self, room_id: parlor_core::RoomId) -> MeetingsHandler {
        MeetingsHandler { client: self.clone(), room_id }
    }

    /// A room's payments.
    #[must_use]
    pub fn payments(&self, room_id: parlor_core::RoomId) -> PaymentsHandler {
        PaymentsHandler { client: self.clone(), room_id }
    }

    /// A room's analytics.
    #[must_use]
    pub fn analytics(&self, room_id: parlor_core::RoomId) -> AnalyticsHandler {
        AnalyticsHandler { client: self.clone(), room_id }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.inner.http.get(self.url(path)).query(query);
        self.send_enveloped(request).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T> {
        let request = self.inner.http.post(self.url(path)).query(query).json(body);
        self.send_enveloped(request).await
    }

    /// POST where the response payload is irrelevant.
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<()> {
        let request = self.inner.http.post(self.url(path)).query(query).json(body);
        self.send_discarding(request).await
    }

    /// PUT where the response payload is irrelevant.
    pub(crate) async fn put_unit(&self, path: &str, query: &[(&str, String)]) -> Result<()> {
        let request = self.inner.http.put(self.url(path)).query(query);
        self.send_discarding(request).await
    }

    /// Send, check status, unwrap the `{ "data": ... }` envelope.
    async fn send_enveloped<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let body = self.send_checked(request).await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }

    /// Send and check status, ignoring the payload.
    async fn send_discarding(&self, request: reqwest::RequestBuilder) -> Result<()> {
        self.send_checked(request).await.map(|_| ())
    }

    async fn send_checked(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let token = self.inner.token.token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                source: ApiError::from_body(status.as_u16(), &body),
                body: Some(body),
            });
        }

        Ok(body)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.api_base, path)
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(base_url: &str, token: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: reqwest::Client::new(),
                api_base: base_url.to_owned(),
                token: Arc::new(crate::StaticToken::new(token)),
            }),
        }
    }
}

impl ApiClientBuilder {
    /// Backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Identity provider the client fetches bearer tokens from.
    #[must_use]
    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token = Some(provider);
        self
    }

    /// User agent header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient> {
        let api_base = self
            .base_url
            .ok_or_else(|| Error::Build("base URL is required".to_owned()))?;
        let token = self
            .token
            .ok_or_else(|| Error::Build("token provider is required".to_owned()))?;

        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|error| Error::Build(format!("invalid user agent: {error}")))?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .map_err(|error| Error::Build(format!("{error:#}")))?;

        Ok(ApiClient { inner: Arc::new(Inner { http, api_base, token }) })
    }
}
