use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::models::{RefreshRequest, RefreshResponse};
use crate::navigation::{NoNavigation, Navigator, Route};
use crate::session::Session;

/// One call to the backend: method, endpoint path, optional JSON body and
/// optional extra headers.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    endpoint: String,
    body: Option<JsonValue>,
    headers: HeaderMap,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    #[must_use]
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    #[must_use]
    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    #[must_use]
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if `body` cannot be represented as JSON.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Add a header. Caller headers override the default `Content-Type` but
    /// never the bearer `Authorization` header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn body(&self) -> Option<&JsonValue> {
        self.body.as_ref()
    }
}

/// Authenticated request gateway.
///
/// Attaches the stored access token, and on a `401` performs a single token
/// refresh followed by a single retry. When the session cannot be recovered it
/// is cleared, the navigator is sent to [`Route::Login`], and the caller gets
/// [`Error::Unauthorized`].
///
/// ```rust,ignore
/// let gateway = Gateway::new(ClientConfig::from_env()?, Session::in_memory())?
///     .with_navigator(|route: Route| println!("go to {route}"));
/// let courts: Vec<FoodCourt> = gateway.get("/food-courts/").await?;
/// ```
pub struct Gateway {
    config: ClientConfig,
    http: reqwest::Client,
    session: Session,
    navigator: Arc<dyn Navigator>,
    // Serializes refreshes so concurrent 401s share one refresh call.
    refresh_guard: Mutex<()>,
}

impl Gateway {
    /// Create a gateway with an HTTP client honouring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            config,
            http,
            session,
            navigator: Arc::new(NoNavigation),
            refresh_guard: Mutex::new(()),
        })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Where to send the user when the session expires.
    #[must_use]
    pub fn with_navigator(mut self, navigator: impl Navigator) -> Self {
        self.navigator = Arc::new(navigator);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Issue `request` and parse the success payload as `T`.
    ///
    /// An empty success body parses as JSON `null`, so `T = ()` suits
    /// endpoints that answer `204 No Content`.
    ///
    /// # Errors
    ///
    /// - [`Error::Unauthorized`] when the session expired and could not be refreshed
    /// - [`Error::RequestFailed`] for any other non-success status
    /// - [`Error::Network`] on transport failure
    /// - [`Error::Decode`] if the payload does not match `T`
    pub async fn request<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, Error> {
        let token = self.session.access_token()?;
        tracing::debug!(
            method = %request.method,
            endpoint = %request.endpoint,
            authenticated = token.is_some(),
            "API request"
        );

        let response = self.send(request, token.as_deref()).await?;

        let response = match token {
            Some(rejected) if response.status() == StatusCode::UNAUTHORIZED => {
                let fresh = match self.refresh(&rejected).await {
                    Ok(fresh) => fresh,
                    Err(e) => {
                        tracing::warn!(error = %e, "Token refresh failed");
                        return Err(self.expire_session());
                    }
                };

                let retry = self.send(request, Some(&fresh)).await?;
                if retry.status() == StatusCode::UNAUTHORIZED {
                    tracing::warn!(endpoint = %request.endpoint, "Refreshed token rejected");
                    return Err(self.expire_session());
                }
                retry
            }
            _ => response,
        };

        Self::parse(response).await
    }

    /// `GET` `endpoint`.
    ///
    /// # Errors
    ///
    /// Same as [`Gateway::request`].
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        self.request(&ApiRequest::get(endpoint)).await
    }

    /// `POST` `body` as JSON to `endpoint`.
    ///
    /// # Errors
    ///
    /// Same as [`Gateway::request`], plus [`Error::Decode`] if `body` cannot be
    /// represented as JSON.
    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(&ApiRequest::post(endpoint).with_json(body)?)
            .await
    }

    /// `PATCH` `endpoint` with `body` as JSON.
    ///
    /// # Errors
    ///
    /// Same as [`Gateway::request`], plus [`Error::Decode`] if `body` cannot be
    /// represented as JSON.
    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(&ApiRequest::patch(endpoint).with_json(body)?)
            .await
    }

    /// `DELETE` `endpoint`.
    ///
    /// # Errors
    ///
    /// Same as [`Gateway::request`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        self.request(&ApiRequest::delete(endpoint)).await
    }

    async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for name in request.headers.keys() {
            headers.remove(name);
            for value in request.headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        let mut builder = self
            .http
            .request(request.method.clone(), self.config.endpoint_url(&request.endpoint));

        if let Some(token) = token {
            headers.remove(AUTHORIZATION);
            builder = builder.headers(headers).bearer_auth(token);
        } else {
            builder = builder.headers(headers);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder.send().await.map_err(Into::into)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// `rejected` is the access token the server just refused. If another
    /// request already replaced it while this one waited for the guard, the
    /// stored token is reused without calling the server.
    async fn refresh(&self, rejected: &str) -> Result<String, Error> {
        let _guard = self.refresh_guard.lock().await;

        if let Some(current) = self.session.access_token()? {
            if current != rejected {
                tracing::debug!("Access token already refreshed");
                return Ok(current);
            }
        }

        let refresh = self.session.refresh_token()?.ok_or(Error::Unauthorized)?;

        let response = self
            .http
            .post(self.config.refresh_url())
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await?;

        let access = Self::parse::<RefreshResponse>(response).await?.access;
        if let Err(e) = self.session.replace_access_token(&access) {
            // The retry can still use the new token even if it was not persisted.
            tracing::error!(error = %e, "Failed to store refreshed access token");
        }
        tracing::debug!("Access token refreshed");
        Ok(access)
    }

    /// Tear the session down and hand control to the login route.
    ///
    /// A session another request already tore down is left alone, so the
    /// navigator hears about each expiry once.
    fn expire_session(&self) -> Error {
        if matches!(
            (self.session.access_token(), self.session.refresh_token()),
            (Ok(None), Ok(None))
        ) {
            tracing::debug!("Session already cleared");
            return Error::Unauthorized;
        }

        if let Err(e) = self.session.clear() {
            tracing::error!(error = %e, "Failed to clear expired session");
        }
        tracing::info!("Session expired");
        self.navigator.navigate(Route::Login);
        Error::Unauthorized
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let data = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| JsonValue::Object(serde_json::Map::new()));
            tracing::debug!(status = status.as_u16(), "API request failed");
            return Err(Error::request_failed(status.as_u16(), data));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(JsonValue::Null).map_err(Into::into);
        }
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}
