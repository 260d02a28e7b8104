use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::error::{ApiError, ApiOutcome};
use super::transport::{HttpRequest, HttpTransport, Method, RequestBody, Transport};
use crate::config::{ClientConfig, Locale};
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    /// Fail with `MissingToken` before touching the network when signed out.
    Required,
    /// Attach the token when there is one.
    Optional,
}

/// Request relative to the API base.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub auth: Auth,
    /// Only this status counts as success when set (e.g. 204 for deletes).
    pub expect_status: Option<u16>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            auth: Auth::Optional,
            expect_status: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn authenticated(mut self) -> Self {
        self.auth = Auth::Required;
        self
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn expect(mut self, status: u16) -> Self {
        self.expect_status = Some(status);
        self
    }
}

/// Authenticated access to the DiagnoAI REST API.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    session: Session,
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.transport, &other.transport)
            && self.config == other.config
            && self.session == other.session
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Session) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()), config, session)
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        config: ClientConfig,
        session: Session,
    ) -> Self {
        Self {
            transport,
            config,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn locale(&self) -> Locale {
        self.config.locale
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for `path` under the API base, query pairs form-encoded.
    pub(crate) fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        let base = Url::parse(&format!("{}/", self.config.api_base.trim_end_matches('/')))
            .map_err(|e| ApiError::InvalidInput(format!("bad API base: {e}")))?;
        let mut url = base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidInput(format!("bad API path {path}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issue a request and decode a JSON body into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiOutcome<T> {
        match self.exchange(request).await {
            ApiOutcome::Ok(body) => match serde_json::from_str::<T>(&body) {
                Ok(value) => ApiOutcome::Ok(value),
                Err(err) => {
                    tracing::warn!(error = %err, "response body did not match the expected shape");
                    ApiOutcome::Failed(ApiError::from(err))
                }
            },
            ApiOutcome::NotFound => ApiOutcome::NotFound,
            ApiOutcome::Failed(err) => ApiOutcome::Failed(err),
        }
    }

    /// Issue a request whose body, if any, is ignored.
    pub async fn execute(&self, request: ApiRequest) -> ApiOutcome<()> {
        self.exchange(request).await.map(|_| ())
    }

    async fn exchange(&self, request: ApiRequest) -> ApiOutcome<String> {
        let bearer = self.session.token();
        if request.auth == Auth::Required && bearer.is_none() {
            tracing::warn!(path = %request.path, "no access token, request not sent");
            return ApiOutcome::Failed(ApiError::MissingToken);
        }

        let url = match self.url(&request.path, &request.query) {
            Ok(url) => url,
            Err(err) => {
                tracing::error!(path = %request.path, error = %err, "could not build request url");
                return ApiOutcome::Failed(err);
            }
        };
        let http = HttpRequest {
            method: request.method,
            url: url.into(),
            bearer,
            body: request.body,
        };
        let method = http.method.as_str();
        let url = http.url.clone();
        tracing::debug!(%method, %url, "api request");

        let response = match self.transport.send(http).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(%method, %url, error = %err, "api request failed");
                return ApiOutcome::Failed(err);
            }
        };

        tracing::debug!(%method, %url, status = response.status, "api response");
        classify(response.status, response.body, request.expect_status)
    }
}

fn classify(status: u16, body: String, expected: Option<u16>) -> ApiOutcome<String> {
    match status {
        404 => ApiOutcome::NotFound,
        401 => ApiOutcome::Failed(ApiError::Unauthorized),
        403 => ApiOutcome::Failed(ApiError::Forbidden),
        200..=299 => match expected {
            Some(expected) if expected != status => {
                ApiOutcome::Failed(ApiError::UnexpectedStatus {
                    expected,
                    actual: status,
                })
            }
            _ => ApiOutcome::Ok(body),
        },
        _ => ApiOutcome::Failed(ApiError::Status { status, body }),
    }
}
