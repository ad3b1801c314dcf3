use std::time::Duration;

use log::{debug, warn};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::auth::Token;
use crate::error::{CircleCiError, Result};
use crate::jobs::Jobs;

pub const DEFAULT_BASE_URL: &str = "https://circleci.com/api/v2/";

const TOKEN_HEADER: &str = "Circle-Token";
const USER_AGENT: &str = concat!("circleci-jobs/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the CircleCI v2 REST API.
///
/// Owns the base URL, authentication and raw send/decode mechanics. Resource
/// handles such as [`Jobs`] borrow it to issue their requests.
pub struct Client {
    client: reqwest::Client,
    base_url: Url,
    token: Option<Token>,
}

/// Error payload CircleCI returns alongside non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl Client {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CircleCiError::Config`] if the base URL cannot be parsed or
    /// the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, token: Option<Token>) -> Result<Self> {
        Self::with_timeout(base_url, token, None)
    }

    /// Like [`Client::new`], but every request fails once `timeout` elapses.
    pub fn with_timeout(
        base_url: &str,
        token: Option<Token>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CircleCiError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Url::join drops the last path segment unless the base ends with a slash
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| CircleCiError::Config(format!("Invalid base URL: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Job resource operations.
    pub fn jobs(&self) -> Jobs<'_> {
        Jobs::new(self)
    }

    pub fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.token {
            request.header(TOKEN_HEADER, token.as_str())
        } else {
            request
        }
    }

    /// Builds an authenticated request for `path`, relative to the base URL.
    ///
    /// `body`, when present, is sent as JSON.
    pub(crate) fn new_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| CircleCiError::Config(format!("Invalid request path {path}: {e}")))?;

        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(self.auth_request(request))
    }

    /// Sends the request and maps non-2xx statuses to errors.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        debug!("{} {}", request.method(), request.url());

        let response = self.client.execute(request).await?;
        check_response(response).await
    }

    /// Sends the request and decodes the JSON body into `T`.
    pub(crate) async fn execute<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => return Err(CircleCiError::Unauthorized),
        StatusCode::NOT_FOUND => return Err(CircleCiError::NotFound),
        _ => {}
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.to_string());

    warn!("CircleCI API error (status {status}): {message}");

    Err(CircleCiError::Api {
        status: status.as_u16(),
        message,
    })
}
