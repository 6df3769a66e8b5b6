use std::time::Duration;

use reqwest::{Response, StatusCode, Url};
use serde::Serialize;

use crate::config::Config;
use crate::error::Err;
use crate::registry::{CreateDidRequest, ErrorResponse, Registry, RevokeDidRequest};
use crate::{tracerr, Result};

/// Registry client speaking JSON over HTTP.
///
/// | Operation | Request |
/// |---|---|
/// | ping | `GET {base}/ping` |
/// | create | `POST {base}/did/create` |
/// | revoke | `POST {base}/did/revoke` |
///
/// Failed connections, timeouts, `5xx`, `408` and `429` responses are reported as
/// `RegistryUnavailable`. Any other failure status is `RegistryRejected`, with the registry's
/// `{error, error_description}` body, when it sends one, carried in the message.
#[derive(Clone, Debug)]
pub struct HttpRegistry {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpRegistry {
    /// Create a client for the registry at `base_url`.
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` if the URL is not an absolute HTTP(S) URL or the HTTP client cannot be
    ///   built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let url = match Url::parse(base_url) {
            Ok(url) => url,
            Err(e) => tracerr!(Err::InvalidConfig, "invalid registry URL {}: {}", base_url, e),
        };
        if url.scheme() != "http" && url.scheme() != "https" {
            tracerr!(Err::InvalidConfig, "registry URL must be http(s): {}", base_url);
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http_client =
            match reqwest::Client::builder().default_headers(headers).timeout(timeout).build() {
                Ok(client) => client,
                Err(e) => tracerr!(Err::InvalidConfig, "failed to create HTTP client: {}", e),
            };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Create a client from wallet configuration.
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` if the registry URL is unusable.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.registry_url, config.timeout())
    }

    /// Base URL requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/{path}", self.base_url))?)
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> Result<()> {
        let url = self.endpoint(path)?;
        let response = match self.http_client.post(url).json(body).send().await {
            Ok(res) => res,
            Err(e) => return unavailable(&e),
        };
        unpack_response(response).await
    }
}

impl Registry for HttpRegistry {
    async fn ping(&self) -> Result<()> {
        let url = self.endpoint("ping")?;
        let response = match self.http_client.get(url).send().await {
            Ok(res) => res,
            Err(e) => return unavailable(&e),
        };
        unpack_response(response).await
    }

    async fn create_did(&self, request: &CreateDidRequest) -> Result<()> {
        tracing::debug!(did = %request.did, "registering DID");
        self.post("did/create", request).await
    }

    async fn revoke_did(&self, request: &RevokeDidRequest) -> Result<()> {
        tracing::debug!(did = %request.did, "revoking DID");
        self.post("did/revoke", request).await
    }
}

fn unavailable(err: &reqwest::Error) -> Result<()> {
    let reason = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    tracerr!(Err::RegistryUnavailable, "registry {}: {}", reason, err)
}

// Server errors, timeouts and throttling mean the registry could not serve the request and a
// retry may succeed. Any other failure status is a refusal.
fn failure_code(status: StatusCode) -> Err {
    if status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
    {
        Err::RegistryUnavailable
    } else {
        Err::RegistryRejected
    }
}

async fn unpack_response(res: Response) -> Result<()> {
    let status = res.status();
    if status.is_success() {
        return Ok(());
    }
    let code = failure_code(status);

    let body = match res.text().await {
        Ok(body) => body,
        Err(e) => tracerr!(Err::DeserializationError, "unable to read registry response: {}", e),
    };
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => tracerr!(
            code,
            "status: {}, error: {}, description: {}",
            status,
            err.error,
            err.error_description.as_deref().unwrap_or_default()
        ),
        Err(_) => tracerr!(code, "status: {}, body: {}", status, body),
    }
}
