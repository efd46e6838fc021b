// Backend HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer authentication, and
// status checking. Endpoint methods live in `auth`, `users`, and `devices`
// as inherent impls so this module stays focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the portal backend.
///
/// Stateless with respect to authentication: callers pass the bearer token
/// (the `biscuit` from [`Credentials`](crate::Credentials)) per request.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
}

impl Client {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, e.g. `http://localhost/api`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}`.
    ///
    /// `Url::join` would drop the last base segment (`/api`) when the base
    /// has no trailing slash, so the path is appended textually.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/{}", path.trim_start_matches('/'));
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode a JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        token: Option<&str>,
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let builder = Self::authorize(self.http.get(url), token);
        let resp = builder.send().await.map_err(Error::Transport)?;

        Self::decode(Self::check(resp).await?).await
    }

    /// Send a POST request with JSON body, decoding a JSON response.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        token: Option<&str>,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let builder = Self::authorize(self.http.post(url).json(body), token);
        let resp = builder.send().await.map_err(Error::Transport)?;

        Self::decode(Self::check(resp).await?).await
    }

    /// Send a POST request with JSON body, ignoring the response body.
    pub(crate) async fn post(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        token: Option<&str>,
    ) -> Result<(), Error> {
        debug!("POST {}", url);

        let builder = Self::authorize(self.http.post(url).json(body), token);
        let resp = builder.send().await.map_err(Error::Transport)?;

        Self::check(resp).await.map(drop)
    }

    /// Send a PATCH request with JSON body, ignoring the response body.
    pub(crate) async fn patch(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        token: Option<&str>,
    ) -> Result<(), Error> {
        debug!("PATCH {}", url);

        let builder = Self::authorize(self.http.patch(url).json(body), token);
        let resp = builder.send().await.map_err(Error::Transport)?;

        Self::check(resp).await.map(drop)
    }

    fn authorize(builder: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Turn a non-2xx response into `Error::Api` carrying the raw body text.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        trace!(status = status.as_u16(), body = %body, "backend rejected request");

        // An empty body would surface as a blank alert; fall back to the reason phrase.
        let body = if body.trim().is_empty() {
            status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {}", status.as_u16()), String::from)
        } else {
            body
        };

        Err(Error::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = body.chars().take(200).collect::<String>();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}
