use crate::error::{MirrorError, Result};
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("pkgmirror/", env!("CARGO_PKG_VERSION"));

/// Archives can be large; metadata requests finish well within this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client shared by all package sources.
///
/// Responses are never cached: every sync pass asks the registry again, so a
/// version that disappears upstream is noticed on the next pass.
///
/// A `404 Not Found` response is reported as
/// [`MirrorError::NotFound`], which the syncer treats as "nothing to mirror
/// for this version".
///
/// # Examples
///
/// ```no_run
/// use pkgmirror_core::http::RegistryClient;
///
/// # async fn example() -> pkgmirror_core::Result<()> {
/// let client = RegistryClient::new()?;
/// let tarball = client
///     .get_bytes("https://registry.npmjs.org/left-pad/-/left-pad-1.3.0.tgz", "left-pad@1.3.0")
///     .await?;
/// println!("downloaded {} bytes", tarball.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    allow_http: bool,
}

impl RegistryClient {
    /// Creates a client that only talks HTTPS.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MirrorError::Registry {
                package: "<client>".into(),
                source: e,
            })?;

        Ok(Self {
            client,
            allow_http: false,
        })
    }

    /// Permits plain `http://` URLs, for local mirrors and mock servers.
    pub fn allow_insecure_http(mut self) -> Self {
        self.allow_http = true;
        self
    }

    /// Validates that a URL uses HTTPS protocol unless HTTP was allowed.
    fn ensure_https(&self, url: &str) -> Result<()> {
        if self.allow_http || url.starts_with("https://") {
            return Ok(());
        }
        Err(MirrorError::parse(url, "URL must use HTTPS"))
    }

    /// Fetches `url` and returns the body.
    ///
    /// `package` labels errors, usually the versioned package display string.
    pub async fn get_bytes(&self, url: &str, package: &str) -> Result<Bytes> {
        self.ensure_https(url)?;

        tracing::debug!(%url, %package, "registry request");

        let registry_error = |source| MirrorError::Registry {
            package: package.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(registry_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(MirrorError::not_found(package));
        }

        let response = response.error_for_status().map_err(registry_error)?;
        response.bytes().await.map_err(registry_error)
    }

    /// Fetches `url` and deserializes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, package: &str) -> Result<T> {
        let body = self.get_bytes(url, package).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
