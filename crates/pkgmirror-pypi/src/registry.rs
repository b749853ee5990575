//! PyPI JSON API client.
//!
//! Looks up one release with `GET {base}/pypi/{name}/{version}/json` and
//! downloads its source distribution. Wheels are never mirrored.

use crate::error::PypiError;
use crate::types::PythonVersionedPackage;
use bytes::Bytes;
use pkgmirror_core::{RegistryClient, Result, VersionedPackage};
use serde::Deserialize;

/// Public PyPI.
pub const PYPI_BASE: &str = "https://pypi.org";

/// Client for the PyPI JSON API.
#[derive(Clone)]
pub struct PypiRegistry {
    client: RegistryClient,
    base_url: String,
}

impl PypiRegistry {
    pub fn new(client: RegistryClient) -> Self {
        Self::with_base_url(client, PYPI_BASE)
    }

    /// Creates a client for a PyPI-compatible index such as devpi.
    pub fn with_base_url(client: RegistryClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn release_url(&self, dep: &PythonVersionedPackage) -> String {
        format!(
            "{}/pypi/{}/{}/json",
            self.base_url,
            urlencoding::encode(dep.package_syntax()),
            urlencoding::encode(dep.version())
        )
    }

    /// Finds the URL of the release's `.tar.gz` source distribution.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when PyPI does not know the release or the
    /// release only ships wheels or zip sdists.
    pub async fn sdist_url(&self, dep: &PythonVersionedPackage) -> Result<String> {
        let display = dep.versioned_package_syntax();
        let release: Release = self.client.get_json(&self.release_url(dep), &display).await?;

        release
            .urls
            .into_iter()
            .find(|file| file.packagetype == "sdist" && file.filename.ends_with(".tar.gz"))
            .map(|file| file.url)
            .ok_or_else(|| PypiError::NoSourceDistribution { package: display }.into())
    }

    /// Downloads the source distribution of one release.
    pub async fn download_sdist(&self, dep: &PythonVersionedPackage) -> Result<Bytes> {
        let url = self.sdist_url(dep).await?;
        tracing::debug!(dependency = %dep.versioned_package_syntax(), %url, "downloading sdist");
        self.client
            .get_bytes(&url, &dep.versioned_package_syntax())
            .await
    }
}

#[derive(Deserialize)]
struct Release {
    #[serde(default)]
    urls: Vec<ReleaseFile>,
}

#[derive(Deserialize)]
struct ReleaseFile {
    #[serde(default)]
    packagetype: String,
    #[serde(default)]
    filename: String,
    url: String,
}
