//! npm registry client.
//!
//! Provides access to the npm registry via:
//! - Version metadata API (<https://registry.npmjs.org/{package}/{version}>)
//!   to locate the tarball of one version
//! - The tarball URL from `dist.tarball`
//!
//! Nothing is cached; the syncer only downloads versions it has not mirrored
//! yet.

use crate::error::NpmError;
use crate::types::NpmVersionedPackage;
use bytes::Bytes;
use pkgmirror_core::{RegistryClient, Result, VersionedPackage};
use serde::Deserialize;

/// Public npm registry.
pub const REGISTRY_BASE: &str = "https://registry.npmjs.org";

/// Client for the npm registry.
#[derive(Clone)]
pub struct NpmRegistry {
    client: RegistryClient,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a client for the public registry.
    pub fn new(client: RegistryClient) -> Self {
        Self::with_base_url(client, REGISTRY_BASE)
    }

    /// Creates a client for a registry mirror such as Verdaccio.
    pub fn with_base_url(client: RegistryClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the URL of the version metadata document.
    ///
    /// The scope separator is percent-encoded the way the npm CLI does it.
    pub fn version_url(&self, dep: &NpmVersionedPackage) -> String {
        let name = dep.package_syntax();
        let escaped = match name.strip_prefix('@') {
            Some(scoped) => format!("@{}", urlencoding::encode(scoped)),
            None => urlencoding::encode(name).into_owned(),
        };
        format!("{}/{}/{}", self.base_url, escaped, dep.version())
    }

    /// Looks up the tarball URL of one version.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the registry does not know the version
    /// or its metadata has no tarball.
    pub async fn tarball_url(&self, dep: &NpmVersionedPackage) -> Result<String> {
        let display = dep.versioned_package_syntax();
        let metadata: VersionMetadata = self.client.get_json(&self.version_url(dep), &display).await?;

        metadata
            .dist
            .and_then(|dist| dist.tarball)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| NpmError::MissingTarball { package: display }.into())
    }

    /// Downloads the tarball of one version.
    pub async fn download_tarball(&self, dep: &NpmVersionedPackage) -> Result<Bytes> {
        let url = self.tarball_url(dep).await?;
        self.client
            .get_bytes(&url, &dep.versioned_package_syntax())
            .await
    }
}

/// Version metadata from npm registry.
#[derive(Deserialize)]
struct VersionMetadata {
    #[serde(default)]
    dist: Option<Dist>,
}

#[derive(Deserialize)]
struct Dist {
    #[serde(default)]
    tarball: Option<String>,
}
