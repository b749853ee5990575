//! crates.io download client.
//!
//! `.crate` files are gzipped tarballs served from the static CDN at
//! `{base}/crates/{name}/{name}-{version}.crate`. No index lookup is needed
//! to download a known version.

use crate::types::CrateVersionedPackage;
use bytes::Bytes;
use pkgmirror_core::{RegistryClient, Result, VersionedPackage};

/// Static download host of crates.io.
pub const STATIC_BASE: &str = "https://static.crates.io";

#[derive(Clone)]
pub struct CratesRegistry {
    client: RegistryClient,
    base_url: String,
}

impl CratesRegistry {
    pub fn new(client: RegistryClient) -> Self {
        Self::with_base_url(client, STATIC_BASE)
    }

    pub fn with_base_url(client: RegistryClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn download_url(&self, dep: &CrateVersionedPackage) -> String {
        let name = dep.package_syntax();
        let version = urlencoding::encode(dep.version());
        format!("{}/crates/{name}/{name}-{version}.crate", self.base_url)
    }

    /// Downloads the `.crate` archive of one version.
    ///
    /// # Errors
    ///
    /// A version that was never published is reported as not found.
    pub async fn download_crate(&self, dep: &CrateVersionedPackage) -> Result<Bytes> {
        self.client
            .get_bytes(&self.download_url(dep), &dep.versioned_package_syntax())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url() {
        let client = RegistryClient::new().unwrap();
        let dep = CrateVersionedPackage::new("serde", "1.0.188").unwrap();
        assert_eq!(
            CratesRegistry::new(client.clone()).download_url(&dep),
            "https://static.crates.io/crates/serde/serde-1.0.188.crate"
        );

        let dep = CrateVersionedPackage::new("openssl-src", "300.1.3+3.1.2").unwrap();
        assert_eq!(
            CratesRegistry::with_base_url(client, "https://mirror.example/").download_url(&dep),
            "https://mirror.example/crates/openssl-src/openssl-src-300.1.3%2B3.1.2.crate"
        );
    }

    #[tokio::test]
    async fn test_unpublished_version_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/crates/serde/serde-99.0.0.crate")
            .with_status(404)
            .create_async()
            .await;

        let client = RegistryClient::new().unwrap().allow_insecure_http();
        let registry = CratesRegistry::with_base_url(client, server.url());
        let dep = CrateVersionedPackage::new("serde", "99.0.0").unwrap();
        let err = registry.download_crate(&dep).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
