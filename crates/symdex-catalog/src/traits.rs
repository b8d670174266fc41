use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use symdex_types::PackageIdentity;

use crate::error::CatalogResult;

/// A package that has been published to the feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPackage {
    pub identity: PackageIdentity,
    /// Unlisted packages stay installable but are hidden from search.
    pub listed: bool,
}

impl PublishedPackage {
    pub fn listed(identity: PackageIdentity) -> Self {
        Self {
            identity,
            listed: true,
        }
    }

    pub fn unlisted(identity: PackageIdentity) -> Self {
        Self {
            identity,
            listed: false,
        }
    }
}

/// Package existence oracle.
///
/// Answers whether a published package exists under an (identifier, version)
/// pair. Identifier and version normalization are the implementation's own;
/// callers pass the identity exactly as the manifest declared it.
#[async_trait]
pub trait PackageCatalog: Send + Sync {
    /// Find the published package matching `identity`.
    ///
    /// Unlisted packages are returned only when `include_unlisted` is set.
    /// Returns `Ok(None)` if nothing matches.
    async fn find(
        &self,
        identity: &PackageIdentity,
        include_unlisted: bool,
    ) -> CatalogResult<Option<PublishedPackage>>;

    /// Whether a matching published package exists.
    async fn exists(
        &self,
        identity: &PackageIdentity,
        include_unlisted: bool,
    ) -> CatalogResult<bool> {
        Ok(self.find(identity, include_unlisted).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_validates_identity() {
        let package: PublishedPackage = serde_json::from_str(
            r#"{"identity": {"id": " MyLib", "version": "1.0"}, "listed": false}"#,
        )
        .unwrap();
        assert_eq!(
            package,
            PublishedPackage::unlisted(PackageIdentity::parse("MyLib", "1.0.0").unwrap())
        );
        assert_eq!(package.identity.id, "MyLib");

        let blank: Result<PublishedPackage, _> = serde_json::from_str(
            r#"{"identity": {"id": "", "version": "1.0.0"}, "listed": true}"#,
        );
        assert!(blank.is_err());
    }
}
