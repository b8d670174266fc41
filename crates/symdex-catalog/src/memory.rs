use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use symdex_types::{NormalizedVersion, PackageIdentity};
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::traits::{PackageCatalog, PublishedPackage};

type CatalogKey = (String, NormalizedVersion);

/// One record of a JSON catalog document.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogRecord {
    id: String,
    version: String,
    #[serde(default = "default_listed")]
    listed: bool,
}

fn default_listed() -> bool {
    true
}

/// In-memory package catalog.
///
/// Identifiers are folded to ASCII lower case and versions compared in
/// normalized form. Loadable from a JSON array of
/// `{"id": .., "version": .., "listed": ..}` records.
pub struct InMemoryPackageCatalog {
    packages: RwLock<HashMap<CatalogKey, PublishedPackage>>,
}

impl InMemoryPackageCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self {
            packages: RwLock::new(HashMap::new()),
        }
    }

    /// Parse a catalog from a JSON document.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let records: Vec<CatalogRecord> = serde_json::from_str(json)?;
        let catalog = Self::new();
        for (index, record) in records.into_iter().enumerate() {
            let identity = PackageIdentity::parse(&record.id, &record.version)
                .map_err(|source| CatalogError::InvalidRecord { index, source })?;
            catalog.insert(PublishedPackage {
                identity,
                listed: record.listed,
            });
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json(&json)?;
        debug!(
            path = %path.as_ref().display(),
            count = catalog.len(),
            "loaded package catalog"
        );
        Ok(catalog)
    }

    /// Serialize the catalog to the JSON document format, sorted by identity.
    pub fn to_json(&self) -> CatalogResult<String> {
        let map = self.packages.read().expect("lock poisoned");
        let mut records: Vec<CatalogRecord> = map
            .values()
            .map(|p| CatalogRecord {
                id: p.identity.id.clone(),
                version: p.identity.version.to_string(),
                listed: p.listed,
            })
            .collect();
        records.sort_by(|a, b| {
            a.id.to_ascii_lowercase()
                .cmp(&b.id.to_ascii_lowercase())
                .then_with(|| a.version.cmp(&b.version))
        });
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Add or replace a published package.
    pub fn insert(&self, package: PublishedPackage) {
        let key = Self::key(&package.identity);
        self.packages
            .write()
            .expect("lock poisoned")
            .insert(key, package);
    }

    /// Add a listed package.
    pub fn publish(&self, identity: PackageIdentity) {
        self.insert(PublishedPackage::listed(identity));
    }

    /// Mark a package unlisted. Returns `true` if it was present.
    pub fn unlist(&self, identity: &PackageIdentity) -> bool {
        let mut map = self.packages.write().expect("lock poisoned");
        match map.get_mut(&Self::key(identity)) {
            Some(package) => {
                package.listed = false;
                true
            }
            None => false,
        }
    }

    /// Number of packages in the catalog.
    pub fn len(&self) -> usize {
        self.packages.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.packages.read().expect("lock poisoned").is_empty()
    }

    fn key(identity: &PackageIdentity) -> CatalogKey {
        (identity.folded_id(), identity.version.clone())
    }
}

impl Default for InMemoryPackageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageCatalog for InMemoryPackageCatalog {
    async fn find(
        &self,
        identity: &PackageIdentity,
        include_unlisted: bool,
    ) -> CatalogResult<Option<PublishedPackage>> {
        let map = self.packages.read().expect("lock poisoned");
        Ok(map
            .get(&Self::key(identity))
            .filter(|p| p.listed || include_unlisted)
            .cloned())
    }
}

impl std::fmt::Debug for InMemoryPackageCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPackageCatalog")
            .field("package_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: &str, version: &str) -> PackageIdentity {
        PackageIdentity::parse(id, version).unwrap()
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn find_exact_match() {
        let catalog = InMemoryPackageCatalog::new();
        catalog.publish(identity("MyLib", "1.0.0"));

        let found = catalog
            .find(&identity("MyLib", "1.0.0"), false)
            .await
            .unwrap()
            .expect("should exist");
        assert_eq!(found.identity.id, "MyLib");
        assert!(found.listed);
    }

    #[tokio::test]
    async fn find_normalizes_id_and_version() {
        let catalog = InMemoryPackageCatalog::new();
        catalog.publish(identity("MyLib", "1.0.0"));

        assert!(catalog.exists(&identity("mylib", "1.0"), false).await.unwrap());
        assert!(catalog.exists(&identity("MYLIB", "1.0.0.0"), false).await.unwrap());
    }

    #[tokio::test]
    async fn different_version_is_not_found() {
        let catalog = InMemoryPackageCatalog::new();
        catalog.publish(identity("MyLib", "1.0.0"));

        assert!(catalog
            .find(&identity("MyLib", "1.0.1"), true)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unlisted_requires_opt_in() {
        let catalog = InMemoryPackageCatalog::new();
        catalog.insert(PublishedPackage::unlisted(identity("MyLib", "2.0.0")));

        let target = identity("MyLib", "2.0.0");
        assert!(!catalog.exists(&target, false).await.unwrap());
        assert!(catalog.exists(&target, true).await.unwrap());
    }

    #[tokio::test]
    async fn unlist_hides_package() {
        let catalog = InMemoryPackageCatalog::new();
        let target = identity("MyLib", "1.0.0");
        catalog.publish(target.clone());

        assert!(catalog.unlist(&target));
        assert!(!catalog.exists(&target, false).await.unwrap());
        assert!(!catalog.unlist(&identity("Other", "1.0.0")));
    }

    // -----------------------------------------------------------------------
    // JSON loading
    // -----------------------------------------------------------------------

    #[test]
    fn from_json_parses_records() {
        let catalog = InMemoryPackageCatalog::from_json(
            r#"[
                {"id": "MyLib", "version": "1.0.0"},
                {"id": "Other", "version": "2.0", "listed": false}
            ]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn from_json_rejects_bad_version() {
        let err = InMemoryPackageCatalog::from_json(
            r#"[{"id": "MyLib", "version": "1.0.0"}, {"id": "Bad", "version": "x"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn from_json_rejects_malformed_document() {
        let err = InMemoryPackageCatalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packages.json");

        let catalog = InMemoryPackageCatalog::new();
        catalog.publish(identity("MyLib", "1.0.0"));
        catalog.insert(PublishedPackage::unlisted(identity("Other", "3.1.0-beta")));
        std::fs::write(&path, catalog.to_json().unwrap()).unwrap();

        let loaded = InMemoryPackageCatalog::from_json_file(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.to_json().unwrap(), catalog.to_json().unwrap());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = InMemoryPackageCatalog::from_json_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn insert_replaces_same_identity() {
        let catalog = InMemoryPackageCatalog::new();
        catalog.publish(identity("MyLib", "1.0.0"));
        catalog.publish(identity("mylib", "1.0"));
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn debug_format() {
        let catalog = InMemoryPackageCatalog::new();
        let debug = format!("{catalog:?}");
        assert!(debug.contains("InMemoryPackageCatalog"));
        assert!(debug.contains("package_count"));
    }
}
