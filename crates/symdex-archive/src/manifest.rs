use serde::Deserialize;
use symdex_types::PackageIdentity;

use crate::error::{ArchiveError, ArchiveResult};

/// Largest manifest the reader will load into memory.
pub const MAX_MANIFEST_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Deserialize)]
struct NuspecDocument {
    metadata: NuspecMetadata,
}

#[derive(Debug, Deserialize)]
struct NuspecMetadata {
    #[serde(default)]
    id: String,
    #[serde(default)]
    version: String,
}

/// Parse a `.nuspec` document and return the package identity it declares.
///
/// Only `package/metadata/id` and `package/metadata/version` are read. Every
/// other element is ignored.
pub fn parse_nuspec(xml: &str) -> ArchiveResult<PackageIdentity> {
    let document: NuspecDocument =
        quick_xml::de::from_str(xml).map_err(|e| ArchiveError::InvalidManifest(e.to_string()))?;

    let id = document.metadata.id.trim();
    if id.is_empty() {
        return Err(ArchiveError::InvalidManifest("metadata/id is empty".into()));
    }
    let version = document.metadata.version.trim();
    if version.is_empty() {
        return Err(ArchiveError::InvalidManifest(
            "metadata/version is empty".into(),
        ));
    }

    Ok(PackageIdentity::parse(id, version)?)
}

/// Render a minimal symbols `.nuspec` for `id` and `version`.
pub fn render_nuspec(id: &str, version: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>{id}</id>
    <version>{version}</version>
    <authors>symdex</authors>
    <description>Debug symbols for {id}</description>
    <packageTypes>
      <packageType name="SymbolsPackage" />
    </packageTypes>
  </metadata>
</package>
"#,
        id = escape_xml(id),
        version = escape_xml(version),
    )
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata minClientVersion="2.12">
    <id>MyLib</id>
    <version>1.0</version>
    <authors>Someone</authors>
    <description>Things &amp; stuff</description>
    <dependencies>
      <group targetFramework="net8.0">
        <dependency id="Other" version="2.0.0" />
      </group>
    </dependencies>
  </metadata>
</package>"#;

    #[test]
    fn parses_identity_and_normalizes_version() {
        let identity = parse_nuspec(SAMPLE).unwrap();
        assert_eq!(identity.id, "MyLib");
        assert_eq!(identity.version.to_string(), "1.0.0");
    }

    #[test]
    fn rendered_manifest_parses_back() {
        let xml = render_nuspec("Fancy&Lib", "2.1.0-beta");
        let identity = parse_nuspec(&xml).unwrap();
        assert_eq!(identity.id, "Fancy&Lib");
        assert_eq!(identity.version.to_string(), "2.1.0-beta");
    }

    #[test]
    fn missing_id_is_rejected() {
        let xml = r#"<package><metadata><version>1.0.0</version></metadata></package>"#;
        let err = parse_nuspec(xml).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidManifest(_)));
    }

    #[test]
    fn missing_metadata_is_rejected() {
        let err = parse_nuspec("<package></package>").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidManifest(_)));
    }

    #[test]
    fn malformed_xml_is_rejected() {
        let err = parse_nuspec("<package><metadata><id>x</id>").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidManifest(_)));
    }

    #[test]
    fn bad_version_is_rejected() {
        let xml = r#"<package><metadata><id>MyLib</id><version>not.a.version</version></metadata></package>"#;
        let err = parse_nuspec(xml).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidIdentity(_)));
    }
}
