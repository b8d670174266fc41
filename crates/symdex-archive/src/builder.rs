use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::ArchiveResult;
use crate::manifest::render_nuspec;

/// Packs a symbol package in memory.
///
/// The manifest goes first, followed by the added files in insertion order.
/// Used for fixtures and for round-trip checks of the reader.
#[derive(Clone, Debug)]
pub struct SymbolPackageBuilder {
    id: String,
    version: String,
    include_manifest: bool,
    opc_parts: bool,
    files: Vec<(String, Vec<u8>)>,
}

impl SymbolPackageBuilder {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            include_manifest: true,
            opc_parts: false,
            files: Vec::new(),
        }
    }

    /// Add a file entry.
    pub fn file(mut self, path: impl Into<String>, content: Vec<u8>) -> Self {
        self.files.push((path.into(), content));
        self
    }

    /// Leave out the root `.nuspec`.
    pub fn without_manifest(mut self) -> Self {
        self.include_manifest = false;
        self
    }

    /// Add the packaging parts written by `nuget pack`:
    /// `_rels/.rels`, `[Content_Types].xml` and a `.psmdcp` core-properties part.
    pub fn with_opc_parts(mut self) -> Self {
        self.opc_parts = true;
        self
    }

    /// Manifest entry path, `{id}.nuspec`.
    pub fn manifest_path(&self) -> String {
        format!("{}.nuspec", self.id)
    }

    pub fn build(&self) -> ArchiveResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        if self.include_manifest {
            writer.start_file(self.manifest_path(), options)?;
            writer.write_all(render_nuspec(&self.id, &self.version).as_bytes())?;
        }

        for (path, content) in &self.files {
            writer.start_file(path.as_str(), options)?;
            writer.write_all(content)?;
        }

        if self.opc_parts {
            writer.start_file("_rels/.rels", options)?;
            writer.write_all(RELS.as_bytes())?;
            writer.start_file("[Content_Types].xml", options)?;
            writer.write_all(CONTENT_TYPES.as_bytes())?;
            writer.start_file(
                "package/services/metadata/core-properties/0f3b4e2a.psmdcp",
                options,
            )?;
            writer.write_all(CORE_PROPERTIES.as_bytes())?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

const RELS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships" />
"#;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml" />
  <Default Extension="nuspec" ContentType="application/octet" />
  <Default Extension="pdb" ContentType="application/octet" />
</Types>
"#;

const CORE_PROPERTIES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<coreProperties xmlns="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" />
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{PackageArchive, SymbolPackage};

    #[test]
    fn opc_parts_are_listed() {
        let bytes = SymbolPackageBuilder::new("MyLib", "1.0.0")
            .with_opc_parts()
            .build()
            .unwrap();
        let mut package = SymbolPackage::open(Cursor::new(bytes)).unwrap();
        let extensions: Vec<Option<String>> = package
            .validate_entries()
            .unwrap()
            .into_iter()
            .map(|e| e.extension)
            .collect();
        assert_eq!(
            extensions,
            vec![
                Some(".nuspec".to_string()),
                Some(".rels".to_string()),
                Some(".xml".to_string()),
                Some(".psmdcp".to_string()),
            ]
        );
    }

    #[test]
    fn manifest_path_uses_id() {
        assert_eq!(
            SymbolPackageBuilder::new("MyLib", "1.0.0").manifest_path(),
            "MyLib.nuspec"
        );
    }
}
