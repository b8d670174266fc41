/// Extension of portable debug-symbol entries.
pub const SYMBOL_EXTENSION: &str = ".pdb";

/// Extension of the package manifest.
pub const MANIFEST_EXTENSION: &str = ".nuspec";

/// One file entry of a symbol package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full entry path as stored in the archive, `/`-separated.
    pub path: String,
    /// Lower-cased extension including the leading dot, if any.
    pub extension: Option<String>,
    /// Uncompressed size declared by the entry table.
    pub size: u64,
}

impl ArchiveEntry {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            path,
            extension,
            size,
        }
    }

    /// Base name of the entry (directory components removed).
    pub fn file_name(&self) -> &str {
        file_name_of(&self.path)
    }

    /// Returns `true` if the entry sits at the archive root.
    pub fn is_root(&self) -> bool {
        !self.path.contains('/')
    }

    /// Returns `true` if the entry is a debug-symbol file candidate.
    pub fn is_symbol_file(&self) -> bool {
        self.extension.as_deref() == Some(SYMBOL_EXTENSION)
    }

    /// Returns `true` if the entry is a root-level package manifest.
    pub fn is_manifest(&self) -> bool {
        self.is_root() && self.extension.as_deref() == Some(MANIFEST_EXTENSION)
    }
}

/// The final `/`-separated component of `path`.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Lower-cased extension of the base name of `path`, dot included.
///
/// `_rels/.rels` yields `.rels`; a base name without a dot, or ending in
/// one, has no extension.
pub fn extension_of(path: &str) -> Option<String> {
    let name = file_name_of(path);
    let dot = name.rfind('.')?;
    let ext = &name[dot..];
    if ext.len() == 1 {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
