use symdex_archive::ArchiveEntry;

use crate::error::IndexError;

/// Extensions a symbol package may contain. Anything else rejects the package.
pub const ALLOWED_EXTENSIONS: [&str; 6] = [".pdb", ".nuspec", ".xml", ".psmdcp", ".rels", ".p7s"];

/// Returns `true` if `entry` has a name and an allowed extension.
pub fn is_allowed(entry: &ArchiveEntry) -> bool {
    if entry.file_name().is_empty() {
        return false;
    }
    entry
        .extension
        .as_deref()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext))
}

/// Fail on the first entry that is not allowed.
pub fn check_entries(entries: &[ArchiveEntry]) -> Result<(), IndexError> {
    match entries.iter().find(|entry| !is_allowed(entry)) {
        Some(entry) => Err(IndexError::DisallowedEntry {
            path: entry.path.clone(),
            extension: entry.extension.clone(),
        }),
        None => Ok(()),
    }
}
