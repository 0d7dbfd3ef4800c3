//! Locates assertion-bearing source files for the directory form of the
//! CLI's source argument.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Resolve `path` to the list of files to check. A file is returned as-is;
/// a directory is searched recursively for `.java` files, sorted so runs
/// are deterministic. Unreadable entries are silently skipped.
pub fn collect_assertion_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.extension().is_some_and(|ext| ext == "java"))
        .collect();
    files.sort();
    files
}
