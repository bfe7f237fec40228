// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Loading documentation trees from disk.
//!
//! Documentation is often split across several JSON files, one per module
//! or per generated batch. The loader reads each file as a [`DocTree`] and
//! merges them into a single tree so that cross-class lookups (such as the
//! shared `Titanium.Event` properties) see every class.

use crate::parser::{self, DocTree};
use snafu::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Error type for loading documentation files.
#[derive(Debug, Snafu)]
pub enum LoadError {
    /// A documentation file could not be read.
    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A documentation file is not a valid tree.
    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseFile {
        /// The file that failed.
        path: PathBuf,
        /// The underlying parse error.
        source: parser::ParseError,
    },
}

/// Collects all JSON files from the given inputs (files and directories).
///
/// Files are returned as given. Directories are walked recursively and
/// their `*.json` files returned in file-name order.
#[must_use]
pub fn collect_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Reads and parses a single documentation file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid tree.
pub fn load_file(path: &Path) -> Result<DocTree, LoadError> {
    let json = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
    parser::parse_tree(&json).context(ParseFileSnafu { path })
}

/// Loads every file and merges the trees in order.
///
/// A class defined in more than one file keeps its first position but takes
/// the definition from the last file.
///
/// # Errors
///
/// Returns the first read or parse failure.
pub fn load_tree(files: &[PathBuf]) -> Result<DocTree, LoadError> {
    let mut tree = DocTree::new();
    for path in files {
        let part = load_file(path)?;
        tracing::debug!(path = %path.display(), classes = part.len(), "loaded documentation");
        for (key, class) in part {
            if tree.insert(key.clone(), class).is_some() {
                tracing::warn!(
                    class = %key,
                    path = %path.display(),
                    "duplicate class definition, keeping the later one"
                );
            }
        }
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn collects_json_files_from_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.json", "{}");
        write(dir.path(), "a.json", "{}");
        write(dir.path(), "notes.txt", "ignored");
        write(dir.path(), "nested/c.json", "{}");

        let files = collect_input_files(&[dir.path().to_path_buf()]);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            [
                PathBuf::from("a.json"),
                PathBuf::from("b.json"),
                PathBuf::from("nested/c.json")
            ]
        );
    }

    #[test]
    fn passes_files_through() {
        let files = collect_input_files(&[PathBuf::from("does-not-exist.yml")]);

        assert_eq!(files, [PathBuf::from("does-not-exist.yml")]);
    }

    #[test]
    fn merges_trees_in_order() {
        let dir = TempDir::new().unwrap();
        let first = write(
            dir.path(),
            "first.json",
            r#"{
                "Titanium.UI": { "name": "Titanium.UI", "summary": "old" },
                "Titanium.App": { "name": "Titanium.App" }
            }"#,
        );
        let second = write(
            dir.path(),
            "second.json",
            r#"{
                "Titanium.Event": { "name": "Titanium.Event" },
                "Titanium.UI": { "name": "Titanium.UI", "summary": "new" }
            }"#,
        );

        let tree = load_tree(&[first, second]).unwrap();

        let keys: Vec<_> = tree.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["Titanium.UI", "Titanium.App", "Titanium.Event"]);
        assert_eq!(
            tree.get("Titanium.UI").unwrap().summary.as_deref(),
            Some("new")
        );
    }

    #[test]
    fn reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");

        let err = load_tree(&[missing]).unwrap_err();
        assert!(matches!(err, LoadError::ReadFile { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn reports_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "broken.json", "[1, 2, 3]");

        let err = load_tree(&[path]).unwrap_err();
        assert!(matches!(err, LoadError::ParseFile { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
