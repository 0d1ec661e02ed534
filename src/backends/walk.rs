//! Built-in directory walk, used when fd is unavailable
//!
//! Uses the ignore crate's walker with every filter turned off so that hidden
//! and git-ignored entries are found, same as `fd --hidden --no-ignore`.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::backends::search::SearchStrategy;
use crate::core::model::SourceMode;
use crate::ident::codec::Identifier;
use crate::ident::filter::is_eligible;

#[derive(Debug, Clone, Copy, Default)]
pub struct WalkSearch;

impl SearchStrategy for WalkSearch {
    fn source_mode(&self) -> SourceMode {
        SourceMode::Walk
    }

    fn find_by_identifier(&self, dir: &Path, id: &Identifier, recursive: bool) -> Vec<PathBuf> {
        let mut builder = WalkBuilder::new(dir);
        builder.standard_filters(false);
        if !recursive {
            builder.max_depth(Some(1));
        }

        let mut results = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };

            // Skip the search root itself
            if entry.depth() == 0 {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !is_eligible(&name) || !name.contains(id.as_str()) {
                continue;
            }
            results.push(entry.into_path());
        }

        debug!(
            dir = %dir.display(),
            id = %id,
            recursive,
            count = results.len(),
            "walk search finished"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn id() -> Identifier {
        Identifier::parse("20240101T120000").unwrap()
    }

    #[test]
    fn test_walk_shallow() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/20240101T120000--deep.org"), "").unwrap();
        fs::write(temp.path().join("20240101T120000--top.org"), "").unwrap();

        let results = WalkSearch.find_by_identifier(temp.path(), &id(), false);
        assert_eq!(results, vec![temp.path().join("20240101T120000--top.org")]);
    }

    #[test]
    fn test_walk_recursive() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/b/20240101T120000--deep.org"), "").unwrap();
        fs::write(temp.path().join("other.org"), "").unwrap();

        let results = WalkSearch.find_by_identifier(temp.path(), &id(), true);
        assert_eq!(results, vec![temp.path().join("a/b/20240101T120000--deep.org")]);
    }

    #[test]
    fn test_walk_filters_backups() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("20240101T120000--notes.org~"), "").unwrap();

        assert!(WalkSearch.find_by_identifier(temp.path(), &id(), true).is_empty());
    }

    #[test]
    fn test_walk_includes_hidden_and_dirs() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join(".hidden--20240101T120000")).unwrap();

        let results = WalkSearch.find_by_identifier(temp.path(), &id(), false);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_walk_missing_dir_is_empty() {
        let results =
            WalkSearch.find_by_identifier(Path::new("/definitely/not/here"), &id(), true);
        assert!(results.is_empty());
    }
}
