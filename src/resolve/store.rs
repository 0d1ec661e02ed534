//! Store-directory fallback
//!
//! Searches an ordered list of root directories recursively for the leaf's
//! identifier. A root that no longer exists is itself repaired with the
//! segment resolver first. The first root with a hit wins.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::backends::search::{anchor_to, pick_candidate, SearchStrategy};
use crate::core::paths::{extension_of, file_name_string};
use crate::ident::codec::{extract, Identifier};
use crate::resolve::segment::resolve_segments;

/// Look for the leaf of `path` under `dirs`
pub fn resolve_in_store(
    path: &Path,
    dirs: &[PathBuf],
    search: &dyn SearchStrategy,
) -> Option<PathBuf> {
    let leaf = file_name_string(path)?;
    let Some(id) = extract(&leaf) else {
        debug!(leaf = %leaf, "Leaf has no identifier, skipping store search");
        return None;
    };
    let ext = extension_of(path);
    find_identifier(&id, ext.as_deref(), dirs, search)
}

/// Recursive identifier lookup across `dirs`, in order
pub fn find_identifier(
    id: &Identifier,
    expected_ext: Option<&str>,
    dirs: &[PathBuf],
    search: &dyn SearchStrategy,
) -> Option<PathBuf> {
    for dir in dirs {
        let root = if dir.exists() {
            dir.clone()
        } else {
            match resolve_segments(dir, search) {
                Some(repaired) => {
                    debug!(dir = %dir.display(), repaired = %repaired.display(), "Repaired store directory");
                    repaired
                }
                None => {
                    debug!(dir = %dir.display(), "Store directory missing, skipping");
                    continue;
                }
            }
        };

        let candidates = search.find_by_identifier(&root, id, true);
        if let Some(found) = pick_candidate(&candidates, expected_ext) {
            return Some(anchor_to(&root, found));
        }
    }
    None
}
