//! Segment-wise path reconstruction
//!
//! Walks a stale path from the root down. Components that still exist are
//! taken as-is; a missing component is looked up in the directory built so
//! far by the identifier embedded in its name. Recovers renamed directories
//! and files, not entries moved under a different parent.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::backends::search::{anchor_to, pick_candidate, SearchStrategy};
use crate::core::paths::{absolutize, extension_of, normalize_lexically};
use crate::ident::codec::extract;

/// Rebuild `path` component by component. `None` once any component is lost.
pub fn resolve_segments(path: &Path, search: &dyn SearchStrategy) -> Option<PathBuf> {
    let path = normalize_lexically(&absolutize(path));
    let mut building = PathBuf::new();

    for component in path.components() {
        let name = match component {
            Component::Prefix(_) | Component::RootDir => {
                building.push(component.as_os_str());
                continue;
            }
            Component::Normal(name) => name,
            Component::CurDir | Component::ParentDir => continue,
        };

        let direct = building.join(name);
        if direct.exists() {
            building = direct;
            continue;
        }

        let name = name.to_string_lossy();
        let Some(id) = extract(&name) else {
            debug!(component = %name, under = %building.display(), "Missing component has no identifier");
            return None;
        };

        let candidates = search.find_by_identifier(&building, &id, false);
        let expected_ext = extension_of(Path::new(name.as_ref()));
        let Some(found) = pick_candidate(&candidates, expected_ext.as_deref()) else {
            debug!(id = %id, under = %building.display(), "No entry carries the identifier");
            return None;
        };

        debug!(component = %name, found = %found.display(), "Recovered component by identifier");
        building = anchor_to(&building, found);
    }

    Some(building)
}
