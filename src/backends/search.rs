//! Search strategy seam
//!
//! Resolvers look entries up by identifier through `SearchStrategy`. The
//! concrete backend is chosen once, when a `Resolver` is built.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::backends::fd::FdSearch;
use crate::backends::walk::WalkSearch;
use crate::core::config::{Config, SearchBackend};
use crate::core::error::IdlinkError;
use crate::core::model::{ResultItem, ResultSet, SourceMode};
use crate::core::paths::{expand_home, extension_of, normalize_path};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::entry_meta;
use crate::ident::codec::Identifier;
use crate::ident::filter::is_eligible_path;

/// Finds directory entries whose name contains an identifier.
///
/// Results may be relative to `dir` or absolute, and come in whatever order
/// the backend produced them. A failing backend returns no results.
pub trait SearchStrategy {
    fn source_mode(&self) -> SourceMode;

    fn find_by_identifier(&self, dir: &Path, id: &Identifier, recursive: bool) -> Vec<PathBuf>;
}

/// Pick the search backend according to configuration
pub fn select_strategy(backend: SearchBackend) -> Box<dyn SearchStrategy> {
    match backend {
        SearchBackend::Walk => Box::new(WalkSearch),
        SearchBackend::Fd => match FdSearch::detect() {
            Some(fd) => Box::new(fd),
            None => {
                warn!("fd requested but not found in PATH, falling back to directory walk");
                Box::new(WalkSearch)
            }
        },
        SearchBackend::Auto => match FdSearch::detect() {
            Some(fd) => {
                debug!(program = fd.program(), "Using fd for identifier search");
                Box::new(fd)
            }
            None => {
                debug!("fd not found, using directory walk for identifier search");
                Box::new(WalkSearch)
            }
        },
    }
}

/// Choose one candidate: the first whose extension equals `expected_ext`,
/// else the first eligible candidate in result order.
pub fn pick_candidate(candidates: &[PathBuf], expected_ext: Option<&str>) -> Option<PathBuf> {
    let eligible: Vec<&PathBuf> = candidates.iter().filter(|p| is_eligible_path(p)).collect();

    if let Some(ext) = expected_ext {
        if let Some(hit) = eligible
            .iter()
            .find(|p| extension_of(p).as_deref() == Some(ext))
        {
            return Some((*hit).clone());
        }
    }

    if eligible.len() > 1 {
        debug!(
            count = eligible.len(),
            "Several entries share the identifier, taking the first"
        );
    }
    eligible.first().map(|p| (*p).clone())
}

/// Join a strategy result onto the directory it was searched in
pub fn anchor_to(dir: &Path, found: PathBuf) -> PathBuf {
    if found.is_absolute() {
        found
    } else {
        dir.join(found)
    }
}

/// Every entry carrying `id` in `dirs`, in backend order per directory
pub fn find_entries(
    search: &dyn SearchStrategy,
    id: &Identifier,
    dirs: &[PathBuf],
    recursive: bool,
) -> ResultSet {
    let mut result_set = ResultSet::new();
    for dir in dirs {
        for found in search.find_by_identifier(dir, id, recursive) {
            let path = anchor_to(dir, found);
            let item = ResultItem::entry(normalize_path(&path), search.source_mode())
                .with_identifier(id.as_str())
                .with_meta(entry_meta(&path));
            result_set.push(item);
        }
    }
    result_set
}

/// Run the find command
///
/// Without `--dir` the configured search directories are used, or the
/// current directory when none are configured.
pub fn run_find(
    config: &Config,
    id: &str,
    dir: Option<&Path>,
    recursive: bool,
    render: RenderConfig,
) -> Result<()> {
    let id =
        Identifier::parse(id).ok_or_else(|| IdlinkError::InvalidIdentifier(id.to_string()))?;
    let dirs = match dir {
        Some(d) => vec![expand_home(d)],
        None if config.search_dirs().is_empty() => vec![std::env::current_dir()?],
        None => config.search_dirs().to_vec(),
    };

    let search = select_strategy(config.search_backend);
    let result_set = find_entries(search.as_ref(), &id, &dirs, recursive);
    Renderer::new(render).print(&result_set);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_pick_prefers_extension() {
        let c = paths(&["ID--a.txt", "ID--b.md"]);
        assert_eq!(pick_candidate(&c, Some("md")), Some(PathBuf::from("ID--b.md")));
        assert_eq!(pick_candidate(&c, Some("txt")), Some(PathBuf::from("ID--a.txt")));
    }

    #[test]
    fn test_pick_falls_back_to_first() {
        let c = paths(&["ID--a.txt", "ID--b.md"]);
        assert_eq!(pick_candidate(&c, Some("pdf")), Some(PathBuf::from("ID--a.txt")));
        assert_eq!(pick_candidate(&c, None), Some(PathBuf::from("ID--a.txt")));
    }

    #[test]
    fn test_pick_skips_ineligible() {
        let c = paths(&["ID--a.md~", "ID--a.txt"]);
        assert_eq!(pick_candidate(&c, Some("md")), Some(PathBuf::from("ID--a.txt")));
        assert_eq!(pick_candidate(&paths(&["x.org~"]), None), None);
    }

    #[test]
    fn test_pick_empty() {
        assert_eq!(pick_candidate(&[], Some("md")), None);
    }

    #[test]
    fn test_anchor_to() {
        assert_eq!(anchor_to(Path::new("/a"), PathBuf::from("b/c")), PathBuf::from("/a/b/c"));
        assert_eq!(anchor_to(Path::new("/a"), PathBuf::from("/x")), PathBuf::from("/x"));
    }

    #[test]
    fn test_find_entries_shallow_and_recursive() {
        use std::fs;
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("20240101T120000--top.txt"), "").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/20240101T120000--deep.txt"), "").unwrap();
        let id = Identifier::parse("20240101T120000").unwrap();
        let dirs = vec![temp.path().to_path_buf()];

        let shallow = find_entries(&WalkSearch, &id, &dirs, false);
        assert_eq!(shallow.len(), 1);
        let deep = find_entries(&WalkSearch, &id, &dirs, true);
        assert_eq!(deep.len(), 2);
        assert!(deep
            .into_iter()
            .all(|item| item.identifier.as_deref() == Some("20240101T120000")));
    }

    #[test]
    fn test_select_walk() {
        let s = select_strategy(SearchBackend::Walk);
        assert_eq!(s.source_mode(), SourceMode::Walk);
    }
}
