//! Resolution cascade
//!
//! Stages run in a fixed order and the first one that produces a path wins:
//! direct existence, segment-wise reconstruction, store-directory search.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::backends::search::{select_strategy, SearchStrategy};
use crate::core::config::Config;
use crate::core::model::SourceMode;
use crate::core::paths::{absolutize, normalize_lexically};
use crate::ident::codec::Identifier;
use crate::resolve::segment::resolve_segments;
use crate::resolve::store::{find_identifier, resolve_in_store};

/// One step of the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Direct,
    Segment,
    Store,
}

impl Stage {
    pub const ORDER: [Stage; 3] = [Stage::Direct, Stage::Segment, Stage::Store];

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Direct => Some(Stage::Segment),
            Stage::Segment => Some(Stage::Store),
            Stage::Store => None,
        }
    }

    pub fn source_mode(self) -> SourceMode {
        match self {
            Stage::Direct => SourceMode::Direct,
            Stage::Segment => SourceMode::Segment,
            Stage::Store => SourceMode::Store,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CascadeState {
    Untried,
    Trying(Stage),
    Found(PathBuf, Stage),
    Exhausted,
}

/// Outcome of a resolution request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found { path: PathBuf, stage: Stage },
    NotFound,
}

impl Resolution {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Resolution::Found { path, .. } => Some(path),
            Resolution::NotFound => None,
        }
    }
}

/// Resolves stale paths against a fixed configuration and search backend
pub struct Resolver<'a> {
    config: &'a Config,
    search: Box<dyn SearchStrategy>,
}

impl<'a> Resolver<'a> {
    /// Build a resolver, probing for the configured search backend once
    pub fn new(config: &'a Config) -> Self {
        Self::with_strategy(config, select_strategy(config.search_backend))
    }

    pub fn with_strategy(config: &'a Config, search: Box<dyn SearchStrategy>) -> Self {
        Self { config, search }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn search(&self) -> &dyn SearchStrategy {
        self.search.as_ref()
    }

    fn attempt(&self, stage: Stage, path: &Path) -> Option<PathBuf> {
        match stage {
            Stage::Direct => path.exists().then(|| absolutize(path)),
            Stage::Segment => resolve_segments(path, self.search()),
            Stage::Store => resolve_in_store(path, self.config.search_dirs(), self.search()),
        }
    }

    /// Turn a possibly stale path into a live one
    pub fn resolve(&self, path: &Path) -> Resolution {
        // An empty path is malformed input
        if path.as_os_str().is_empty() {
            return Resolution::NotFound;
        }

        let mut state = CascadeState::Untried;
        loop {
            state = match state {
                CascadeState::Untried => CascadeState::Trying(Stage::ORDER[0]),
                CascadeState::Trying(stage) => match self.attempt(stage, path) {
                    Some(found) => CascadeState::Found(normalize_lexically(&found), stage),
                    None => {
                        debug!(path = %path.display(), ?stage, "Stage found nothing");
                        match stage.next() {
                            Some(next) => CascadeState::Trying(next),
                            None => CascadeState::Exhausted,
                        }
                    }
                },
                CascadeState::Found(found, stage) => {
                    debug!(path = %path.display(), found = %found.display(), ?stage, "Resolved");
                    return Resolution::Found { path: found, stage };
                }
                CascadeState::Exhausted => return Resolution::NotFound,
            };
        }
    }

    /// Find an entry by bare identifier in the search directories
    pub fn resolve_identifier(&self, id: &Identifier, expected_ext: Option<&str>) -> Resolution {
        match find_identifier(id, expected_ext, self.config.search_dirs(), self.search()) {
            Some(path) => Resolution::Found {
                path: normalize_lexically(&path),
                stage: Stage::Store,
            },
            None => Resolution::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::walk::WalkSearch;
    use std::fs;
    use tempfile::tempdir;

    fn resolver(config: &Config) -> Resolver<'_> {
        Resolver::with_strategy(config, Box::new(WalkSearch))
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::ORDER[0], Stage::Direct);
        assert_eq!(Stage::Direct.next(), Some(Stage::Segment));
        assert_eq!(Stage::Segment.next(), Some(Stage::Store));
        assert_eq!(Stage::Store.next(), None);
    }

    #[test]
    fn test_direct_hit() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, "").unwrap();

        let config = Config::default();
        assert_eq!(
            resolver(&config).resolve(&file),
            Resolution::Found {
                path: file,
                stage: Stage::Direct
            }
        );
    }

    #[test]
    fn test_empty_path_is_not_found() {
        let config = Config::default();
        assert_eq!(resolver(&config).resolve(Path::new("")), Resolution::NotFound);
    }

    #[test]
    fn test_segment_hit_after_rename() {
        let temp = tempdir().unwrap();
        let new = temp.path().join("20240101T120000--final-report.pdf");
        fs::write(&new, "").unwrap();

        let config = Config::default();
        let stale = temp.path().join("20240101T120000--report.pdf");
        assert_eq!(
            resolver(&config).resolve(&stale),
            Resolution::Found {
                path: new,
                stage: Stage::Segment
            }
        );
    }

    #[test]
    fn test_store_hit_after_move() {
        let temp = tempdir().unwrap();
        let archive = temp.path().join("archive");
        fs::create_dir_all(archive.join("sub")).unwrap();
        let moved = archive.join("sub/20240101T120000--report.pdf");
        fs::write(&moved, "").unwrap();

        let config = Config::default().with_store_dirs(vec![archive]);
        let stale = temp.path().join("inbox/20240101T120000--report.pdf");
        let resolution = resolver(&config).resolve(&stale);
        assert_eq!(
            resolution,
            Resolution::Found {
                path: moved.clone(),
                stage: Stage::Store
            }
        );
        assert_eq!(resolution.path(), Some(moved.as_path()));
    }

    #[test]
    fn test_stripped_identifier_is_not_found() {
        let temp = tempdir().unwrap();
        let archive = temp.path().join("archive");
        fs::create_dir_all(&archive).unwrap();
        fs::write(archive.join("report.pdf"), "").unwrap();

        let config = Config::default().with_store_dirs(vec![archive]);
        let stale = temp.path().join("inbox/20240101T120000--report.pdf");
        assert_eq!(resolver(&config).resolve(&stale), Resolution::NotFound);
    }

    #[test]
    fn test_search_dirs_override_store_dirs() {
        let temp = tempdir().unwrap();
        let store = temp.path().join("store");
        let extra = temp.path().join("extra");
        fs::create_dir_all(&store).unwrap();
        fs::create_dir_all(&extra).unwrap();
        fs::write(extra.join("20240101T120000--x.txt"), "").unwrap();

        let config = Config::default()
            .with_store_dirs(vec![store])
            .with_search_dirs(vec![extra.clone()]);
        let stale = Path::new("/nowhere/20240101T120000--x.txt");
        assert_eq!(
            resolver(&config).resolve(stale).path(),
            Some(extra.join("20240101T120000--x.txt").as_path())
        );
    }

    #[test]
    fn test_resolve_identifier() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("20240101T120000--a.txt"), "").unwrap();

        let config = Config::default().with_store_dirs(vec![temp.path().to_path_buf()]);
        let id = Identifier::parse("20240101T120000").unwrap();
        let r = resolver(&config);
        assert_eq!(
            r.resolve_identifier(&id, None).path(),
            Some(temp.path().join("20240101T120000--a.txt").as_path())
        );

        let other = Identifier::parse("20991231T235959").unwrap();
        assert_eq!(r.resolve_identifier(&other, None), Resolution::NotFound);
    }
}
