//! Store command - bring an entry into managed storage
//!
//! Storing is the moment an identifier is assigned: the entry lands in the
//! default store directory (or `--into`) with an identifier in its name.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::core::error::IdlinkError;
use crate::core::model::{Issue, ResultItem, ResultSet, SourceMode};
use crate::core::paths::{expand_home, file_name_string, normalize_path};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::entry_meta;
use crate::ident::codec::{embed, extract};

/// Move (or copy) `path` into `into` or the default store directory
pub fn store_entry(
    config: &Config,
    path: &Path,
    into: Option<&Path>,
    copy: bool,
) -> Result<PathBuf, IdlinkError> {
    let root = match into {
        Some(dir) => expand_home(dir),
        None => config
            .default_store()
            .map(Path::to_path_buf)
            .ok_or(IdlinkError::NoStoreDir)?,
    };

    let metadata = fs::metadata(path)?;
    let is_dir = metadata.is_dir();
    if copy && is_dir {
        return Err(IdlinkError::CopyDirectory(path.to_path_buf()));
    }

    let name =
        file_name_string(path).ok_or_else(|| IdlinkError::NoFileName(path.to_path_buf()))?;
    let target = root.join(embed(&name, is_dir, None, config.id_position));
    if target.exists() {
        return Err(IdlinkError::TargetExists(target));
    }

    fs::create_dir_all(&root)?;

    if copy {
        fs::copy(path, &target)?;
    } else if let Err(e) = fs::rename(path, &target) {
        if is_dir || !is_cross_device(&e) {
            return Err(e.into());
        }
        debug!(error = %e, "rename crosses filesystems, copying instead");
        move_by_copy(path, &target)?;
    }

    info!(from = %path.display(), to = %target.display(), copy, "Stored entry");
    Ok(target)
}

/// EXDEV: rename(2) cannot move an entry to another filesystem
fn is_cross_device(err: &io::Error) -> bool {
    const EXDEV: i32 = 18;
    err.raw_os_error() == Some(EXDEV)
}

/// Copy `from` to `to`, then delete `from`. The copy is undone if `from`
/// cannot be deleted, so the entry never ends up in both places.
fn move_by_copy(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    if let Err(e) = fs::remove_file(from) {
        if let Err(cleanup) = fs::remove_file(to) {
            warn!(target = %to.display(), error = %cleanup, "Failed to remove copied entry");
        }
        return Err(e);
    }
    Ok(())
}

/// Run the store command
pub fn run_store(
    config: &Config,
    paths: &[PathBuf],
    into: Option<&Path>,
    copy: bool,
    render: RenderConfig,
) -> Result<()> {
    let mut result_set = ResultSet::new();
    for path in paths {
        let stored = match store_entry(config, path, into, copy) {
            Ok(p) => p,
            Err(e @ IdlinkError::TargetExists(_)) => {
                let mut item = ResultItem::error(Issue::new(e.code(), e.to_string()));
                item.input = Some(normalize_path(path));
                item.source_mode = SourceMode::Filing;
                result_set.push(item);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to store {}", path.display()))
            }
        };
        let mut item = ResultItem::entry(normalize_path(&stored), SourceMode::Filing)
            .with_meta(entry_meta(&stored));
        item.input = Some(normalize_path(path));
        if let Some(id) = file_name_string(&stored).as_deref().and_then(extract) {
            item = item.with_identifier(id.as_str());
        }
        result_set.push(item);
    }

    Renderer::new(render).print(&result_set);
    Ok(())
}
