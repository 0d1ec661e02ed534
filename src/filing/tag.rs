//! Tag command - rename an entry in place so its name carries an identifier

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::config::IdPosition;
use crate::core::error::IdlinkError;
use crate::core::model::{Issue, ResultItem, ResultSet, SourceMode};
use crate::core::paths::{file_name_string, normalize_path};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::entry_meta;
use crate::ident::codec::{embed, extract, Identifier};

/// Rename `path` so that its name carries an identifier.
///
/// Entries that already carry one are left alone and returned as-is.
pub fn tag_path(
    path: &Path,
    explicit: Option<&Identifier>,
    position: IdPosition,
) -> Result<PathBuf, IdlinkError> {
    let metadata = fs::symlink_metadata(path)?;
    let name =
        file_name_string(path).ok_or_else(|| IdlinkError::NoFileName(path.to_path_buf()))?;

    let new_name = embed(
        &name,
        metadata.is_dir(),
        explicit.map(Identifier::as_str),
        position,
    );
    if new_name == name {
        return Ok(path.to_path_buf());
    }

    let target = path.with_file_name(&new_name);
    if target.exists() {
        return Err(IdlinkError::TargetExists(target));
    }

    fs::rename(path, &target)?;
    info!(from = %path.display(), to = %target.display(), "Tagged entry");
    Ok(target)
}

/// Run the tag command
pub fn run_tag(
    paths: &[PathBuf],
    explicit: Option<&str>,
    position: IdPosition,
    render: RenderConfig,
) -> Result<()> {
    let explicit = explicit.and_then(|s| {
        let id = Identifier::parse(s);
        if id.is_none() {
            warn!(id = s, "Not a valid identifier, generating a new one");
        }
        id
    });

    let mut result_set = ResultSet::new();
    for path in paths {
        let tagged = match tag_path(path, explicit.as_ref(), position) {
            Ok(p) => p,
            Err(e @ IdlinkError::TargetExists(_)) => {
                let mut item = ResultItem::error(Issue::new(e.code(), e.to_string()));
                item.input = Some(normalize_path(path));
                item.source_mode = SourceMode::Filing;
                result_set.push(item);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to tag {}", path.display()))
            }
        };
        let mut item = ResultItem::entry(normalize_path(&tagged), SourceMode::Filing)
            .with_meta(entry_meta(&tagged));
        item.input = Some(normalize_path(path));
        if let Some(id) = file_name_string(&tagged).as_deref().and_then(extract) {
            item = item.with_identifier(id.as_str());
        }
        result_set.push(item);
    }

    Renderer::new(render).print(&result_set);
    Ok(())
}
