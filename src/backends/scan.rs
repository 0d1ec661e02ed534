//! Scan store directories for entries that carry an identifier

use anyhow::Result;
use ignore::WalkBuilder;
use std::path::PathBuf;

use crate::core::model::{ResultItem, ResultSet, SourceMode};
use crate::core::paths::normalize_path;
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::entry_meta;
use crate::ident::codec::extract;
use crate::ident::entity::NamedEntity;
use crate::ident::filter::is_eligible;

/// Scan `dirs` and emit one item per identified entry
pub fn scan_identified(
    dirs: &[PathBuf],
    max_depth: Option<usize>,
    hidden: bool,
) -> Result<ResultSet> {
    let mut result_set = ResultSet::new();

    for dir in dirs {
        let mut builder = WalkBuilder::new(dir);
        builder.standard_filters(false).hidden(!hidden);
        if let Some(depth) = max_depth {
            builder.max_depth(Some(depth));
        }

        for entry in builder.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            if entry.depth() == 0 {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !is_eligible(&name) {
                continue;
            }
            let Some(id) = extract(&name) else {
                continue;
            };

            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let entity = NamedEntity::parse(&name, is_dir);

            let item = ResultItem::entry(normalize_path(path), SourceMode::Walk)
                .with_identifier(id.as_str())
                .with_data(serde_json::to_value(&entity)?)
                .with_meta(entry_meta(path));
            result_set.push(item);
        }
    }

    result_set.sort();
    Ok(result_set)
}

/// Run the scan command
pub fn run_scan(
    dirs: &[PathBuf],
    max_depth: Option<usize>,
    hidden: bool,
    render: RenderConfig,
) -> Result<()> {
    let result_set = scan_identified(dirs, max_depth, hidden)?;
    Renderer::new(render).print(&result_set);
    Ok(())
}
