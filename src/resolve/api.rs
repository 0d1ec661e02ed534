//! Resolve command

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::model::{Confidence, ResultItem, ResultSet};
use crate::core::paths::{expand_home, normalize_path};
use crate::core::render::{RenderConfig, Renderer};
use crate::ident::codec::extract;
use crate::resolve::cascade::{Resolution, Resolver, Stage};

/// Map a resolution outcome to a result item
pub fn resolution_item(input: &Path, resolution: &Resolution) -> ResultItem {
    let input_text = normalize_path(input);
    match resolution {
        Resolution::Found { path, stage } => {
            let file_name = path.file_name().map(|n| n.to_string_lossy());
            let mut item =
                ResultItem::resolved(input_text, normalize_path(path), stage.source_mode());
            if let Some(id) = file_name.as_deref().and_then(extract) {
                item = item.with_identifier(id.as_str());
            }
            // A store hit is the broadest search; several entries may share the identifier.
            if *stage == Stage::Store {
                item = item.with_confidence(Confidence::Medium);
            }
            item
        }
        Resolution::NotFound => ResultItem::not_found(input_text),
    }
}

/// Resolve each input path
pub fn resolve_paths(resolver: &Resolver<'_>, paths: &[PathBuf]) -> ResultSet {
    paths
        .iter()
        .map(|input| {
            let path = expand_home(input);
            resolution_item(input, &resolver.resolve(&path))
        })
        .collect()
}

/// Run the resolve command
pub fn run_resolve(config: &Config, paths: &[PathBuf], render: RenderConfig) -> Result<()> {
    let resolver = Resolver::new(config);
    let result_set = resolve_paths(&resolver, paths);
    Renderer::new(render).print(&result_set);
    Ok(())
}
