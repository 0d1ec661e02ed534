//! Links command - resolve every link in a text file

use anyhow::Result;
use std::path::Path;

use crate::core::config::Config;
use crate::core::model::{Confidence, Issue, ResultItem, ResultSet, SourceMode};
use crate::core::paths::{absolutize, expand_home, normalize_path};
use crate::core::render::{RenderConfig, Renderer};
use crate::ident::codec::Identifier;
use crate::links::parse::{parse_file, Link};
use crate::resolve::cascade::{Resolution, Resolver};

/// What happened to a single link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Link type is not configured for resolution
    PassThrough,
    Resolved(Resolution),
}

/// Resolve one link. Relative file targets are taken relative to `base_dir`.
pub fn resolve_link(resolver: &Resolver<'_>, link: &Link, base_dir: &Path) -> LinkOutcome {
    if !resolver.config().resolves_link_type(&link.kind) {
        return LinkOutcome::PassThrough;
    }

    if link.kind == "id" {
        let resolution = match Identifier::parse(link.target_path()) {
            Some(id) => resolver.resolve_identifier(&id, None),
            None => Resolution::NotFound,
        };
        return LinkOutcome::Resolved(resolution);
    }

    if link.target_path().is_empty() {
        return LinkOutcome::Resolved(Resolution::NotFound);
    }

    let target = expand_home(Path::new(link.target_path()));
    let target = if target.is_absolute() {
        target
    } else {
        base_dir.join(target)
    };
    LinkOutcome::Resolved(resolver.resolve(&target))
}

/// Map a link and its outcome to a result item
pub fn link_item(link: &Link, outcome: &LinkOutcome) -> ResultItem {
    let mut item = match outcome {
        LinkOutcome::PassThrough => ResultItem::link(link.raw(), link.line, SourceMode::Passthrough)
            .with_confidence(Confidence::Low),
        LinkOutcome::Resolved(Resolution::Found { path, stage }) => {
            let item = ResultItem::link(link.raw(), link.line, stage.source_mode())
                .with_path(normalize_path(path));
            if stage.source_mode() == SourceMode::Direct {
                item
            } else {
                item.with_confidence(Confidence::Medium)
            }
        }
        LinkOutcome::Resolved(Resolution::NotFound) => {
            ResultItem::link(link.raw(), link.line, SourceMode::Store).with_error(Issue::new(
                "NOT_FOUND",
                format!("could not resolve {}", link.raw()),
            ))
        }
    };
    item.excerpt = link.description.clone();
    item
}

/// Parse and resolve all links in `file`
pub fn collect_links(resolver: &Resolver<'_>, file: &Path) -> Result<ResultSet> {
    let file = absolutize(file);
    let links = parse_file(&file)?;
    let base_dir = file.parent().unwrap_or_else(|| Path::new("/"));

    Ok(links
        .iter()
        .map(|link| link_item(link, &resolve_link(resolver, link, base_dir)))
        .collect())
}

/// Run the links command
pub fn run_links(config: &Config, file: &Path, render: RenderConfig) -> Result<()> {
    let resolver = Resolver::new(config);
    let result_set = collect_links(&resolver, file)?;
    Renderer::new(render).print(&result_set);
    Ok(())
}
