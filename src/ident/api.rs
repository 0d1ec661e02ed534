//! Identifier commands: new, extract, embed, strip
//!
//! These operate on strings only and never touch the filesystem.

use anyhow::Result;
use tracing::warn;

use crate::core::config::IdPosition;
use crate::core::model::{Issue, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::ident::codec::{
    embed, extract, extract_with, generate, is_identifier, strip, INLINE_ID_RE,
};

fn print(item: ResultItem, render: RenderConfig) -> Result<()> {
    let result_set: ResultSet = std::iter::once(item).collect();
    Renderer::new(render).print(&result_set);
    Ok(())
}

/// Run `id new`
pub fn run_new(render: RenderConfig) -> Result<()> {
    print(ResultItem::identifier(generate().as_str()), render)
}

/// Extraction as a result item; a miss is reported, not raised
pub fn extract_item(text: &str, inline: bool) -> ResultItem {
    let found = if inline {
        extract_with(text, &INLINE_ID_RE)
    } else {
        extract(text)
    };
    match found {
        Some(id) => {
            let mut item = ResultItem::identifier(id.as_str());
            item.input = Some(text.to_string());
            item
        }
        None => {
            let mut item = ResultItem::error(Issue::new(
                "NO_IDENTIFIER",
                format!("no identifier in {:?}", text),
            ));
            item.input = Some(text.to_string());
            item
        }
    }
}

/// Run `id extract`
pub fn run_extract(text: &str, inline: bool, render: RenderConfig) -> Result<()> {
    print(extract_item(text, inline), render)
}

/// Run `id embed`
pub fn run_embed(
    name: &str,
    is_dir: bool,
    explicit: Option<&str>,
    position: IdPosition,
    render: RenderConfig,
) -> Result<()> {
    if let Some(id) = explicit.filter(|id| !is_identifier(id)) {
        warn!(id, "Not a valid identifier, generating a new one");
    }
    let output = embed(name, is_dir, explicit, position);
    let mut item = ResultItem::name(name, output.as_str());
    if let Some(id) = extract(&output) {
        item = item.with_identifier(id.as_str());
    }
    print(item, render)
}

/// Run `id strip`
pub fn run_strip(name: &str, render: RenderConfig) -> Result<()> {
    let mut item = ResultItem::name(name, strip(name));
    if let Some(id) = extract(name) {
        item = item.with_identifier(id.as_str());
    }
    print(item, render)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Kind;

    #[test]
    fn test_extract_item_found() {
        let item = extract_item("a--20240101T120000.txt", false);
        assert_eq!(item.kind, Kind::Identifier);
        assert_eq!(item.identifier.as_deref(), Some("20240101T120000"));
    }

    #[test]
    fn test_extract_item_inline() {
        let item = extract_item("20231231T000000 then id:20240101T120000", true);
        assert_eq!(item.identifier.as_deref(), Some("20240101T120000"));
    }

    #[test]
    fn test_extract_item_missing() {
        let item = extract_item("nothing here", false);
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors[0].code, "NO_IDENTIFIER");
    }
}
