//! Link parsing
//!
//! Recognizes two forms in text:
//! - bracket links: `[[type:target]]` or `[[type:target][description]]`
//! - inline identifier markers: `id:<identifier>`
//!
//! Inline markers inside a bracket link are not reported twice.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

use crate::ident::codec::INLINE_ID_RE;

/// Static regex for bracket links
/// Format: [[type:target]] or [[type:target][description]]
pub static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([A-Za-z][A-Za-z0-9+.-]*):([^\]]+)\](?:\[([^\]]*)\])?\]")
        .expect("Invalid LINK_RE regex")
});

/// A link found in a text file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Link type, e.g. `file` or `id`
    pub kind: String,

    pub target: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// 1-indexed line number
    pub line: u32,
}

impl Link {
    /// The target without a trailing `::search` option
    pub fn target_path(&self) -> &str {
        match self.target.find("::") {
            Some(idx) => &self.target[..idx],
            None => &self.target,
        }
    }

    /// Link text as written, without the description
    pub fn raw(&self) -> String {
        format!("{}:{}", self.kind, self.target)
    }
}

/// Parse links from content string
pub fn parse_content(content: &str) -> Vec<Link> {
    let mut links = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num as u32 + 1;
        let mut spans = Vec::new();

        for caps in LINK_RE.captures_iter(line) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            spans.push(whole.range());
            links.push(Link {
                kind: caps[1].to_string(),
                target: caps[2].to_string(),
                description: caps.get(3).map(|m| m.as_str().to_string()),
                line: line_num,
            });
        }

        for caps in INLINE_ID_RE.captures_iter(line) {
            let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if spans.iter().any(|s| s.contains(&whole.start())) {
                continue;
            }
            links.push(Link {
                kind: "id".to_string(),
                target: id.as_str().to_string(),
                description: None,
                line: line_num,
            });
        }
    }

    links
}

/// Parse links from a file
pub fn parse_file(path: &Path) -> Result<Vec<Link>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_content(&content))
}
