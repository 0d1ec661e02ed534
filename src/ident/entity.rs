//! Decomposition of a name into identifier, separator, stem and extension

use serde::Serialize;

use crate::core::config::IdPosition;
use crate::ident::codec::{extract, split_extension, strip, Identifier, HEAD_RE, TAIL_RE};

/// A file or directory name taken apart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,

    /// Where the identifier sits; `None` when absent or not at either end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<IdPosition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    pub stem: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl NamedEntity {
    pub fn parse(name: &str, is_dir: bool) -> Self {
        let (base, extension) = if is_dir {
            (name, None)
        } else {
            split_extension(name)
        };
        let extension = extension.map(str::to_string);

        if let Some(caps) = TAIL_RE.captures(base) {
            return Self {
                identifier: Identifier::parse(&caps[3]),
                position: Some(IdPosition::Tail),
                separator: Some(caps[2].to_string()),
                stem: caps[1].to_string(),
                extension,
            };
        }

        if let Some(caps) = HEAD_RE.captures(base) {
            return Self {
                identifier: Identifier::parse(&caps[1]),
                position: Some(IdPosition::Head),
                separator: Some(caps[2].to_string()),
                stem: caps[3].to_string(),
                extension,
            };
        }

        Self {
            identifier: extract(name),
            position: None,
            separator: None,
            stem: strip(base),
            extension,
        }
    }
}
