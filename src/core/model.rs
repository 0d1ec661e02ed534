//! Unified Result Model
//!
//! Every command maps its outcome to this model before rendering output.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A path produced by the resolution cascade
    Resolved,
    /// A bare identifier (generated or extracted)
    Identifier,
    /// A name rewritten by embed/strip
    Name,
    /// A filesystem entry (scan, find, tag, store)
    Entry,
    /// A link found in a text file
    Link,
    /// A doctor check
    Check,
    Error,
}

/// Confidence level of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Source mode indicating how the result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Direct,
    Segment,
    Store,
    Fd,
    Walk,
    Codec,
    Filing,
    Passthrough,
    Doctor,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Modification time in milliseconds since epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime_ms: Option<i64>,

    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dir: Option<bool>,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub code: String,
    pub message: String,
}

impl Issue {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// The request this item answers (stale path, original name, link text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Resolved or discovered path, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// 1-indexed line number, for items found inside a text file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Human-readable text (new name, check message)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (e.g. the decomposed name of a scanned entry)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    pub confidence: Confidence,

    pub source_mode: SourceMode,

    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Issue>,
}

impl ResultItem {
    fn bare(kind: Kind, source_mode: SourceMode) -> Self {
        Self {
            kind,
            input: None,
            path: None,
            identifier: None,
            line: None,
            excerpt: None,
            data: None,
            confidence: Confidence::High,
            source_mode,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// A successfully resolved path
    pub fn resolved(
        input: impl Into<String>,
        path: impl Into<String>,
        source_mode: SourceMode,
    ) -> Self {
        let mut item = Self::bare(Kind::Resolved, source_mode);
        item.input = Some(input.into());
        item.path = Some(path.into());
        item
    }

    /// An identifier produced by the codec
    pub fn identifier(identifier: impl Into<String>) -> Self {
        let mut item = Self::bare(Kind::Identifier, SourceMode::Codec);
        item.identifier = Some(identifier.into());
        item
    }

    /// A name rewritten by the codec
    pub fn name(input: impl Into<String>, output: impl Into<String>) -> Self {
        let mut item = Self::bare(Kind::Name, SourceMode::Codec);
        item.input = Some(input.into());
        item.excerpt = Some(output.into());
        item
    }

    /// A filesystem entry
    pub fn entry(path: impl Into<String>, source_mode: SourceMode) -> Self {
        let mut item = Self::bare(Kind::Entry, source_mode);
        item.path = Some(path.into());
        item
    }

    /// A link found in a text file
    pub fn link(input: impl Into<String>, line: u32, source_mode: SourceMode) -> Self {
        let mut item = Self::bare(Kind::Link, source_mode);
        item.input = Some(input.into());
        item.line = Some(line);
        item
    }

    /// A doctor check line
    pub fn check(message: impl Into<String>) -> Self {
        let mut item = Self::bare(Kind::Check, SourceMode::Doctor);
        item.excerpt = Some(message.into());
        item
    }

    /// An error result
    pub fn error(error: Issue) -> Self {
        let mut item = Self::bare(Kind::Error, SourceMode::Codec);
        item.errors.push(error);
        item
    }

    /// The resolution cascade found nothing for `input`
    pub fn not_found(input: impl Into<String>) -> Self {
        let input = input.into();
        let mut item = Self::error(Issue::new(
            "NOT_FOUND",
            format!("could not resolve {}", input),
        ));
        item.input = Some(input);
        item.source_mode = SourceMode::Store;
        item
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_error(mut self, error: Issue) -> Self {
        self.errors.push(error);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Sort items by path for stable output; items without a path go last
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| !i.errors.is_empty())
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
