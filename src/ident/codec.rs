//! Identifier codec
//!
//! Identifiers come in two shapes:
//! - `YYYYMMDDTHHMMSS`, optionally followed by `==` and an alphanumeric signature
//! - a legacy run of 12 digits with no separators
//!
//! Both are recognized anywhere in a name. Embedding produces `--` as the
//! separator; stripping also accepts a single `-`.

use chrono::{DateTime, Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::IdPosition;

/// Unanchored identifier pattern. The legacy alternative matches any run of
/// 12 digits; this is kept loose so existing names keep resolving.
pub const ID_PATTERN: &str = r"\d{8}T\d{6}(?:==[A-Za-z0-9]*)?|\d{12}";

/// Canonical separator produced by `embed`
pub const SEPARATOR: &str = "--";

const TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

pub static ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(ID_PATTERN).expect("Invalid ID_RE regex"));

static ID_EXACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^(?:{})$", ID_PATTERN)).expect("Invalid ID_EXACT_RE regex")
});

/// Inline marker in free text: `id:<identifier>`
pub static INLINE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\bid:({})", ID_PATTERN)).expect("Invalid INLINE_ID_RE regex")
});

/// `<stem><sep><id>` with the identifier at the very end
pub(crate) static TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^(.*?)(--|-)({})$", ID_PATTERN)).expect("Invalid TAIL_RE regex")
});

/// `<id><sep><rest>` with the identifier at the very start
pub(crate) static HEAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^({})(--|-)(.*)$", ID_PATTERN)).expect("Invalid HEAD_RE regex")
});

/// A timestamp-derived identifier embedded in a file or directory name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Accept `s` only if the whole string is an identifier
    pub fn parse(s: &str) -> Option<Self> {
        if is_identifier(s) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether the whole of `s` is a valid identifier
pub fn is_identifier(s: &str) -> bool {
    ID_EXACT_RE.is_match(s)
}

/// Generate an identifier from the current local time
pub fn generate() -> Identifier {
    generate_at(&Local::now())
}

/// Generate an identifier for a given instant (second granularity)
pub fn generate_at<Tz>(time: &DateTime<Tz>) -> Identifier
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    Identifier(time.format(TIME_FORMAT).to_string())
}

/// First identifier in `text`, using the default pattern
pub fn extract(text: &str) -> Option<Identifier> {
    ID_RE.find(text).map(|m| Identifier(m.as_str().to_string()))
}

/// First identifier in `text` using a caller-supplied pattern.
///
/// If the pattern has a capture group, group 1 is taken as the identifier;
/// otherwise the whole match is.
pub fn extract_with(text: &str, pattern: &Regex) -> Option<Identifier> {
    let caps = pattern.captures(text)?;
    let m = caps.get(1).or_else(|| caps.get(0))?;
    Some(Identifier(m.as_str().to_string()))
}

/// Split `name` into stem and extension (without the dot).
///
/// A leading dot does not start an extension, so `.profile` has none.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Embed an identifier into `name`.
///
/// Names that already carry an identifier are returned unchanged. `explicit`
/// is used when it is itself a valid identifier; otherwise a fresh one is
/// generated.
pub fn embed(name: &str, is_dir: bool, explicit: Option<&str>, position: IdPosition) -> String {
    if extract(name).is_some() {
        return name.to_string();
    }

    let id = explicit
        .and_then(Identifier::parse)
        .unwrap_or_else(generate);

    if name.is_empty() {
        return id.0;
    }

    match position {
        IdPosition::Head => format!("{}{}{}", id, SEPARATOR, name),
        IdPosition::Tail if is_dir => format!("{}{}{}", name, SEPARATOR, id),
        IdPosition::Tail => match split_extension(name) {
            (stem, Some(ext)) => format!("{}{}{}.{}", stem, SEPARATOR, id, ext),
            (stem, None) => format!("{}{}{}", stem, SEPARATOR, id),
        },
    }
}

/// Remove the identifier and its adjoining separator from `name`,
/// keeping any extension.
pub fn strip(name: &str) -> String {
    if let (stem, Some(ext)) = split_extension(name) {
        if let Some(caps) = TAIL_RE.captures(stem) {
            return format!("{}.{}", &caps[1], ext);
        }
    }
    if let Some(caps) = TAIL_RE.captures(name) {
        return caps[1].to_string();
    }
    if let Some(caps) = HEAD_RE.captures(name) {
        return caps[3].to_string();
    }
    // Malformed placement: drop the identifier text only.
    ID_RE.replace(name, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "20240101T120000";

    #[test]
    fn test_generate_shape() {
        let id = generate();
        assert!(is_identifier(id.as_str()));
        assert_eq!(id.as_str().len(), 15);
        assert_eq!(&id.as_str()[8..9], "T");
    }

    #[test]
    fn test_generate_at() {
        let time = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(generate_at(&time).as_str(), "20240309T070501");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier(ID));
        assert!(is_identifier("20240101T120000==a1B2"));
        assert!(is_identifier("20240101T120000=="));
        assert!(is_identifier("202401011200"));
        assert!(!is_identifier("2024-01-01"));
        assert!(!is_identifier("20240101T12000"));
        assert!(!is_identifier("x20240101T120000"));
    }

    #[test]
    fn test_extract() {
        assert_eq!(extract("notes--20240101T120000.org").unwrap().as_str(), ID);
        assert_eq!(
            extract("20240101T120000==sig--notes").unwrap().as_str(),
            "20240101T120000==sig"
        );
        assert_eq!(extract("old-202401011200.txt").unwrap().as_str(), "202401011200");
        assert!(extract("plain-name.txt").is_none());
        assert!(extract("").is_none());
    }

    #[test]
    fn test_extract_legacy_false_positive_is_kept() {
        // Any 12-digit run counts as a legacy identifier.
        assert_eq!(extract("invoice-123456789012.pdf").unwrap().as_str(), "123456789012");
    }

    #[test]
    fn test_extract_with_inline_marker() {
        let line = "see id:20240101T120000 and 20231231T235959";
        assert_eq!(extract_with(line, &INLINE_ID_RE).unwrap().as_str(), ID);
        assert!(extract_with("valid:20240101T120000", &INLINE_ID_RE).is_none());
        assert!(extract_with("no marker here", &INLINE_ID_RE).is_none());
    }

    #[test]
    fn test_extract_with_whole_match() {
        let re = Regex::new(r"\d{8}T\d{6}").unwrap();
        assert_eq!(extract_with("a 20240101T120000==x", &re).unwrap().as_str(), ID);
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("report.pdf"), ("report", Some("pdf")));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", Some("gz")));
        assert_eq!(split_extension(".profile"), (".profile", None));
        assert_eq!(split_extension("trailing."), ("trailing.", None));
        assert_eq!(split_extension("dir"), ("dir", None));
    }

    #[test]
    fn test_embed_tail_file() {
        let out = embed("report.pdf", false, Some(ID), IdPosition::Tail);
        assert_eq!(out, "report--20240101T120000.pdf");
    }

    #[test]
    fn test_embed_tail_dir() {
        let out = embed("projects.2024", true, Some(ID), IdPosition::Tail);
        assert_eq!(out, "projects.2024--20240101T120000");
    }

    #[test]
    fn test_embed_tail_no_extension() {
        let out = embed("README", false, Some(ID), IdPosition::Tail);
        assert_eq!(out, "README--20240101T120000");
    }

    #[test]
    fn test_embed_head() {
        let out = embed("report.pdf", false, Some(ID), IdPosition::Head);
        assert_eq!(out, "20240101T120000--report.pdf");
        let out = embed("projects", true, Some(ID), IdPosition::Head);
        assert_eq!(out, "20240101T120000--projects");
    }

    #[test]
    fn test_embed_invalid_explicit_generates() {
        let out = embed("a.txt", false, Some("not-an-id"), IdPosition::Tail);
        assert!(extract(&out).is_some());
        assert!(!out.contains("not-an-id"));
    }

    #[test]
    fn test_embed_is_idempotent() {
        for position in [IdPosition::Head, IdPosition::Tail] {
            for (name, is_dir) in [("report.pdf", false), ("projects", true), ("x", false)] {
                let once = embed(name, is_dir, None, position);
                let twice = embed(&once, is_dir, None, position);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_embed_keeps_existing_identifier() {
        let name = "old-202401011200.txt";
        assert_eq!(embed(name, false, Some(ID), IdPosition::Head), name);
    }

    #[test]
    fn test_embed_then_extract() {
        for position in [IdPosition::Head, IdPosition::Tail] {
            let out = embed("notes.org", false, None, position);
            assert!(extract(&out).is_some());
        }
    }

    #[test]
    fn test_strip_tail() {
        assert_eq!(strip("report--20240101T120000.pdf"), "report.pdf");
        assert_eq!(strip("report-20240101T120000.pdf"), "report.pdf");
        assert_eq!(strip("projects--20240101T120000"), "projects");
        assert_eq!(strip("a-b--20240101T120000==sig.md"), "a-b.md");
        assert_eq!(strip("v1.2--20240101T120000"), "v1.2");
    }

    #[test]
    fn test_strip_head() {
        assert_eq!(strip("20240101T120000--report.pdf"), "report.pdf");
        assert_eq!(strip("202401011200-report.pdf"), "report.pdf");
        assert_eq!(strip("20240101T120000==ab--projects"), "projects");
    }

    #[test]
    fn test_strip_elsewhere() {
        assert_eq!(
            strip("before_20240101T120000_after.txt"),
            "before__after.txt"
        );
    }

    #[test]
    fn test_strip_without_identifier() {
        assert_eq!(strip("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_strip_embed_roundtrip_keeps_extension() {
        for position in [IdPosition::Head, IdPosition::Tail] {
            for name in ["report.pdf", "notes.org", "README", "archive.tar.gz"] {
                let stripped = strip(&embed(name, false, None, position));
                assert_eq!(stripped, name);
                assert!(extract(&stripped).is_none());
            }
        }
    }

    #[test]
    fn test_identifier_serde_transparent() {
        let id = Identifier::parse(ID).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"20240101T120000\"");
        assert_eq!(id.to_string(), ID);
    }
}
