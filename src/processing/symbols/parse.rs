// src/processing/symbols/parse.rs

use crate::constants::SYMBOL_KINDS;
use serde::Deserialize;

/// A symbol reported by the tagger, reduced to what the payload needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Path exactly as the tagger printed it.
    pub path: String,
    /// Symbol kind, e.g. `function`.
    pub kind: String,
    /// Symbol name.
    pub name: String,
}

#[derive(Deserialize)]
struct RawTag {
    #[serde(rename = "_type")]
    record_type: Option<String>,
    path: Option<String>,
    name: Option<String>,
    kind: Option<String>,
}

/// Parses one JSON line of tagger output.
///
/// Returns `None` for blank or malformed lines, non-tag records (such as
/// `ptag` headers) and tags missing a path, name or kind.
///
/// ```
/// use sential::processing::symbols::parse_tag_line;
///
/// let line = r#"{"_type": "tag", "name": "App", "path": "/repo/app.py", "kind": "class", "line": 3}"#;
/// let tag = parse_tag_line(line).unwrap();
/// assert_eq!((tag.kind.as_str(), tag.name.as_str()), ("class", "App"));
///
/// assert!(parse_tag_line("ctags: Warning: cannot open input file").is_none());
/// ```
pub fn parse_tag_line(line: &str) -> Option<Tag> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let raw: RawTag = serde_json::from_str(line).ok()?;
    if raw.record_type.as_deref().is_some_and(|t| t != "tag") {
        return None;
    }
    let path = raw.path.filter(|p| !p.is_empty())?;
    let name = raw.name.filter(|n| !n.is_empty())?;
    let kind = raw.kind.filter(|k| !k.is_empty())?;
    Some(Tag { path, kind, name })
}

/// True if symbols of `kind` are kept in source records.
pub fn is_admitted_kind(kind: &str) -> bool {
    SYMBOL_KINDS.contains(&kind)
}

/// Renders a tag as one `"<kind> <name>"` line.
pub fn format_tag(tag: &Tag) -> String {
    format!("{} {}", tag.kind, tag.name)
}
