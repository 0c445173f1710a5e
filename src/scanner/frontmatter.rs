//! Flat front-matter extraction
//!
//! Only `key: value` lines are understood. Nested YAML is not parsed: a
//! nested line that contains a colon becomes its own flat entry and list
//! items without a colon are ignored.

use indexmap::IndexMap;
use regex::Regex;

/// Parsed front-matter block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatterBlock {
    pub entries: IndexMap<String, String>,
    /// Byte offset just past the closing delimiter
    pub end: usize,
}

/// Extract the front-matter block at the start of `text`, if any
pub fn parse_front_matter(pattern: &Regex, text: &str) -> Option<FrontMatterBlock> {
    let caps = pattern.captures(text)?;
    let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
    let body = caps.get(1).map(|m| m.as_str()).unwrap_or("");

    let mut entries = IndexMap::new();
    for line in body.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        entries.insert(key.to_string(), unquote(value.trim()).to_string());
    }

    Some(FrontMatterBlock { entries, end })
}

/// Strip one matching pair of surrounding quotes
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&open), Some(&close))
            if bytes.len() >= 2 && open == close && (open == b'"' || open == b'\'') =>
        {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}
