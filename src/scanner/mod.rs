//! Document scanner
//!
//! Turns the raw bytes of one document into a `DocumentRecord` in a single
//! pass. The scanner does no I/O and never fails: malformed or partial input
//! only produces zero or empty values.
//!
//! Scanning is line based and aware of fenced code blocks, so `#` comments
//! or pipe characters inside code samples are not mistaken for headings or
//! table rows.

mod frontmatter;
mod patterns;

pub use frontmatter::{parse_front_matter, FrontMatterBlock};
pub use patterns::Patterns;

use crate::models::{
    DocumentRecord, Link, LinkKind, SemanticHeading, StructuralCounts, TextMetrics,
};
use crate::similarity::fingerprint;

/// Headings deeper than this are clamped
pub const MAX_HEADING_DEPTH: u8 = 6;

/// Alt text shorter than this (after trimming) is not considered usable
pub const MIN_ALT_TEXT_CHARS: usize = 4;

/// Per-run scanning options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanOptions {
    /// Content beyond this many bytes is ignored
    pub max_bytes: usize,
    /// Multiplier for the token estimate (tokens per whitespace word)
    pub tokens_per_word: f64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_bytes: 2_000_000,
            tokens_per_word: 1.33,
        }
    }
}

/// Extracts `DocumentRecord`s from raw document bytes
#[derive(Debug, Clone)]
pub struct Scanner {
    patterns: Patterns,
    options: ScanOptions,
}

impl Scanner {
    pub fn new(patterns: Patterns, options: ScanOptions) -> Self {
        Self { patterns, options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan a document whose on-disk size equals `raw.len()`
    pub fn scan(&self, path: &str, raw: &[u8]) -> DocumentRecord {
        self.scan_sized(path, raw, raw.len() as u64)
    }

    /// Scan a document; `size_bytes` is the full file size, which may exceed
    /// the number of bytes actually read.
    pub fn scan_sized(&self, path: &str, raw: &[u8], size_bytes: u64) -> DocumentRecord {
        let path = normalize_separators(path);
        let directory = match path.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => String::new(),
        };

        let text = decode_truncated(raw, self.options.max_bytes);

        let words = text.split_whitespace().count();
        let metrics = TextMetrics {
            words,
            lines: text.matches('\n').count() + 1,
            chars: text.chars().count(),
            tokens_est: (words as f64 * self.options.tokens_per_word).ceil() as u64,
        };

        let front_matter = parse_front_matter(&self.patterns.front_matter, &text);
        let body_start = front_matter.as_ref().map(|fm| fm.end).unwrap_or(0);
        let body = text.get(body_start..).unwrap_or("");
        let body_scan = self.scan_body(body);

        let fingerprint = fingerprint(&text);
        let (front_matter_present, front_matter) = match front_matter {
            Some(block) => (true, block.entries),
            None => (false, Default::default()),
        };

        DocumentRecord {
            path,
            directory,
            size_bytes,
            text: metrics,
            structure: body_scan.structure,
            links: body_scan.links,
            front_matter_present,
            front_matter,
            semantic_headings: body_scan.semantic_headings,
            fingerprint,
            raw_text: text,
        }
    }

    fn scan_body(&self, body: &str) -> BodyScan {
        let p = &self.patterns;
        let mut scan = BodyScan::default();
        let counts = &mut scan.structure;

        // Info string of the currently open fence, if inside a code block
        let mut open_fence: Option<String> = None;

        for line in body.lines() {
            if let Some(caps) = p.fence.captures(line) {
                match open_fence.take() {
                    Some(info) => {
                        counts.code_blocks += 1;
                        if info.is_empty() {
                            counts.code_blocks_missing_language += 1;
                        }
                    }
                    None => {
                        let info = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                        open_fence = Some(info.to_string());
                    }
                }
                continue;
            }
            if open_fence.is_some() {
                continue;
            }

            if let Some(caps) = p.heading.captures(line) {
                let depth = caps
                    .get(1)
                    .map(|m| m.as_str().len())
                    .unwrap_or(1)
                    .min(MAX_HEADING_DEPTH as usize) as u8;
                counts.headings += 1;
                counts.max_heading_depth = counts.max_heading_depth.max(depth);
            }

            if let Some(caps) = p.semantic_heading.captures(line) {
                if let Ok(number) = caps[1].parse::<u64>() {
                    scan.semantic_headings.push(SemanticHeading {
                        number,
                        title: caps[2].trim().to_string(),
                    });
                }
            }

            if p.table_row.is_match(line) {
                counts.table_rows += 1;
            }

            for caps in p.image.captures_iter(line) {
                counts.images += 1;
                let alt = caps[1].trim();
                if alt.chars().count() < MIN_ALT_TEXT_CHARS {
                    counts.images_missing_alt += 1;
                }
            }

            for caps in p.link.captures_iter(line) {
                let Some(whole) = caps.get(0) else { continue };
                // `![alt](src)` is an image embed, counted above
                if whole.start() > 0 && line.as_bytes()[whole.start() - 1] == b'!' {
                    continue;
                }
                let raw = clean_link_target(&caps[2]);
                if raw.is_empty() {
                    continue;
                }
                scan.links.push(Link {
                    kind: LinkKind::classify(&raw),
                    raw,
                });
            }
        }

        if open_fence.is_some() {
            counts.unclosed_fence = true;
        }

        scan
    }
}

#[derive(Default)]
struct BodyScan {
    structure: StructuralCounts,
    links: Vec<Link>,
    semantic_headings: Vec<SemanticHeading>,
}

/// Decode at most `max_bytes` of `raw` as UTF-8, dropping undecodable bytes.
///
/// A multi-byte character cut by the cap is incomplete and is dropped along
/// with any other invalid sequence, so the result never ends mid-character.
pub fn decode_truncated(raw: &[u8], max_bytes: usize) -> String {
    let bytes = &raw[..raw.len().min(max_bytes)];
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Normalize a raw link target: trim, unwrap `<...>`, drop a trailing title
fn clean_link_target(inner: &str) -> String {
    let inner = inner.trim();
    if let Some(rest) = inner.strip_prefix('<') {
        if let Some((target, _)) = rest.split_once('>') {
            return target.trim().to_string();
        }
    }
    match inner.split_once(char::is_whitespace) {
        Some((target, _)) => target.to_string(),
        None => inner.to_string(),
    }
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Conformance of a document's semantic numbering, 0-100.
///
/// Full conformance needs more than two numbered headings in strictly
/// increasing order. Anything less scores 10 points per numbered heading,
/// capped below 100 so it is always reported.
pub fn semantic_conformance(headings: &[SemanticHeading]) -> u8 {
    if headings.is_empty() {
        return 0;
    }
    let increasing = headings.windows(2).all(|w| w[0].number < w[1].number);
    if headings.len() > 2 && increasing {
        100
    } else {
        (headings.len() * 10).min(90) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> Scanner {
        Scanner::new(
            Patterns::compile().expect("patterns compile"),
            ScanOptions::default(),
        )
    }

    const SAMPLE: &str = "---
status: active
type: guide
---
# Guide

## **1. Intro**

See [setup](setup.md) and [site](https://example.com) or [top](#guide).

![diagram of the flow](img/flow.png)
![x](img/x.png)

| a | b |
|---|---|
| 1 | 2 |

```bash
# not a heading
echo [x](not-a-link.md)
```

```
plain
```

## **2. Usage**

###### Deep
####### Deeper
";

    #[test]
    fn test_scan_sample_document() {
        let record = scanner().scan("docs\\guide.md", SAMPLE.as_bytes());

        assert_eq!(record.path, "docs/guide.md");
        assert_eq!(record.directory, "docs");
        assert_eq!(record.file_name(), "guide.md");
        assert!(record.front_matter_present);
        assert_eq!(record.front_matter.len(), 2);

        let s = record.structure;
        assert_eq!(s.headings, 5);
        assert_eq!(s.max_heading_depth, 6);
        assert_eq!(s.code_blocks, 2);
        assert_eq!(s.code_blocks_missing_language, 1);
        assert!(!s.unclosed_fence);
        assert_eq!(s.images, 2);
        assert_eq!(s.images_missing_alt, 1);
        assert_eq!(s.table_rows, 3);

        let raws: Vec<&str> = record.links.iter().map(|l| l.raw.as_str()).collect();
        assert_eq!(raws, vec!["setup.md", "https://example.com", "#guide"]);
        assert_eq!(record.count_links(LinkKind::Internal), 1);
        assert_eq!(record.count_links(LinkKind::External), 1);
        assert_eq!(record.count_links(LinkKind::Anchor), 1);

        assert_eq!(record.semantic_headings.len(), 2);
        assert_eq!(record.semantic_headings[1].title, "Usage");
    }

    #[test]
    fn test_empty_input() {
        let record = scanner().scan("empty.md", b"");
        assert_eq!(record.text.words, 0);
        assert_eq!(record.text.lines, 1);
        assert_eq!(record.structure, StructuralCounts::default());
        assert!(record.links.is_empty());
        assert!(!record.front_matter_present);
        assert_eq!(record.fingerprint, 0);
    }

    #[test]
    fn test_unclosed_fence_not_counted() {
        let text = "```rust\nfn main() {}\n```\n\n```python\nprint('dangling')\n";
        let record = scanner().scan("a.md", text.as_bytes());
        assert_eq!(record.structure.code_blocks, 1);
        assert!(record.structure.unclosed_fence);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let s = scanner();
        let first = s.scan("docs/guide.md", SAMPLE.as_bytes());
        let second = s.scan("docs/guide.md", SAMPLE.as_bytes());
        assert_eq!(first, second);
        assert_eq!(first.raw_text, second.raw_text);
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        // "é" is two bytes; a cap of 4 cuts the second one in half
        let text = decode_truncated("aéé".as_bytes(), 4);
        assert_eq!(text, "aé");
        assert_eq!(decode_truncated("abc".as_bytes(), 10), "abc");
    }

    #[test]
    fn test_invalid_bytes_are_dropped() {
        let text = decode_truncated(b"ok\xff\xfe then", 100);
        assert_eq!(text, "ok then");
    }

    #[test]
    fn test_max_bytes_limits_scan() {
        let s = Scanner::new(
            Patterns::compile().expect("patterns compile"),
            ScanOptions {
                max_bytes: 8,
                tokens_per_word: 1.0,
            },
        );
        let record = s.scan_sized("a.md", b"# Title\n[a](b.md)\n", 64);
        assert_eq!(record.size_bytes, 64);
        assert_eq!(record.structure.headings, 1);
        assert!(record.links.is_empty());
    }

    #[test]
    fn test_token_estimate_rounds_up() {
        let record = scanner().scan("a.md", b"one two three");
        assert_eq!(record.text.words, 3);
        assert_eq!(record.text.tokens_est, 4);
    }

    #[test]
    fn test_link_target_cleanup() {
        assert_eq!(clean_link_target(" guide.md \"Guide\" "), "guide.md");
        assert_eq!(clean_link_target("<my file.md>"), "my file.md");
        assert_eq!(clean_link_target(""), "");
    }

    #[test]
    fn test_semantic_conformance() {
        let h = |n: u64| SemanticHeading {
            number: n,
            title: format!("S{n}"),
        };
        assert_eq!(semantic_conformance(&[]), 0);
        assert_eq!(semantic_conformance(&[h(1), h(2)]), 20);
        assert_eq!(semantic_conformance(&[h(1), h(2), h(3)]), 100);
        assert_eq!(semantic_conformance(&[h(1), h(3), h(2)]), 30);
        assert_eq!(semantic_conformance(&[h(1), h(1), h(2)]), 30);
        let many: Vec<_> = (0..12).rev().map(h).collect();
        assert_eq!(semantic_conformance(&many), 90);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scan_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
                let record = scanner().scan("fuzz.md", &bytes);
                prop_assert!(record.raw_text.len() <= bytes.len());
                prop_assert!(record.structure.max_heading_depth <= MAX_HEADING_DEPTH);
                prop_assert!(record.structure.code_blocks_missing_language <= record.structure.code_blocks);
            }

            #[test]
            fn decode_stays_within_cap(text in "\\PC{0,64}", cap in 0usize..128) {
                let decoded = decode_truncated(text.as_bytes(), cap);
                prop_assert!(decoded.len() <= cap);
                prop_assert!(text.starts_with(&decoded));
            }
        }
    }
}
