//! CSV reporter
//!
//! One row of `FileMetrics` per document, in path order. Fields are quoted
//! per RFC 4180 only when needed; key lists are joined with `;`.

use crate::models::FileMetrics;
use crate::pipeline::AuditOutcome;
use anyhow::Result;

/// Column order of the per-file table
pub const COLUMNS: &[&str] = &[
    "file",
    "directory",
    "size_bytes",
    "words",
    "lines",
    "chars",
    "tokens_est",
    "headings",
    "max_heading_depth",
    "images",
    "images_missing_alt",
    "tables_rows",
    "code_blocks",
    "code_blocks_missing_language",
    "links_total",
    "links_internal",
    "links_external",
    "links_broken",
    "front_matter_present",
    "front_matter_completeness_pct",
    "front_matter_missing_keys",
    "front_matter_suggested_keys_missing",
    "front_matter_status",
    "front_matter_type",
    "semantic_headings_count",
    "semantic_conformance_pct",
    "commit_count",
    "last_commit_iso",
    "stale",
    "simhash",
];

/// Render per-file metrics as CSV
pub fn render(outcome: &AuditOutcome) -> Result<String> {
    Ok(render_rows(&outcome.files))
}

pub fn render_rows(rows: &[FileMetrics]) -> String {
    let mut out = String::new();
    out.push_str(&COLUMNS.join(","));
    out.push_str("\r\n");
    for row in rows {
        let fields = row_fields(row);
        let line: Vec<String> = fields.iter().map(|f| escape(f)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

fn row_fields(m: &FileMetrics) -> Vec<String> {
    vec![
        m.file.clone(),
        m.directory.clone(),
        m.size_bytes.to_string(),
        m.words.to_string(),
        m.lines.to_string(),
        m.chars.to_string(),
        m.tokens_est.to_string(),
        m.headings.to_string(),
        m.max_heading_depth.to_string(),
        m.images.to_string(),
        m.images_missing_alt.to_string(),
        m.tables_rows.to_string(),
        m.code_blocks.to_string(),
        m.code_blocks_missing_language.to_string(),
        m.links_total.to_string(),
        m.links_internal.to_string(),
        m.links_external.to_string(),
        m.links_broken.to_string(),
        m.front_matter_present.to_string(),
        m.front_matter_completeness_pct.to_string(),
        m.front_matter_missing_keys.join(";"),
        m.front_matter_suggested_keys_missing.join(";"),
        m.front_matter_status.clone().unwrap_or_default(),
        m.front_matter_type.clone().unwrap_or_default(),
        m.semantic_headings_count.to_string(),
        m.semantic_conformance_pct.to_string(),
        m.commit_count.to_string(),
        m.last_commit_iso.clone(),
        m.stale.to_string(),
        m.simhash.to_string(),
    ]
}

/// Quote a field if it contains a delimiter, quote or line break
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_outcome;

    #[test]
    fn test_header_matches_row_width() {
        let row = row_fields(&FileMetrics::default());
        assert_eq!(row.len(), COLUMNS.len());
    }

    #[test]
    fn test_csv_rows_in_path_order() {
        let csv = render(&test_outcome()).expect("render CSV");
        let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("file,directory,size_bytes"));
        assert!(lines[1].starts_with("README.md,,"));
        assert!(lines[2].starts_with("docs/guide.md,docs,"));
        assert!(lines[3].starts_with("orphan.md,,"));
        assert!(lines[2].contains(",status;type;owner;lastReviewed,"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_front_matter_values_are_quoted() {
        let row = FileMetrics {
            file: "a.md".into(),
            front_matter_status: Some("draft, pending".into()),
            ..Default::default()
        };
        let csv = render_rows(&[row]);
        assert!(csv.contains(",\"draft, pending\","));
    }
}
