//! Compiled line and block patterns used by the scanner
//!
//! Built once per run and handed to the `Scanner` by value. `Regex` is
//! immutable after compilation, so one `Patterns` can be shared by every
//! worker thread.

use regex::Regex;

/// Markdown heading: one or more `#` followed by whitespace or end of line
const HEADING: &str = r"^(#+)(?:[ \t]|$)";
/// Fenced code block marker with optional info string
const FENCE: &str = r"^ {0,3}```(.*)$";
/// Table row: starts and ends with a pipe
const TABLE_ROW: &str = r"^\s*\|.*\|\s*$";
/// Image embed `![alt](target)`
const IMAGE: &str = r"!\[([^\[\]]*)\]\(([^)]*)\)";
/// Link `[text](target)`; the text may contain one level of brackets so
/// badge links like `[![alt](img)](target)` still match
const LINK: &str = r"\[((?:[^\[\]]|\[[^\[\]]*\])*)\]\(([^)]*)\)";
/// Front-matter block at the very start of the document. Accepts a BOM,
/// leading whitespace, an HTML comment wrapper and CRLF line endings. The
/// closing `---` must start its own line.
const FRONT_MATTER: &str =
    r"(?s)^\x{FEFF}?\s*(?:<!--\s*)?---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:-->[ \t]*)?(?:\r?\n|$)";
/// Semantic numbering heading: `## **3. Title**`
const SEMANTIC_HEADING: &str = r"^\s*##\s*\*\*(\d+)\.\s*(.*?)\*\*\s*$";

/// All patterns the scanner needs, compiled together
#[derive(Debug, Clone)]
pub struct Patterns {
    pub heading: Regex,
    pub fence: Regex,
    pub table_row: Regex,
    pub image: Regex,
    pub link: Regex,
    pub front_matter: Regex,
    pub semantic_heading: Regex,
}

impl Patterns {
    pub fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            heading: Regex::new(HEADING)?,
            fence: Regex::new(FENCE)?,
            table_row: Regex::new(TABLE_ROW)?,
            image: Regex::new(IMAGE)?,
            link: Regex::new(LINK)?,
            front_matter: Regex::new(FRONT_MATTER)?,
            semantic_heading: Regex::new(SEMANTIC_HEADING)?,
        })
    }
}
