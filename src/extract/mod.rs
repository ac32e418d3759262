//! Content extraction
//!
//! Converts an uploaded file or a scraped web page into plain text ready for
//! chunking. PDF parsing and HTML rendering are delegated to external
//! libraries; this module only normalizes their output.

mod html;
mod pdf;
mod web;

pub use html::html_to_text;
pub use pdf::extract_pdf_text;
pub use web::{ScrapedDocument, WebScraper};

/// Collapse runs of blank lines and trailing spaces without disturbing
/// paragraph structure.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        blank_run = 0;
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_blank_runs() {
        let text = "first\n\n\n\nsecond   \n\nthird";
        assert_eq!(normalize_whitespace(text), "first\n\nsecond\n\nthird");
    }

    #[test]
    fn test_normalize_trims_edges() {
        let text = "\n\n\nbody\n\n\n";
        assert_eq!(normalize_whitespace(text), "body");
    }

    #[test]
    fn test_normalize_keeps_single_newlines() {
        let text = "line one\nline two";
        assert_eq!(normalize_whitespace(text), "line one\nline two");
    }
}
