//! Domain model: sources, chat messages, and collection naming.
//!
//! Every ingested source becomes exactly one Qdrant collection whose name is
//! derived here. Naming collisions are the caller's responsibility: two
//! sources mapping to the same name silently merge into one collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin of an ingested source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Text,
    Website,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::File => "file",
            SourceKind::Text => "text",
            SourceKind::Website => "website",
        }
    }
}

/// A unit of ingested content. Lives exactly as long as its collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Collection name (doubles as the source identifier)
    pub name: String,
    pub kind: SourceKind,
    pub created_at: DateTime<Utc>,
}

impl Source {
    pub fn new(name: String, kind: SourceKind) -> Self {
        Self {
            name,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in the (append-only, transient) chat transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// How many characters of pasted text feed the collection name.
const TEXT_TITLE_PREFIX_CHARS: usize = 30;

/// Collection name for an uploaded file: the sanitized file name.
pub fn file_collection_name(file_name: &str) -> String {
    sanitize(file_name, |c: char| c.is_ascii_alphanumeric() || "-_.".contains(c))
}

/// Collection name for pasted text: a sanitized prefix of the content plus
/// the submission timestamp, so identical text pasted twice yields distinct
/// collections.
pub fn text_collection_name(text: &str, submitted_at: DateTime<Utc>) -> String {
    let prefix: String = text.chars().take(TEXT_TITLE_PREFIX_CHARS).collect();
    let title = sanitize(&prefix, |c: char| c.is_ascii_alphanumeric());
    format!("{}_{}", title, submitted_at.timestamp())
}

/// Collection name for a website: the URL with its scheme stripped and
/// non-alphanumeric characters replaced. Two URLs differing only in scheme
/// collide by design.
pub fn website_collection_name(url: &str) -> String {
    let without_scheme = match url.split_once("://") {
        Some((_, rest)) => rest,
        None => url,
    };
    sanitize(without_scheme, |c: char| c.is_ascii_alphanumeric())
}

/// Replace every char rejected by `keep` with '_', collapsing runs and
/// trimming the ends.
fn sanitize(input: &str, keep: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_sep = true;
    for c in input.chars() {
        if keep(c) {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_name_sanitized() {
        assert_eq!(file_collection_name("report v2.pdf"), "report_v2.pdf");
        assert_eq!(file_collection_name("notes.pdf"), "notes.pdf");
        assert_eq!(file_collection_name("a/b\\c.pdf"), "a_b_c.pdf");
    }

    #[test]
    fn test_text_name_embeds_prefix_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let name = text_collection_name("Hello world", at);
        assert_eq!(name, format!("Hello_world_{}", at.timestamp()));
    }

    #[test]
    fn test_text_name_distinct_for_identical_text() {
        let first = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 1).unwrap();
        assert_ne!(
            text_collection_name("same text", first),
            text_collection_name("same text", second)
        );
    }

    #[test]
    fn test_text_name_truncates_long_content() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let long = "a".repeat(200);
        let name = text_collection_name(&long, at);
        assert_eq!(name, format!("{}_{}", "a".repeat(30), at.timestamp()));
    }

    #[test]
    fn test_website_name_strips_scheme() {
        assert_eq!(
            website_collection_name("https://example.com/docs"),
            "example_com_docs"
        );
    }

    #[test]
    fn test_website_schemes_collide() {
        // Expected: the scheme carries no identity, so http/https variants
        // of the same URL merge into one collection.
        assert_eq!(
            website_collection_name("http://example.com/docs"),
            website_collection_name("https://example.com/docs")
        );
    }

    #[test]
    fn test_website_distinct_urls_stay_distinct() {
        assert_ne!(
            website_collection_name("https://example.com/docs"),
            website_collection_name("https://example.com/blog")
        );
    }
}
