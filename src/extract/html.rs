//! HTML text extraction

use super::normalize_whitespace;
use scraper::{Html, Selector};

/// Extract readable text and the page title from an HTML document.
/// Script/style content never reaches the output.
pub fn html_to_text(content: &str) -> (String, Option<String>) {
    let document = Html::parse_document(content);

    let title = Selector::parse("title").ok().and_then(|selector| {
        document
            .select(&selector)
            .next()
            .map(|elem| elem.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    });

    // Render from <body> when present so head metadata doesn't leak into
    // the text.
    let root = Selector::parse("body")
        .ok()
        .and_then(|s| document.select(&s).next())
        .map(|e| e.html())
        .unwrap_or_else(|| content.to_string());

    let text = html2text::from_read(root.as_bytes(), 80).unwrap_or_else(|_| root.clone());

    (normalize_whitespace(&text), title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_body_text_and_title() {
        let html = r#"
            <html>
              <head><title>Test Page</title><style>p { color: red }</style></head>
              <body><p>Hello from the body.</p></body>
            </html>
        "#;
        let (text, title) = html_to_text(html);
        assert!(text.contains("Hello from the body."));
        assert_eq!(title.as_deref(), Some("Test Page"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn test_missing_title_is_none() {
        let (_, title) = html_to_text("<html><body><p>no title</p></body></html>");
        assert!(title.is_none());
    }

    #[test]
    fn test_plain_fragment_still_extracts() {
        let (text, _) = html_to_text("<p>fragment only</p>");
        assert!(text.contains("fragment only"));
    }
}
