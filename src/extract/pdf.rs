//! PDF text extraction

use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Extract the text of a PDF: per-page text in page order, joined with one
/// newline between pages.
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    debug!("Extracting text from {}", path.display());

    let pages = pdf_extract::extract_text_by_pages(path).map_err(|e| {
        Error::Extract(format!("Failed to parse PDF {}: {}", path.display(), e))
    })?;

    Ok(pages.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_extract_error() {
        let err = extract_pdf_text(Path::new("/nonexistent/file.pdf")).unwrap_err();
        assert!(matches!(err, Error::Extract(_)));
    }
}
