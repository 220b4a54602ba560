//! PDF text layer access via lopdf.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use handson_core::{Error, PageTextMap, Result};

/// Decide whether a document needs OCR from its sampled leading pages.
///
/// Returns true when every sampled page has `min_chars` or fewer characters
/// after trimming. An empty sample also needs OCR. This only looks at the
/// leading pages: a scan with image-only front matter and a real text layer
/// later on is classified as image-based.
pub fn need_ocr<S: AsRef<str>>(sampled_pages: &[S], min_chars: usize) -> bool {
    !sampled_pages
        .iter()
        .any(|text| text.as_ref().trim().chars().count() > min_chars)
}

/// A loaded PDF whose pages can be read through their text layer.
pub struct PdfTextLayer {
    document: Document,
    page_count: u32,
}

impl PdfTextLayer {
    pub fn open(path: &Path) -> Result<Self> {
        let document = Document::load(path)
            .map_err(|e| Error::Pdf(format!("Failed to open {}: {}", path.display(), e)))?;
        let page_count = document.get_pages().len() as u32;
        debug!("Opened {} ({} pages)", path.display(), page_count);
        Ok(Self {
            document,
            page_count,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Trimmed text of a 1-based page. Pages whose content cannot be decoded
    /// read as empty.
    pub fn page_text(&self, page: u32) -> String {
        match self.document.extract_text(&[page]) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("No text layer for page {}: {}", page, e);
                String::new()
            }
        }
    }

    /// Whether the leading `sample_pages` pages lack a usable text layer.
    pub fn needs_ocr(&self, sample_pages: usize, min_chars: usize) -> bool {
        let sampled = (sample_pages as u32).min(self.page_count);
        let texts: Vec<String> = (1..=sampled).map(|p| self.page_text(p)).collect();
        need_ocr(&texts, min_chars)
    }

    /// Text of every page, numbered 1..=page_count.
    pub fn all_pages(&self) -> PageTextMap {
        PageTextMap::from_pages((1..=self.page_count).map(|p| self.page_text(p)).collect())
    }
}
