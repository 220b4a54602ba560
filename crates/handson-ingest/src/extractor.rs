//! PDF text extraction: text layer when present, OCR otherwise.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use handson_core::{Error, PageTextMap, PipelineOptions, Result};
use handson_llm::OcrBackend;

use crate::file::{require_file, FileType};
use crate::ocr::pages_from_ocr;
use crate::pdf::PdfTextLayer;

/// How the page text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    TextLayer,
    Ocr,
}

/// Per-page text of one PDF.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub pages: PageTextMap,
    pub method: ExtractionMethod,
}

/// Reads PDFs into page maps, falling back to OCR for image-only documents.
pub struct PdfTextExtractor {
    ocr: Option<Arc<dyn OcrBackend>>,
    sample_pages: usize,
    min_chars: usize,
}

impl PdfTextExtractor {
    pub fn new(ocr: Option<Arc<dyn OcrBackend>>, options: &PipelineOptions) -> Self {
        Self {
            ocr,
            sample_pages: options.ocr_sample_pages,
            min_chars: options.ocr_min_chars,
        }
    }

    pub fn ocr_available(&self) -> bool {
        self.ocr.is_some()
    }

    pub async fn extract(&self, path: &Path) -> Result<Extraction> {
        require_file(path, FileType::Pdf, "PDF file")?;

        let owned = path.to_path_buf();
        let (sample_pages, min_chars) = (self.sample_pages, self.min_chars);

        // lopdf parsing is CPU-bound; keep it off the async workers.
        let text_layer = tokio::task::spawn_blocking(move || -> Result<Option<PageTextMap>> {
            let layer = PdfTextLayer::open(&owned)?;
            if layer.needs_ocr(sample_pages, min_chars) {
                Ok(None)
            } else {
                Ok(Some(layer.all_pages()))
            }
        })
        .await
        .map_err(|e| Error::Internal(format!("PDF extraction task failed: {}", e)))??;

        let extraction = match text_layer {
            Some(pages) => {
                info!(
                    "{} has a text layer ({} pages)",
                    path.display(),
                    pages.len()
                );
                Extraction {
                    pages,
                    method: ExtractionMethod::TextLayer,
                }
            }
            None => {
                let ocr = self.ocr.as_ref().ok_or_else(|| {
                    Error::Ocr(format!(
                        "{} appears to be image-based and needs OCR, but no OCR provider \
                         is configured. Set MISTRAL_API_KEY.",
                        path.display()
                    ))
                })?;
                info!("{} appears to be image-based, running OCR", path.display());
                let pages = pages_from_ocr(ocr.ocr_pdf(path).await?)?;
                Extraction {
                    pages,
                    method: ExtractionMethod::Ocr,
                }
            }
        };

        if extraction.pages.is_empty() {
            warn!("No pages extracted from {}", path.display());
            return Err(Error::Pdf(format!(
                "No text could be extracted from {}",
                path.display()
            )));
        }

        Ok(extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_pdf;
    use async_trait::async_trait;
    use handson_llm::OcrPage;

    const TEXT: &str = "Activity 1.1: Drop a ball from a height and watch it fall to the ground.";

    struct FixedOcr(Vec<OcrPage>);

    #[async_trait]
    impl OcrBackend for FixedOcr {
        async fn ocr_pdf(&self, _pdf_path: &Path) -> Result<Vec<OcrPage>> {
            Ok(self.0.clone())
        }
    }

    fn extractor(ocr: Option<Arc<dyn OcrBackend>>) -> PdfTextExtractor {
        PdfTextExtractor::new(ocr, &PipelineOptions::default())
    }

    #[tokio::test]
    async fn test_text_layer_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pdf");
        write_pdf(&path, &["Cover", TEXT, "Questions"]);

        let extraction = extractor(None).extract(&path).await.unwrap();
        assert_eq!(extraction.method, ExtractionMethod::TextLayer);
        assert_eq!(extraction.pages.page_numbers(), vec![1, 2, 3]);
        assert!(extraction.pages.get(2).unwrap().contains("Drop a ball"));
    }

    #[tokio::test]
    async fn test_scanned_pdf_goes_through_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        write_pdf(&path, &["", "", ""]);

        let ocr = FixedOcr(vec![
            OcrPage {
                index: 0,
                markdown: Some("Cover".into()),
            },
            OcrPage {
                index: 1,
                markdown: Some(TEXT.into()),
            },
            OcrPage {
                index: 2,
                markdown: None,
            },
        ]);
        let extraction = extractor(Some(Arc::new(ocr))).extract(&path).await.unwrap();
        assert_eq!(extraction.method, ExtractionMethod::Ocr);
        assert_eq!(extraction.pages.page_numbers(), vec![1, 2, 3]);
        assert_eq!(extraction.pages.get(2), Some(TEXT));
        assert_eq!(extraction.pages.get(3), Some(""));
    }

    #[tokio::test]
    async fn test_scanned_pdf_without_ocr_provider_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        write_pdf(&path, &["", ""]);

        let err = extractor(None).extract(&path).await.unwrap_err();
        assert!(matches!(err, Error::Ocr(_)));
        assert!(err.to_string().contains("MISTRAL_API_KEY"));
    }

    #[tokio::test]
    async fn test_ocr_with_no_pages_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        write_pdf(&path, &[""]);

        let err = extractor(Some(Arc::new(FixedOcr(Vec::new()))))
            .extract(&path)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Pdf(_)));
    }

    #[tokio::test]
    async fn test_input_validation() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        assert!(matches!(
            extractor(None).extract(&missing).await,
            Err(Error::NotFound(_))
        ));

        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, "hello").unwrap();
        assert!(matches!(
            extractor(None).extract(&txt).await,
            Err(Error::InvalidInput(_))
        ));
    }
}
