//! HandsOn Ingest — PDF text extraction (text layer or OCR) and page chunking.

pub mod chunking;
pub mod extractor;
pub mod file;
pub mod ocr;
pub mod pdf;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use chunking::{chunk_pages, contains_activity_keyword, PageChunk, DEFAULT_PAGES_PER_CHUNK};
pub use extractor::{Extraction, ExtractionMethod, PdfTextExtractor};
pub use file::{require_file, FileType};
pub use ocr::pages_from_ocr;
pub use pdf::{need_ocr, PdfTextLayer};
