//! Mapping OCR provider pages onto the 1-based page map.

use tracing::warn;

use handson_core::{Error, PageTextMap, Result};
use handson_llm::OcrPage;

/// Gap-filled page count may be at most this many times the returned pages.
const MAX_PAGE_SPREAD: usize = 4;

/// Turn provider pages (0-based `index`) into a sequential page map.
///
/// Page `index + 1` carries that page's trimmed markdown. Pages the provider
/// returned without text, or skipped entirely, are recorded as empty strings
/// so numbering stays gap-free. Indices far past the number of returned pages
/// are rejected.
pub fn pages_from_ocr(mut ocr_pages: Vec<OcrPage>) -> Result<PageTextMap> {
    ocr_pages.sort_by_key(|p| p.index);

    let total = ocr_pages.last().map(|p| p.index as usize + 1).unwrap_or(0);
    if total > ocr_pages.len() * MAX_PAGE_SPREAD {
        return Err(Error::Ocr(format!(
            "OCR returned page index {} for only {} pages",
            total - 1,
            ocr_pages.len()
        )));
    }
    let mut pages = vec![String::new(); total];

    for page in ocr_pages {
        let text = page.markdown.as_deref().unwrap_or("").trim();
        if text.is_empty() {
            warn!("Page {} has no meaningful text after OCR", page.index + 1);
            continue;
        }
        pages[page.index as usize] = text.to_string();
    }

    Ok(PageTextMap::from_pages(pages))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: u32, markdown: Option<&str>) -> OcrPage {
        OcrPage {
            index,
            markdown: markdown.map(str::to_string),
        }
    }

    #[test]
    fn test_zero_based_indices_become_one_based() {
        let map = pages_from_ocr(vec![
            page(0, Some("  Intro  ")),
            page(1, Some("Activity 2.1: Let us explore")),
        ])
        .unwrap();
        assert_eq!(map.page_numbers(), vec![1, 2]);
        assert_eq!(map.get(1), Some("Intro"));
        assert_eq!(map.get(2), Some("Activity 2.1: Let us explore"));
    }

    #[test]
    fn test_blank_and_missing_pages_are_kept_empty() {
        let map = pages_from_ocr(vec![
            page(3, Some("last")),
            page(0, None),
            page(1, Some("   \n ")),
        ])
        .unwrap();
        assert_eq!(map.page_numbers(), vec![1, 2, 3, 4]);
        assert_eq!(map.get(1), Some(""));
        assert_eq!(map.get(2), Some(""));
        assert_eq!(map.get(3), Some(""));
        assert_eq!(map.get(4), Some("last"));
    }

    #[test]
    fn test_no_pages() {
        assert!(pages_from_ocr(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_runaway_index_is_rejected() {
        let err = pages_from_ocr(vec![page(0, Some("Intro")), page(u32::MAX, Some("x"))]).unwrap_err();
        assert!(matches!(err, Error::Ocr(_)));
    }
}
