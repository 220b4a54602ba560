//! Page chunking for activity recognition.
//!
//! Pages are grouped into fixed-size windows. Each page's text is prefixed
//! with a `Page <n>:` marker so the model can attribute activities to pages
//! across the window.

use handson_core::PageTextMap;

/// Default pages per recognition chunk.
pub const DEFAULT_PAGES_PER_CHUNK: usize = 10;

/// Phrases that introduce an activity in the textbooks we process.
pub const ACTIVITY_KEYWORDS: &[&str] = &[
    "activity",
    "let us do",
    "let us perform",
    "let us explore",
    "think like a scientist",
    "activity 1.1",
    "activity 2.1",
];

/// A window of consecutive pages with marked-up text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageChunk {
    pub chunk_index: usize,
    pub pages: Vec<u32>,
    pub text: String,
}

/// Split pages into windows of `pages_per_chunk`, preserving order.
pub fn chunk_pages(pages: &PageTextMap, pages_per_chunk: usize) -> Vec<PageChunk> {
    let size = pages_per_chunk.max(1);
    let entries: Vec<(u32, &str)> = pages.iter().collect();

    entries
        .chunks(size)
        .enumerate()
        .map(|(chunk_index, window)| PageChunk {
            chunk_index,
            pages: window.iter().map(|(n, _)| *n).collect(),
            text: window
                .iter()
                .map(|(n, text)| format!("Page {}: {}", n, text))
                .collect::<Vec<_>>()
                .join("\n\n"),
        })
        .collect()
}

/// Cheap pre-filter: does the text mention any activity keyword?
///
/// Activities phrased without any keyword are missed, so callers can turn
/// the filter off.
pub fn contains_activity_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    ACTIVITY_KEYWORDS.iter().any(|k| lower.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: usize) -> PageTextMap {
        PageTextMap::from_pages((1..=n).map(|i| format!("text {}", i)).collect())
    }

    #[test]
    fn test_chunk_sizes() {
        let chunks = chunk_pages(&pages(23), DEFAULT_PAGES_PER_CHUNK);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].pages, (1..=10).collect::<Vec<u32>>());
        assert_eq!(chunks[2].pages, vec![21, 22, 23]);
        assert_eq!(chunks[2].chunk_index, 2);
    }

    #[test]
    fn test_page_markers() {
        let map = PageTextMap::from_pages(vec!["alpha".into(), String::new()]);
        let chunks = chunk_pages(&map, 10);
        assert_eq!(chunks[0].text, "Page 1: alpha\n\nPage 2: ");
    }

    #[test]
    fn test_empty_map_has_no_chunks() {
        assert!(chunk_pages(&PageTextMap::default(), 10).is_empty());
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert!(contains_activity_keyword("ACTIVITY 3.2 Mixing colours"));
        assert!(contains_activity_keyword("Let Us Explore the magnet"));
        assert!(contains_activity_keyword("Think like a Scientist"));
        assert!(!contains_activity_keyword("Exercises and questions"));
    }
}
