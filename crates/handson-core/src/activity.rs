//! Activity records, match records, and per-page text.

use serde::{Deserialize, Deserializer, Serialize};

/// One hands-on classroom activity.
///
/// `activity` together with `page` is the natural matching key. `page` is
/// never empty; an empty list is rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub activity: String,
    #[serde(default)]
    pub concept: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "deserialize_pages")]
    pub page: Vec<u32>,
}

impl Activity {
    /// First page the activity appears on.
    pub fn first_page(&self) -> Option<u32> {
        self.page.first().copied()
    }
}

fn deserialize_pages<'de, D>(deserializer: D) -> std::result::Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let pages = PageRef::deserialize(deserializer)?.into_pages();
    if pages.is_empty() {
        return Err(serde::de::Error::custom("activity page list is empty"));
    }
    Ok(pages)
}

/// A page reference as it appears in JSON: either `5` or `[5, 6]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageRef {
    Single(u32),
    Many(Vec<u32>),
}

impl PageRef {
    pub fn into_pages(self) -> Vec<u32> {
        match self {
            PageRef::Single(p) => vec![p],
            PageRef::Many(pages) => pages,
        }
    }

    /// Whether this reference points at the same place as a master record's
    /// page list. A single page must be contained in the list; a list must
    /// equal it.
    pub fn agrees_with(&self, pages: &[u32]) -> bool {
        match self {
            PageRef::Single(p) => pages.contains(p),
            PageRef::Many(list) => list.as_slice() == pages,
        }
    }
}

impl From<u32> for PageRef {
    fn from(p: u32) -> Self {
        PageRef::Single(p)
    }
}

/// Pairing between a master activity and an entry of a second list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub page: PageRef,
    pub json1_activity: String,
    pub json2_activity: String,
}

impl MatchRecord {
    /// Whether this match refers to the given master activity (exact name, agreeing page).
    pub fn covers(&self, activity: &str, pages: &[u32]) -> bool {
        self.json1_activity == activity && self.page.agrees_with(pages)
    }
}

/// Extracted text keyed by 1-based page number.
///
/// Pages are stored positionally, so numbering is always `1..=len` with no
/// gaps regardless of which pages are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTextMap {
    pages: Vec<String>,
}

impl PageTextMap {
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Text of a 1-based page.
    pub fn get(&self, page: u32) -> Option<&str> {
        let index = (page as usize).checked_sub(1)?;
        self.pages.get(index).map(String::as_str)
    }

    /// `(page_number, text)` pairs in page order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.pages
            .iter()
            .enumerate()
            .map(|(i, text)| (i as u32 + 1, text.as_str()))
    }

    pub fn page_numbers(&self) -> Vec<u32> {
        (1..=self.pages.len() as u32).collect()
    }
}
