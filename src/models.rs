//! Data structures for the scripture index: configuration, edges, query
//! parameters and the plain-data results handed to presentation layers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Old or New Testament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Testament {
    /// First 39 canonical books
    #[serde(rename = "OT")]
    Old,
    /// Remaining 27 canonical books
    #[serde(rename = "NT")]
    New,
}

impl Testament {
    /// Parse "OT"/"NT" (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "OT" => Some(Testament::Old),
            "NT" => Some(Testament::New),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Testament::Old => "OT",
            Testament::New => "NT",
        }
    }
}

/// Static description of a translation and where to find it on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationInfo {
    pub id: String,
    pub name: String,
    pub year: String,
    pub files: Vec<String>, // Tried in order; later entries are fallbacks
}

impl TranslationInfo {
    pub fn new(id: &str, name: &str, year: &str, files: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            year: year.to_string(),
            files: files.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub data_dir: PathBuf,
    pub default_translation: String,
    pub translations: Vec<TranslationInfo>,
    pub cross_reference_file: String,
    pub search_limit: usize,
    pub cross_reference_limit: usize,
    pub history_limit: usize,
    pub daily_verses: Vec<String>, // Candidates for the verse of the day
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            default_translation: "KJV".to_string(),
            translations: vec![
                TranslationInfo::new(
                    "KJV",
                    "King James Version",
                    "1611",
                    &["bible-kjv-converted.json", "bible-kjv.json"],
                ),
                TranslationInfo::new(
                    "ASV",
                    "American Standard Version",
                    "1901",
                    &["bible-asv-converted.json"],
                ),
                TranslationInfo::new(
                    "WEB",
                    "World English Bible",
                    "2000",
                    &["bible-web-converted.json"],
                ),
                TranslationInfo::new(
                    "YLT",
                    "Young's Literal Translation",
                    "1898",
                    &["bible-ylt-converted.json"],
                ),
            ],
            cross_reference_file: "cross_references.txt".to_string(),
            search_limit: 15,
            cross_reference_limit: 5,
            history_limit: 50,
            daily_verses: [
                "John 3:16",
                "Psalms 23:1",
                "Philippians 4:13",
                "Jeremiah 29:11",
                "Romans 8:28",
                "Proverbs 3:5",
                "Isaiah 40:31",
                "Matthew 5:16",
                "1 Corinthians 13:4",
                "Psalms 46:1",
                "Joshua 1:9",
                "Romans 12:2",
            ]
            .iter()
            .map(|r| r.to_string())
            .collect(),
        }
    }
}

impl IndexConfig {
    /// Metadata for a translation id (case-insensitive).
    pub fn translation_info(&self, id: &str) -> Option<&TranslationInfo> {
        self.translations
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
    }

    pub fn cross_reference_path(&self) -> PathBuf {
        self.data_dir.join(&self.cross_reference_file)
    }
}

/// A directed, vote-weighted link to another verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossRefEdge {
    pub target: String,
    pub votes: i64,
}

/// Keyword search parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub term: String,
    pub limit: usize,
    pub testament: Option<Testament>,
    pub book: Option<String>,
    pub exact_phrase: bool,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            term: String::new(),
            limit: 15,
            testament: None,
            book: None,
            exact_phrase: false,
        }
    }
}

/// Byte range of one highlighted occurrence inside a verse text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

/// A verse matching a keyword search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub reference: String,
    pub text: String,
    pub highlights: Vec<HighlightSpan>,
}

/// Search outcome: the first `limit` hits plus the full match count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: SearchQuery,
    pub translation: String,
    pub total: usize,
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    /// Matches found beyond the returned hits.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.hits.len())
    }
}

/// Top cross-references for a verse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossReferences {
    pub reference: String,
    pub total: usize,
    pub edges: Vec<CrossRefEdge>,
}

impl CrossReferences {
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.edges.len())
    }
}

/// Outgoing edge count for one reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCount {
    pub reference: String,
    pub count: usize,
}

/// Aggregate report over a translation and the cross-reference index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub translation: String,
    pub total_verses: usize,
    pub total_words: usize,
    pub avg_words_per_verse: usize,

    // Canonical totals come from the book catalog, present counts from the data
    pub canonical_books: usize,
    pub canonical_chapters: usize,
    pub books_present: usize,
    pub chapters_present: usize,

    pub total_cross_refs: usize,
    pub referenced_verses: usize,
    pub avg_refs_per_verse: usize,
    pub coverage_percent: usize, // referenced_verses * 100 / total_verses
    pub top_referenced: Vec<ReferenceCount>,
}

// ============================================================================
// Reading views
// ============================================================================

/// One verse inside a chapter view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterVerse {
    pub verse: u32,
    pub reference: String,
    pub text: String,
}

/// A full chapter in native translation order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterView {
    pub translation: String,
    pub book: String,
    pub chapter: u32,
    pub verses: Vec<ChapterVerse>,
    pub total_words: usize,
    pub avg_words_per_verse: usize,
}

/// Catalog entry with the number of chapters found in a translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    pub position: usize, // 1-based canonical position
    pub name: String,
    pub testament: Testament,
    pub canonical_chapters: u32,
    pub chapters_present: usize,
}

/// A verse as rendered by one translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationVerse {
    pub translation: String,
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testament_codes() {
        assert_eq!(Testament::from_code("ot"), Some(Testament::Old));
        assert_eq!(Testament::from_code(" NT "), Some(Testament::New));
        assert_eq!(Testament::from_code("apocrypha"), None);
        assert_eq!(Testament::New.code(), "NT");
        assert_eq!(serde_json::to_string(&Testament::Old).unwrap(), "\"OT\"");
    }

    #[test]
    fn test_config_defaults() {
        let config = IndexConfig::default();
        assert_eq!(config.default_translation, "KJV");
        assert_eq!(config.search_limit, 15);
        assert_eq!(config.cross_reference_limit, 5);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.daily_verses.len(), 12);
        assert_eq!(config.daily_verses[0], "John 3:16");
        assert_eq!(
            config.cross_reference_path(),
            PathBuf::from(".").join("cross_references.txt")
        );

        let kjv = config.translation_info("kjv").unwrap();
        assert_eq!(kjv.files, vec!["bible-kjv-converted.json", "bible-kjv.json"]);
        assert!(config.translation_info("NIV").is_none());
    }
}
