//! Query engine over a loaded store and cross-reference index.
//!
//! Every query is read-only and takes the translation to use as an explicit
//! argument. An unknown translation, reference or chapter yields `None` or an
//! empty result, never an error.

use crate::books::find_book;
use crate::crossref::{load_cross_references, CrossRefIndex};
use crate::models::{
    BookSummary, ChapterVerse, ChapterView, CrossReferences, IndexConfig, SearchQuery,
    SearchResults, Statistics, TranslationVerse,
};
use crate::reference::VerseRef;
use crate::search::search_translation;
use crate::stats::{book_overview, compute_statistics, word_count};
use crate::store::{load_translations, VerseStore};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;
use tracing::info;

/// Borrowed, read-only view used to answer queries
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    store: &'a VerseStore,
    cross_refs: &'a CrossRefIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a VerseStore, cross_refs: &'a CrossRefIndex) -> Self {
        Self { store, cross_refs }
    }

    pub fn store(&self) -> &'a VerseStore {
        self.store
    }

    pub fn cross_refs(&self) -> &'a CrossRefIndex {
        self.cross_refs
    }

    /// Verse text by reference: exact key first, then case-insensitive.
    pub fn get_verse(&self, translation: &str, reference: &str) -> Option<&'a str> {
        self.store.get(translation, reference.trim())
    }

    /// The stored key for a reference, matched the same way as
    /// [`get_verse`](Self::get_verse).
    pub fn resolve_reference(&self, translation: &str, reference: &str) -> Option<&'a str> {
        self.store
            .translation(translation)?
            .canonical_key(reference.trim())
    }

    /// Keyword search. An unknown translation gives an empty result.
    pub fn search_keyword(&self, translation: &str, query: &SearchQuery) -> SearchResults {
        match self.store.translation(translation) {
            Some(t) => search_translation(t, query),
            None => SearchResults {
                query: query.clone(),
                translation: translation.to_string(),
                total: 0,
                hits: Vec::new(),
            },
        }
    }

    /// The `limit` highest-voted edges from a reference, plus the total.
    pub fn cross_references(&self, reference: &str, limit: usize) -> CrossReferences {
        let edges = self.cross_refs.outgoing(reference.trim());
        CrossReferences {
            reference: reference.trim().to_string(),
            total: edges.len(),
            edges: edges.iter().take(limit).cloned().collect(),
        }
    }

    pub fn statistics(&self, translation: &str) -> Statistics {
        compute_statistics(self.store.translation(translation), self.cross_refs)
    }

    /// All verses of one chapter in native order. The book name is resolved
    /// against the catalog ignoring case; `None` when nothing matches.
    pub fn chapter(&self, translation: &str, book: &str, chapter: u32) -> Option<ChapterView> {
        let t = self.store.translation(translation)?;
        let book = find_book(book)?;
        let prefix = format!("{} {}:", book.name, chapter);

        let verses: Vec<ChapterVerse> = t
            .iter()
            .filter(|(reference, _)| reference.starts_with(&prefix))
            .map(|(reference, text)| ChapterVerse {
                verse: VerseRef::parse(reference).map(|r| r.verse).unwrap_or(0),
                reference: reference.to_string(),
                text: text.to_string(),
            })
            .collect();

        if verses.is_empty() {
            return None;
        }

        let total_words: usize = verses.iter().map(|v| word_count(&v.text)).sum();
        let avg_words_per_verse = total_words / verses.len();

        Some(ChapterView {
            translation: t.id().to_string(),
            book: book.name.to_string(),
            chapter,
            verses,
            total_words,
            avg_words_per_verse,
        })
    }

    pub fn book_overview(&self, translation: &str) -> Vec<BookSummary> {
        book_overview(self.store.translation(translation))
    }

    /// Pick a verse of the day from `candidates`. Candidates missing from the
    /// translation are never picked; `None` when none are present.
    pub fn daily_verse<R: Rng + ?Sized>(
        &self,
        translation: &str,
        candidates: &[String],
        rng: &mut R,
    ) -> Option<(&'a str, &'a str)> {
        let t = self.store.translation(translation)?;
        let present: Vec<&'a str> = candidates
            .iter()
            .filter_map(|reference| t.canonical_key(reference.trim()))
            .collect();

        let reference = *present.choose(rng)?;
        Some((reference, t.get_exact(reference)?))
    }

    /// Any verse of the translation, uniformly at random. `None` when the
    /// translation is not loaded or empty.
    pub fn random_verse<R: Rng + ?Sized>(
        &self,
        translation: &str,
        rng: &mut R,
    ) -> Option<(&'a str, &'a str)> {
        let t = self.store.translation(translation)?;
        let (reference, text) = t.verses().choose(rng)?;
        Some((reference.as_str(), text.as_str()))
    }

    /// One verse across every loaded translation, in id order.
    pub fn compare_translations(&self, reference: &str) -> Vec<TranslationVerse> {
        self.store
            .ids()
            .into_iter()
            .map(|id| TranslationVerse {
                translation: id.to_string(),
                text: self.store.get(id, reference.trim()).map(str::to_string),
            })
            .collect()
    }
}

/// Owned store and index, built once at startup
#[derive(Debug, Default)]
pub struct ScriptureIndex {
    pub store: VerseStore,
    pub cross_refs: CrossRefIndex,
}

impl ScriptureIndex {
    /// Load all translations and the cross-reference file concurrently.
    /// Missing or malformed resources are logged and left out.
    pub fn load(config: &IndexConfig, show_progress: bool) -> Self {
        let start = Instant::now();

        if show_progress {
            eprintln!("Loading scripture data from {}...", config.data_dir.display());
        }

        let cross_ref_path = config.cross_reference_path();
        let (store, cross_refs) = rayon::join(
            || load_translations(config),
            || load_cross_references(&cross_ref_path, show_progress),
        );

        let elapsed = start.elapsed();
        info!(
            translations = store.len(),
            cross_references = cross_refs.edge_count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "scripture index ready"
        );

        if show_progress {
            eprintln!(
                "  {} translation(s), {} cross-references ({:.2}s)",
                store.len(),
                cross_refs.edge_count(),
                elapsed.as_secs_f64()
            );
        }

        Self { store, cross_refs }
    }

    pub fn from_parts(store: VerseStore, cross_refs: CrossRefIndex) -> Self {
        Self { store, cross_refs }
    }

    pub fn query(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.store, &self.cross_refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Translation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn index() -> ScriptureIndex {
        let mut store = VerseStore::new();
        store.insert(Translation::from_pairs(
            "KJV",
            vec![
                ("Genesis 1:1", "In the beginning God created the heaven and the earth."),
                ("Genesis 1:2", "And the earth was without form, and void;"),
                ("Genesis 2:1", "Thus the heavens and the earth were finished,"),
                ("John 3:16", "For God so loved the world,"),
            ],
        ));
        store.insert(Translation::from_pairs(
            "WEB",
            vec![("Genesis 1:1", "In the beginning, God created the heavens and the earth.")],
        ));

        let cross_refs = CrossRefIndex::parse(
            "header\nGen.1.1\tJohn.1.1\t10\nGen.1.1\tHeb.11.3\t30\nGen.1.1\tPs.33.6\t20\n",
        );
        ScriptureIndex::from_parts(store, cross_refs)
    }

    #[test]
    fn test_get_verse() {
        let index = index();
        let q = index.query();
        assert_eq!(q.get_verse("KJV", "John 3:16"), Some("For God so loved the world,"));
        assert_eq!(q.get_verse("kjv", " john 3:16 "), q.get_verse("KJV", "John 3:16"));
        assert_eq!(q.get_verse("KJV", "John 3:17"), None);
        assert_eq!(q.get_verse("YLT", "John 3:16"), None);
    }

    #[test]
    fn test_cross_references_limit_and_total() {
        let index = index();
        let refs = index.query().cross_references("Genesis 1:1", 2);
        assert_eq!(refs.total, 3);
        assert_eq!(refs.remaining(), 1);
        let targets: Vec<&str> = refs.edges.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["Hebrews 11:3", "Psalms 33:6"]);

        let none = index.query().cross_references("Exodus 1:1", 5);
        assert_eq!(none.total, 0);
        assert!(none.edges.is_empty());
    }

    #[test]
    fn test_search_unknown_translation_is_empty() {
        let index = index();
        let results = index.query().search_keyword("YLT", &SearchQuery::new("God"));
        assert_eq!(results.total, 0);
        assert_eq!(results.translation, "YLT");
    }

    #[test]
    fn test_chapter_view() {
        let index = index();
        let view = index.query().chapter("KJV", "genesis", 1).unwrap();
        assert_eq!(view.book, "Genesis");
        assert_eq!(view.verses.len(), 2);
        assert_eq!(view.verses[0].verse, 1);
        assert_eq!(view.verses[1].reference, "Genesis 1:2");
        assert_eq!(view.total_words, 10 + 8);
        assert_eq!(view.avg_words_per_verse, 9);

        assert!(index.query().chapter("KJV", "Genesis", 3).is_none());
        assert!(index.query().chapter("KJV", "Hezekiah", 1).is_none());
    }

    #[test]
    fn test_chapter_prefix_does_not_bleed() {
        let mut store = VerseStore::new();
        store.insert(Translation::from_pairs(
            "KJV",
            vec![("Psalms 1:1", "Blessed is the man"), ("Psalms 11:1", "In the LORD put I my trust")],
        ));
        let index = ScriptureIndex::from_parts(store, CrossRefIndex::empty());
        let view = index.query().chapter("KJV", "Psalms", 1).unwrap();
        assert_eq!(view.verses.len(), 1);
    }

    #[test]
    fn test_compare_translations() {
        let index = index();
        let rows = index.query().compare_translations("Genesis 1:1");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].translation, "KJV");
        assert!(rows[0].text.is_some());
        assert_eq!(rows[1].translation, "WEB");

        let rows = index.query().compare_translations("John 3:16");
        assert!(rows[0].text.is_some());
        assert!(rows[1].text.is_none());
    }

    #[test]
    fn test_resolve_reference_folds_case() {
        let index = index();
        let q = index.query();
        assert_eq!(q.resolve_reference("KJV", "genesis 1:1"), Some("Genesis 1:1"));
        assert_eq!(q.resolve_reference("KJV", "Exodus 1:1"), None);

        let key = q.resolve_reference("KJV", " GENESIS 1:1 ").unwrap();
        assert_eq!(q.cross_references(key, 5).total, 3);
    }

    #[test]
    fn test_daily_verse_only_picks_present_candidates() {
        let index = index();
        let q = index.query();
        let candidates: Vec<String> = ["Philippians 4:13", "john 3:16", "Romans 8:28"]
            .iter()
            .map(|r| r.to_string())
            .collect();

        let mut rng = seeded_rng();
        for _ in 0..20 {
            let (reference, text) = q.daily_verse("KJV", &candidates, &mut rng).unwrap();
            assert_eq!(reference, "John 3:16");
            assert_eq!(text, "For God so loved the world,");
        }

        let absent = vec!["Romans 8:28".to_string()];
        assert!(q.daily_verse("KJV", &absent, &mut rng).is_none());
        assert!(q.daily_verse("KJV", &[], &mut rng).is_none());
    }

    #[test]
    fn test_random_verse_comes_from_translation() {
        let index = index();
        let q = index.query();
        let mut rng = seeded_rng();

        for _ in 0..20 {
            let (reference, text) = q.random_verse("KJV", &mut rng).unwrap();
            assert_eq!(q.get_verse("KJV", reference), Some(text));
        }

        let (reference, _) = q.random_verse("WEB", &mut rng).unwrap();
        assert_eq!(reference, "Genesis 1:1");
        assert!(q.random_verse("YLT", &mut rng).is_none());
    }

    #[test]
    fn test_empty_index_answers_everything() {
        let index = ScriptureIndex::default();
        let q = index.query();
        assert_eq!(q.get_verse("KJV", "John 3:16"), None);
        assert_eq!(q.search_keyword("KJV", &SearchQuery::new("love")).total, 0);
        assert_eq!(q.cross_references("John 3:16", 5).total, 0);
        assert_eq!(q.statistics("KJV").total_verses, 0);
        assert!(q.chapter("KJV", "John", 3).is_none());
        assert!(q.compare_translations("John 3:16").is_empty());
        assert_eq!(q.book_overview("KJV").len(), 66);

        let mut rng = seeded_rng();
        let daily = IndexConfig::default().daily_verses;
        assert!(q.daily_verse("KJV", &daily, &mut rng).is_none());
        assert!(q.random_verse("KJV", &mut rng).is_none());

        let mut store = VerseStore::new();
        store.insert(Translation::from_pairs("KJV", Vec::<(String, String)>::new()));
        let empty = ScriptureIndex::from_parts(store, CrossRefIndex::empty());
        assert!(empty.query().random_verse("KJV", &mut rng).is_none());
        assert!(empty.query().daily_verse("KJV", &daily, &mut rng).is_none());
    }
}
