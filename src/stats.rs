//! Corpus statistics.

use crate::books::{find_book, testament_of, total_chapters, BOOKS};
use crate::crossref::CrossRefIndex;
use crate::models::{BookSummary, ReferenceCount, Statistics};
use crate::reference::VerseRef;
use crate::store::Translation;
use std::collections::{BTreeSet, HashMap};

/// Number of entries in the most-referenced list.
pub const TOP_REFERENCED: usize = 10;

/// Aggregate report for a translation (possibly absent) and the index.
/// Every average is integer division guarded against empty inputs.
pub fn compute_statistics(translation: Option<&Translation>, index: &CrossRefIndex) -> Statistics {
    let (total_verses, total_words): (usize, usize) = match translation {
        Some(t) => (
            t.len(),
            t.iter().map(|(_, text)| word_count(text)).sum(),
        ),
        None => (0, 0),
    };

    let chapters = translation.map(chapters_by_book).unwrap_or_default();

    let total_cross_refs = index.edge_count();
    let referenced_verses = index.referenced_count();

    Statistics {
        translation: translation.map(|t| t.id().to_string()).unwrap_or_default(),
        total_verses,
        total_words,
        avg_words_per_verse: checked_div(total_words, total_verses),
        canonical_books: BOOKS.len(),
        canonical_chapters: total_chapters() as usize,
        books_present: chapters.len(),
        chapters_present: chapters.values().map(|c| c.len()).sum(),
        total_cross_refs,
        referenced_verses,
        avg_refs_per_verse: checked_div(total_cross_refs, referenced_verses),
        coverage_percent: checked_div(referenced_verses * 100, total_verses),
        top_referenced: top_referenced(index, TOP_REFERENCED),
    }
}

/// References with the most outgoing edges. Ties keep first-seen order.
pub fn top_referenced(index: &CrossRefIndex, n: usize) -> Vec<ReferenceCount> {
    let mut counts: Vec<ReferenceCount> = index
        .iter()
        .map(|(reference, edges)| ReferenceCount {
            reference: reference.to_string(),
            count: edges.len(),
        })
        .collect();

    // Stable sort, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Every catalog book with the number of its chapters present in the
/// translation.
pub fn book_overview(translation: Option<&Translation>) -> Vec<BookSummary> {
    let chapters = translation.map(chapters_by_book).unwrap_or_default();

    BOOKS
        .iter()
        .enumerate()
        .filter_map(|(i, book)| {
            Some(BookSummary {
                position: i + 1,
                name: book.name.to_string(),
                testament: testament_of(book.name)?,
                canonical_chapters: book.chapters,
                chapters_present: chapters.get(book.name).map(|c| c.len()).unwrap_or(0),
            })
        })
        .collect()
}

/// Distinct chapters per canonical book, from properly parsed references.
/// References whose book is not in the catalog are ignored.
pub fn chapters_by_book(translation: &Translation) -> HashMap<&'static str, BTreeSet<u32>> {
    let mut chapters: HashMap<&'static str, BTreeSet<u32>> = HashMap::new();

    for (reference, _) in translation.iter() {
        let Some(parsed) = VerseRef::parse(reference) else {
            continue;
        };
        if let Some(book) = find_book(&parsed.book) {
            chapters.entry(book.name).or_default().insert(parsed.chapter);
        }
    }

    chapters
}

/// Whitespace-separated word count; bracketed insertions count as words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[inline]
fn checked_div(numerator: usize, denominator: usize) -> usize {
    if denominator == 0 {
        0
    } else {
        numerator / denominator
    }
}
