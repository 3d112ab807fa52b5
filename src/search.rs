//! Keyword search over a translation.
//!
//! Matching is case-insensitive. In word mode every whitespace-separated
//! word of the term must occur somewhere in the verse (any order, any
//! distance); in exact-phrase mode the whole term must occur as a
//! substring. Results keep the translation's native order.

use crate::books::testament_of;
use crate::models::{HighlightSpan, SearchHit, SearchQuery, SearchResults};
use crate::reference::book_token;
use crate::store::Translation;
use rayon::prelude::*;

/// Run a keyword search, returning the first `query.limit` hits and the
/// total number of matches.
pub fn search_translation(translation: &Translation, query: &SearchQuery) -> SearchResults {
    let term = query.term.trim();
    if term.is_empty() {
        return SearchResults {
            query: query.clone(),
            translation: translation.id().to_string(),
            total: 0,
            hits: Vec::new(),
        };
    }

    let term_lower = term.to_lowercase();
    let words: Vec<&str> = term_lower.split_whitespace().collect();

    // Indices of matching verses; par_iter keeps source order on collect
    let matched: Vec<usize> = translation
        .verses()
        .par_iter()
        .enumerate()
        .filter(|(_, (reference, text))| {
            passes_filters(reference, query) && text_matches(text, &term_lower, &words, query.exact_phrase)
        })
        .map(|(idx, _)| idx)
        .collect();

    let hits = matched
        .iter()
        .take(query.limit)
        .map(|&idx| {
            let (reference, text) = &translation.verses()[idx];
            SearchHit {
                reference: reference.clone(),
                text: text.clone(),
                highlights: highlight_spans(text, term),
            }
        })
        .collect();

    SearchResults {
        query: query.clone(),
        translation: translation.id().to_string(),
        total: matched.len(),
        hits,
    }
}

/// Testament and book filters for one reference.
pub fn passes_filters(reference: &str, query: &SearchQuery) -> bool {
    if query.testament.is_none() && query.book.is_none() {
        return true;
    }

    let book = book_token(reference);

    if let Some(testament) = query.testament {
        if testament_of(book) != Some(testament) {
            return false;
        }
    }

    match &query.book {
        Some(wanted) => book.to_lowercase() == wanted.trim().to_lowercase(),
        None => true,
    }
}

/// Match predicate. `term_lower` and `words` must already be lowercased.
pub fn text_matches(text: &str, term_lower: &str, words: &[&str], exact_phrase: bool) -> bool {
    let text_lower = text.to_lowercase();
    if exact_phrase {
        text_lower.contains(term_lower)
    } else {
        words.iter().all(|word| text_lower.contains(word))
    }
}

/// Byte spans of every case-insensitive occurrence of `term` in `text`,
/// left to right without overlap.
pub fn highlight_spans(text: &str, term: &str) -> Vec<HighlightSpan> {
    let needle: Vec<char> = term.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        match match_len_ignore_case(rest, &needle) {
            Some(len) => {
                spans.push(HighlightSpan {
                    start: pos,
                    end: pos + len,
                });
                pos += len;
            }
            None => {
                // Advance one character
                pos += rest.chars().next().map(char::len_utf8).unwrap_or(1);
            }
        }
    }

    spans
}

/// Byte length of the prefix of `haystack` equal to `needle` (already
/// lowercased) when compared case-insensitively.
fn match_len_ignore_case(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut remaining = needle.iter();
    let mut consumed = 0;

    for c in haystack.chars() {
        for lower in c.to_lowercase() {
            // A needle that ends in the middle of a folded character is no match
            if remaining.next() != Some(&lower) {
                return None;
            }
        }
        consumed += c.len_utf8();
        if remaining.len() == 0 {
            return Some(consumed);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Testament;

    fn translation() -> Translation {
        Translation::from_pairs(
            "TEST",
            vec![
                ("Test 1:1", "Faith without love is nothing"),
                ("Test 1:2", "Hope remains"),
                ("Test 1:3", "God is love and faith guides"),
            ],
        )
    }

    #[test]
    fn test_word_search_requires_all_words() {
        let results = search_translation(&translation(), &SearchQuery::new("faith love"));
        let refs: Vec<&str> = results.hits.iter().map(|h| h.reference.as_str()).collect();
        assert_eq!(refs, vec!["Test 1:1", "Test 1:3"]);
        assert_eq!(results.total, 2);
    }

    #[test]
    fn test_exact_phrase() {
        let t = translation();
        let query = SearchQuery {
            exact_phrase: true,
            ..SearchQuery::new("love and faith")
        };
        let results = search_translation(&t, &query);
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].reference, "Test 1:3");

        let wrong_order = SearchQuery {
            exact_phrase: true,
            ..SearchQuery::new("faith love")
        };
        assert_eq!(search_translation(&t, &wrong_order).total, 0);
    }

    #[test]
    fn test_limit_reports_true_total() {
        let query = SearchQuery {
            limit: 1,
            ..SearchQuery::new("love")
        };
        let results = search_translation(&translation(), &query);
        assert_eq!(results.hits.len(), 1);
        assert_eq!(results.total, 2);
        assert_eq!(results.remaining(), 1);
    }

    #[test]
    fn test_blank_term_matches_nothing() {
        let results = search_translation(&translation(), &SearchQuery::new("   "));
        assert_eq!(results.total, 0);
        assert!(results.hits.is_empty());
    }

    #[test]
    fn test_filters() {
        let ot = SearchQuery {
            testament: Some(Testament::Old),
            ..SearchQuery::new("x")
        };
        assert!(passes_filters("Malachi 1:1", &ot));
        assert!(!passes_filters("Matthew 1:1", &ot));
        assert!(!passes_filters("Test 1:1", &ot));

        let book = SearchQuery {
            book: Some("song of solomon".to_string()),
            ..SearchQuery::new("x")
        };
        assert!(passes_filters("Song of Solomon 2:1", &book));
        assert!(!passes_filters("Psalms 2:1", &book));
    }

    #[test]
    fn test_highlight_spans() {
        let spans = highlight_spans("Love is patient, love is kind. LOVE", "love");
        assert_eq!(
            spans,
            vec![
                HighlightSpan { start: 0, end: 4 },
                HighlightSpan { start: 17, end: 21 },
                HighlightSpan { start: 31, end: 35 },
            ]
        );
    }

    #[test]
    fn test_highlight_spans_do_not_overlap() {
        let spans = highlight_spans("aaaa", "aa");
        assert_eq!(
            spans,
            vec![HighlightSpan { start: 0, end: 2 }, HighlightSpan { start: 2, end: 4 }]
        );
    }

    #[test]
    fn test_highlight_non_ascii() {
        let text = "Ézéchiel écrit: ÉCRIT";
        let spans = highlight_spans(text, "écrit");
        assert_eq!(spans.len(), 2);
        assert_eq!(&text[spans[0].start..spans[0].end], "écrit");
        assert_eq!(&text[spans[1].start..spans[1].end], "ÉCRIT");
    }
}
