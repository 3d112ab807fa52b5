//! Output formatting for query results (plain text and JSON).

use crate::models::{
    BookSummary, ChapterView, CrossReferences, HighlightSpan, SearchResults, Statistics,
    TranslationInfo, TranslationVerse,
};
use crate::query::QueryEngine;
use crate::reference::book_token;
use crate::stats::word_count;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Characters of verse text shown in cross-reference previews.
pub const PREVIEW_LEN: usize = 65;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write any result as pretty JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized, W: Write>(
    value: &T,
    writer: &mut W,
) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(value)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write any result as JSON to a file.
pub fn write_json_file<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(value, &mut file)
}

/// Remove heading markers and the brackets around translator insertions.
pub fn clean_verse_text(text: &str) -> String {
    text.replace("# ", "").replace(['[', ']'], "")
}

/// Truncate to `max_len` characters, appending "..." when cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}

/// Wrap every highlighted span in `**`. Spans must be sorted and
/// non-overlapping byte ranges on char boundaries.
pub fn mark_highlights(text: &str, spans: &[HighlightSpan]) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * 4);
    let mut last = 0;

    for span in spans {
        if span.start < last || span.end > text.len() {
            continue;
        }
        out.push_str(&text[last..span.start]);
        out.push_str("**");
        out.push_str(&text[span.start..span.end]);
        out.push_str("**");
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

pub fn print_verse(reference: &str, translation: &str, text: &str) {
    let plain = text.replace(['[', ']'], "");
    println!("\n=== {} ({}) ===", reference, translation);
    println!("Book: {}", book_token(reference));
    println!(
        "Stats: {} words, {} characters",
        word_count(&plain),
        plain.chars().count()
    );
    println!();
    println!("  {}", text.replace("# ", ""));
}

/// Print cross-references with a short preview of each target verse from
/// `translation`.
pub fn print_cross_references(refs: &CrossReferences, engine: &QueryEngine, translation: &str) {
    if refs.total == 0 {
        println!("\nNo cross-references for {}", refs.reference);
        return;
    }

    println!("\n=== Cross-References: {} ===", refs.reference);
    println!("Total found: {}", refs.total);
    println!("Showing: top {} by votes", refs.edges.len());
    println!();

    for (i, edge) in refs.edges.iter().enumerate() {
        println!("  [{}] {} ({} votes)", i + 1, edge.target, edge.votes);
        if let Some(text) = engine.get_verse(translation, &edge.target) {
            println!("      {}", clean_verse_text(&truncate_text(text, PREVIEW_LEN)));
        }
    }

    if refs.remaining() > 0 {
        println!("... and {} more references", refs.remaining());
    }
}

pub fn print_search_results(results: &SearchResults) {
    let mut filters = Vec::new();
    if let Some(t) = results.query.testament {
        filters.push(t.code().to_string());
    }
    if let Some(book) = &results.query.book {
        filters.push(book.clone());
    }
    if results.query.exact_phrase {
        filters.push("exact phrase".to_string());
    }

    println!("\n=== Search: \"{}\" ({}) ===", results.query.term, results.translation);
    if !filters.is_empty() {
        println!("Filters: {}", filters.join(", "));
    }
    println!("Matches: {}", results.total);
    println!();

    for hit in &results.hits {
        let text = mark_highlights(&hit.text, &hit.highlights);
        println!("  {}: {}", hit.reference, text.replace("# ", ""));
    }

    if results.remaining() > 0 {
        println!("... and {} more results", results.remaining());
    }
}

pub fn print_chapter(view: &ChapterView) {
    println!("\n=== {} {} ({}) ===", view.book, view.chapter, view.translation);
    println!(
        "Verses: {}, words: {} (avg {} per verse)",
        view.verses.len(),
        view.total_words,
        view.avg_words_per_verse
    );
    println!();

    for verse in &view.verses {
        println!("  {:>3}  {}", verse.verse, clean_verse_text(&verse.text));
    }
}

pub fn print_comparison(reference: &str, rows: &[TranslationVerse]) {
    println!("\n=== {} across translations ===", reference);
    for row in rows {
        match &row.text {
            Some(text) => println!("  {:<4} {}", row.translation, clean_verse_text(text)),
            None => println!("  {:<4} (not available)", row.translation),
        }
    }
}

pub fn print_statistics(stats: &Statistics) {
    println!("\n=== Statistics ({}) ===", stats.translation);
    println!();
    println!("Text:");
    println!("  Verses: {}", stats.total_verses);
    println!("  Words: {}", stats.total_words);
    println!("  Avg words per verse: {}", stats.avg_words_per_verse);
    println!(
        "  Books: {} of {}",
        stats.books_present, stats.canonical_books
    );
    println!(
        "  Chapters: {} of {}",
        stats.chapters_present, stats.canonical_chapters
    );
    println!();
    println!("Cross-references:");
    println!("  Total edges: {}", stats.total_cross_refs);
    println!("  Referenced verses: {}", stats.referenced_verses);
    println!("  Avg edges per referenced verse: {}", stats.avg_refs_per_verse);
    println!("  Coverage: {}%", stats.coverage_percent);

    if !stats.top_referenced.is_empty() {
        println!();
        println!("Most referenced:");
        for (i, entry) in stats.top_referenced.iter().enumerate() {
            println!("  {:>2}. {} ({} references)", i + 1, entry.reference, entry.count);
        }
    }
}

pub fn print_books(books: &[BookSummary]) {
    println!("\n=== Books ===");
    let mut testament = None;
    for book in books {
        if testament != Some(book.testament) {
            testament = Some(book.testament);
            println!("\n{}:", book.testament.code());
        }
        println!(
            "  {:>2}. {:<16} {:>3}/{:<3} chapters",
            book.position, book.name, book.chapters_present, book.canonical_chapters
        );
    }
}

/// `loaded` lists the ids actually present in the store.
pub fn print_translations(infos: &[TranslationInfo], loaded: &[&str], current: &str) {
    println!("\n=== Translations ===");
    for info in infos {
        let status = if loaded.iter().any(|id| id.eq_ignore_ascii_case(&info.id)) {
            "loaded"
        } else {
            "missing"
        };
        let marker = if info.id.eq_ignore_ascii_case(current) {
            "*"
        } else {
            " "
        };
        println!(
            " {} {:<4} {} ({}) [{}]",
            marker, info.id, info.name, info.year, status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrossRefEdge, SearchQuery};

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_text("In the beginning", 6), "In the...");
        assert_eq!(truncate_text("Ésaïe", 3), "Ésa...");
    }

    #[test]
    fn test_clean_verse_text() {
        assert_eq!(
            clean_verse_text("# And the earth was [without] form"),
            "And the earth was without form"
        );
    }

    #[test]
    fn test_mark_highlights() {
        let text = "Love is patient, love is kind.";
        let spans = [
            HighlightSpan { start: 0, end: 4 },
            HighlightSpan { start: 17, end: 21 },
        ];
        assert_eq!(
            mark_highlights(text, &spans),
            "**Love** is patient, **love** is kind."
        );
        assert_eq!(mark_highlights(text, &[]), text);
    }

    #[test]
    fn test_write_json_search_results() {
        let results = SearchResults {
            query: SearchQuery::new("love"),
            translation: "KJV".to_string(),
            total: 1,
            hits: Vec::new(),
        };
        let mut buf = Vec::new();
        write_json(&results, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["translation"], "KJV");
        assert_eq!(value["query"]["term"], "love");
        assert_eq!(value["query"]["limit"], 15);
    }

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refs.json");
        let refs = CrossReferences {
            reference: "Genesis 1:1".to_string(),
            total: 1,
            edges: vec![CrossRefEdge {
                target: "John 1:1".to_string(),
                votes: 42,
            }],
        };
        write_json_file(&refs, &path).unwrap();

        let back: CrossReferences =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.edges, refs.edges);
    }
}
