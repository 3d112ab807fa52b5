//! Scripture Index Library
//!
//! Loads Bible translations and a vote-weighted cross-reference list, then
//! answers verse lookups, keyword searches, cross-reference queries and
//! corpus statistics over the loaded data.
//!
//! # Example
//!
//! ```no_run
//! use scripture_index::prelude::*;
//!
//! let config = IndexConfig::default();
//!
//! // Load translations and cross-references
//! let index = ScriptureIndex::load(&config, false);
//! let query = index.query();
//!
//! if let Some(text) = query.get_verse("KJV", "John 3:16") {
//!     println!("{}", text);
//! }
//!
//! let results = query.search_keyword("KJV", &SearchQuery::new("faith love"));
//! println!("{} matches", results.total);
//!
//! for edge in query.cross_references("John 3:16", 5).edges {
//!     println!("{} ({} votes)", edge.target, edge.votes);
//! }
//! ```
//!
//! # Session Example
//!
//! ```no_run
//! use scripture_index::prelude::*;
//!
//! let config = IndexConfig::default();
//! let index = ScriptureIndex::load(&config, false);
//! let mut session = Session::new(&config.default_translation, config.history_limit);
//!
//! session.switch_translation(&index.store, "WEB");
//! if session.open_chapter("Genesis", 50) {
//!     // Continues into Exodus 1
//!     let next = session.next_chapter();
//!     println!("{:?}", next);
//! }
//! ```

pub mod books;
pub mod crossref;
pub mod models;
pub mod output;
pub mod query;
pub mod reference;
pub mod search;
pub mod session;
pub mod stats;
pub mod store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::books::{
        book_index, expand_code, find_book, next_chapter, prev_chapter, testament_books,
        testament_of, total_chapters, Book, BOOKS, OLD_TESTAMENT_BOOKS,
    };
    pub use crate::crossref::{
        load_cross_references, try_load_cross_references, CrossRefBuilder, CrossRefIndex,
    };
    pub use crate::models::{
        BookSummary, ChapterVerse, ChapterView, CrossRefEdge, CrossReferences, HighlightSpan,
        IndexConfig, ReferenceCount, SearchHit, SearchQuery, SearchResults, Statistics, Testament,
        TranslationInfo, TranslationVerse,
    };
    pub use crate::output::{
        clean_verse_text, mark_highlights, print_books, print_chapter, print_comparison,
        print_cross_references, print_search_results, print_statistics, print_translations,
        print_verse, truncate_text, write_json, write_json_file, OutputError,
    };
    pub use crate::query::{QueryEngine, ScriptureIndex};
    pub use crate::reference::{book_token, from_dotted, VerseRef};
    pub use crate::search::{highlight_spans, search_translation};
    pub use crate::session::{Bookmarks, History, Session};
    pub use crate::stats::{book_overview, compute_statistics, top_referenced, word_count};
    pub use crate::store::{
        load_translation, load_translation_with_fallback, load_translations, LoadError,
        Translation, VerseStore,
    };
}

// Re-export commonly used types at the crate root
pub use models::{IndexConfig, SearchQuery, SearchResults, Statistics, Testament};
pub use query::{QueryEngine, ScriptureIndex};
pub use store::{LoadError, Translation, VerseStore};
