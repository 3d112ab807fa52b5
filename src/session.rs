//! Interactive reading session.
//!
//! Holds the per-user state a presentation layer needs between queries:
//! the active translation, recently viewed references, bookmarks and the
//! chapter being read. The query engine never sees any of it.

use crate::books::{find_book, next_chapter, prev_chapter};
use crate::store::VerseStore;
use std::collections::VecDeque;
use tracing::debug;

/// Recently viewed references, oldest first
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Record a view. A reference already present moves to the end; the
    /// oldest entry is dropped once the limit is exceeded.
    pub fn record(&mut self, reference: &str) {
        if self.limit == 0 {
            return;
        }
        if let Some(pos) = self.entries.iter().position(|r| r == reference) {
            self.entries.remove(pos);
        }
        self.entries.push_back(reference.to_string());
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// Up to `n` entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<&str> {
        self.entries.iter().rev().take(n).map(|s| s.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Unique references in insertion order
#[derive(Debug, Clone, Default)]
pub struct Bookmarks {
    entries: Vec<String>,
}

impl Bookmarks {
    /// Returns false if the reference was already bookmarked.
    pub fn add(&mut self, reference: &str) -> bool {
        if self.contains(reference) {
            return false;
        }
        self.entries.push(reference.to_string());
        true
    }

    pub fn remove(&mut self, reference: &str) -> bool {
        match self.entries.iter().position(|r| r == reference) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.entries.iter().any(|r| r == reference)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    translation: String,
    pub history: History,
    pub bookmarks: Bookmarks,
    current_chapter: Option<(String, u32)>,
}

impl Session {
    pub fn new(translation: &str, history_limit: usize) -> Self {
        Self {
            translation: translation.to_string(),
            history: History::new(history_limit),
            bookmarks: Bookmarks::default(),
            current_chapter: None,
        }
    }

    /// Active translation id.
    pub fn translation(&self) -> &str {
        &self.translation
    }

    /// Switch to a loaded translation. Unknown ids leave the session
    /// unchanged and return false.
    pub fn switch_translation(&mut self, store: &VerseStore, id: &str) -> bool {
        match store.translation(id) {
            Some(t) => {
                self.translation = t.id().to_string();
                true
            }
            None => {
                debug!(translation = %id, "translation not loaded, keeping current");
                false
            }
        }
    }

    pub fn record_view(&mut self, reference: &str) {
        self.history.record(reference);
    }

    /// Set the chapter being read. Books outside the catalog and chapters
    /// past the end of the book are rejected.
    pub fn open_chapter(&mut self, book: &str, chapter: u32) -> bool {
        match find_book(book) {
            Some(b) if chapter >= 1 && chapter <= b.chapters => {
                self.current_chapter = Some((b.name.to_string(), chapter));
                true
            }
            _ => false,
        }
    }

    pub fn current_chapter(&self) -> Option<(&str, u32)> {
        self.current_chapter
            .as_ref()
            .map(|(book, chapter)| (book.as_str(), *chapter))
    }

    /// Advance to the following chapter, crossing into the next book.
    /// Stays put at the end of the canon.
    pub fn next_chapter(&mut self) -> Option<(&str, u32)> {
        let (book, chapter) = self.current_chapter.as_ref()?;
        let (book, chapter) = next_chapter(book, *chapter)?;
        self.current_chapter = Some((book.to_string(), chapter));
        self.current_chapter()
    }

    /// Step back to the previous chapter. Stays put at Genesis 1.
    pub fn prev_chapter(&mut self) -> Option<(&str, u32)> {
        let (book, chapter) = self.current_chapter.as_ref()?;
        let (book, chapter) = prev_chapter(book, *chapter)?;
        self.current_chapter = Some((book.to_string(), chapter));
        self.current_chapter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Translation;

    #[test]
    fn test_history_cap_and_move_to_end() {
        let mut history = History::new(50);
        for i in 1..=60 {
            history.record(&format!("Psalms {}:1", i));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.iter().next(), Some("Psalms 11:1"));

        history.record("Psalms 20:1");
        assert_eq!(history.len(), 50);
        assert_eq!(history.recent(2), vec!["Psalms 20:1", "Psalms 60:1"]);
        assert_eq!(history.iter().filter(|r| *r == "Psalms 20:1").count(), 1);
    }

    #[test]
    fn test_bookmarks_unique() {
        let mut bookmarks = Bookmarks::default();
        assert!(bookmarks.add("John 3:16"));
        assert!(bookmarks.add("Romans 8:28"));
        assert!(!bookmarks.add("John 3:16"));
        assert_eq!(bookmarks.iter().collect::<Vec<_>>(), vec!["John 3:16", "Romans 8:28"]);

        assert!(bookmarks.remove("John 3:16"));
        assert!(!bookmarks.remove("John 3:16"));
        assert_eq!(bookmarks.len(), 1);
    }

    #[test]
    fn test_switch_translation() {
        let mut store = VerseStore::new();
        store.insert(Translation::from_pairs("WEB", vec![("John 1:1", "In the beginning")]));

        let mut session = Session::new("KJV", 50);
        assert!(!session.switch_translation(&store, "YLT"));
        assert_eq!(session.translation(), "KJV");
        assert!(session.switch_translation(&store, "web"));
        assert_eq!(session.translation(), "WEB");
    }

    #[test]
    fn test_chapter_navigation() {
        let mut session = Session::new("KJV", 50);
        assert_eq!(session.next_chapter(), None);

        assert!(!session.open_chapter("Genesis", 51));
        assert!(session.open_chapter("genesis", 50));
        assert_eq!(session.next_chapter(), Some(("Exodus", 1)));
        assert_eq!(session.prev_chapter(), Some(("Genesis", 50)));

        assert!(session.open_chapter("Genesis", 1));
        assert_eq!(session.prev_chapter(), None);
        assert_eq!(session.current_chapter(), Some(("Genesis", 1)));

        assert!(session.open_chapter("Revelation", 22));
        assert_eq!(session.next_chapter(), None);
        assert_eq!(session.current_chapter(), Some(("Revelation", 22)));
    }
}
