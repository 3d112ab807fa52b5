//! Canonical book catalog.
//!
//! The 66 books in canonical order with their dotted shorthand codes and
//! chapter counts. Testament membership, book ordering and chapter
//! navigation are all derived from this table rather than from the shape of
//! reference strings.

use crate::models::Testament;

/// A canonical book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
    pub name: &'static str,
    pub code: &'static str, // Dotted shorthand used by the cross-reference data
    pub chapters: u32,
}

const fn book(name: &'static str, code: &'static str, chapters: u32) -> Book {
    Book {
        name,
        code,
        chapters,
    }
}

/// Number of Old Testament books at the head of [`BOOKS`].
pub const OLD_TESTAMENT_BOOKS: usize = 39;

pub const BOOKS: [Book; 66] = [
    // Old Testament
    book("Genesis", "Gen", 50),
    book("Exodus", "Exod", 40),
    book("Leviticus", "Lev", 27),
    book("Numbers", "Num", 36),
    book("Deuteronomy", "Deut", 34),
    book("Joshua", "Josh", 24),
    book("Judges", "Judg", 21),
    book("Ruth", "Ruth", 4),
    book("1 Samuel", "1Sam", 31),
    book("2 Samuel", "2Sam", 24),
    book("1 Kings", "1Kgs", 22),
    book("2 Kings", "2Kgs", 25),
    book("1 Chronicles", "1Chr", 29),
    book("2 Chronicles", "2Chr", 36),
    book("Ezra", "Ezra", 10),
    book("Nehemiah", "Neh", 13),
    book("Esther", "Esth", 10),
    book("Job", "Job", 42),
    book("Psalms", "Ps", 150),
    book("Proverbs", "Prov", 31),
    book("Ecclesiastes", "Eccl", 12),
    book("Song of Solomon", "Song", 8),
    book("Isaiah", "Isa", 66),
    book("Jeremiah", "Jer", 52),
    book("Lamentations", "Lam", 5),
    book("Ezekiel", "Ezek", 48),
    book("Daniel", "Dan", 12),
    book("Hosea", "Hos", 14),
    book("Joel", "Joel", 3),
    book("Amos", "Amos", 9),
    book("Obadiah", "Obad", 1),
    book("Jonah", "Jonah", 4),
    book("Micah", "Mic", 7),
    book("Nahum", "Nah", 3),
    book("Habakkuk", "Hab", 3),
    book("Zephaniah", "Zeph", 3),
    book("Haggai", "Hag", 2),
    book("Zechariah", "Zech", 14),
    book("Malachi", "Mal", 4),
    // New Testament
    book("Matthew", "Matt", 28),
    book("Mark", "Mark", 16),
    book("Luke", "Luke", 24),
    book("John", "John", 21),
    book("Acts", "Acts", 28),
    book("Romans", "Rom", 16),
    book("1 Corinthians", "1Cor", 16),
    book("2 Corinthians", "2Cor", 13),
    book("Galatians", "Gal", 6),
    book("Ephesians", "Eph", 6),
    book("Philippians", "Phil", 4),
    book("Colossians", "Col", 4),
    book("1 Thessalonians", "1Thess", 5),
    book("2 Thessalonians", "2Thess", 3),
    book("1 Timothy", "1Tim", 6),
    book("2 Timothy", "2Tim", 4),
    book("Titus", "Titus", 3),
    book("Philemon", "Phlm", 1),
    book("Hebrews", "Heb", 13),
    book("James", "Jas", 5),
    book("1 Peter", "1Pet", 5),
    book("2 Peter", "2Pet", 3),
    book("1 John", "1John", 5),
    book("2 John", "2John", 1),
    book("3 John", "3John", 1),
    book("Jude", "Jude", 1),
    book("Revelation", "Rev", 22),
];

/// Position of a book by exact canonical name.
pub fn book_index(name: &str) -> Option<usize> {
    BOOKS.iter().position(|b| b.name == name)
}

/// Look up a book by name, ignoring case and surrounding whitespace.
pub fn find_book(name: &str) -> Option<&'static Book> {
    let name = name.trim();
    BOOKS.iter().find(|b| b.name.eq_ignore_ascii_case(name))
}

/// Testament of a canonical book name. Unknown names have none.
pub fn testament_of(name: &str) -> Option<Testament> {
    book_index(name).map(|idx| {
        if idx < OLD_TESTAMENT_BOOKS {
            Testament::Old
        } else {
            Testament::New
        }
    })
}

/// Books of one testament, in canonical order.
pub fn testament_books(testament: Testament) -> &'static [Book] {
    match testament {
        Testament::Old => &BOOKS[..OLD_TESTAMENT_BOOKS],
        Testament::New => &BOOKS[OLD_TESTAMENT_BOOKS..],
    }
}

/// Expand a dotted shorthand code (`1Sam`) to its canonical name.
/// Unknown codes are returned unchanged.
pub fn expand_code(code: &str) -> &str {
    BOOKS
        .iter()
        .find(|b| b.code == code)
        .map(|b| b.name)
        .unwrap_or(code)
}

/// Total chapters across the canon.
pub fn total_chapters() -> u32 {
    BOOKS.iter().map(|b| b.chapters).sum()
}

/// The chapter after `book chapter`, continuing into the next book.
/// `None` after Revelation 22 or for books outside the catalog.
pub fn next_chapter(book: &str, chapter: u32) -> Option<(&'static str, u32)> {
    let idx = find_book(book).and_then(|b| book_index(b.name))?;
    let current = &BOOKS[idx];

    if chapter < current.chapters {
        Some((current.name, chapter + 1))
    } else {
        BOOKS.get(idx + 1).map(|next| (next.name, 1))
    }
}

/// The chapter before `book chapter`, continuing into the last chapter of
/// the previous book. `None` at Genesis 1.
pub fn prev_chapter(book: &str, chapter: u32) -> Option<(&'static str, u32)> {
    let idx = find_book(book).and_then(|b| book_index(b.name))?;

    if chapter > 1 {
        // Clamp in case the caller is past the end of the book
        let current = &BOOKS[idx];
        Some((current.name, (chapter - 1).min(current.chapters)))
    } else if idx > 0 {
        let prev = &BOOKS[idx - 1];
        Some((prev.name, prev.chapters))
    } else {
        None
    }
}
