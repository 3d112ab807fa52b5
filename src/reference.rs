//! Verse reference handling.
//!
//! Canonical references look like `"John 3:16"` or `"Song of Solomon 1:1"`.
//! The cross-reference data uses a dotted shorthand (`John.3.16`,
//! `Ps.23.1-Ps.23.2`) which is converted here.

use crate::books::expand_code;
use std::fmt;

/// A parsed canonical reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseRef {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseRef {
    /// Parse `"<Book> <chapter>:<verse>"`. Chapter and verse must be
    /// positive integers.
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        let (book, chapter_verse) = reference.rsplit_once(char::is_whitespace)?;
        let (chapter, verse) = chapter_verse.split_once(':')?;

        let chapter: u32 = chapter.parse().ok().filter(|&c| c > 0)?;
        let verse: u32 = verse.parse().ok().filter(|&v| v > 0)?;
        let book = book.trim_end();
        if book.is_empty() {
            return None;
        }

        Some(VerseRef {
            book: book.to_string(),
            chapter,
            verse,
        })
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// Book portion of a reference: every token before the trailing
/// `chapter:verse` (or bare chapter) token. A reference without such a
/// token is returned whole.
pub fn book_token(reference: &str) -> &str {
    let trimmed = reference.trim();
    match trimmed.rsplit_once(char::is_whitespace) {
        Some((book, last))
            if last.contains(':') || last.chars().all(|c| c.is_ascii_digit()) =>
        {
            book.trim_end()
        }
        _ => trimmed,
    }
}

/// Convert a dotted shorthand reference to canonical form.
///
/// `Gen.1.1` becomes `Genesis 1:1`; a range such as `Ps.23.1-Ps.23.2`
/// collapses to its start endpoint. Input that does not have at least
/// three dotted parts is returned unchanged, and unknown book codes pass
/// through as-is.
pub fn from_dotted(raw: &str) -> String {
    let start = match raw.split_once('-') {
        Some((start, _)) => start,
        None => raw,
    };

    let parts: Vec<&str> = start.split('.').collect();
    if parts.len() < 3 {
        return start.to_string();
    }

    let book = expand_code(parts[0]);
    format!(
        "{} {}:{}",
        book,
        strip_leading_zeros(parts[1]),
        strip_leading_zeros(parts[2])
    )
}

/// Render numeric components without leading zeros; anything else untouched.
fn strip_leading_zeros(part: &str) -> String {
    match part.parse::<u32>() {
        Ok(n) => n.to_string(),
        Err(_) => part.to_string(),
    }
}
