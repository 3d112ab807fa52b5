//! Verse store: translations loaded from JSON files.
//!
//! A translation file is a single JSON object mapping canonical references
//! to verse text. Key order in the file is kept, since search results are
//! reported in that order.

use crate::models::{IndexConfig, TranslationInfo};
use rayon::prelude::*;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("resource not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed data in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn is_missing(&self) -> bool {
        matches!(self, LoadError::Missing(_))
    }
}

/// Read a whole resource as UTF-8, reporting absence separately from other
/// IO failures.
pub fn read_resource(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            LoadError::Missing(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// A named, immutable set of verse texts keyed by reference
#[derive(Debug, Clone, Default)]
pub struct Translation {
    id: String,
    verses: Vec<(String, String)>,     // (reference, text) in source order
    positions: HashMap<String, usize>, // reference -> index into verses
}

impl Translation {
    /// Build from (reference, text) pairs. A repeated reference keeps its
    /// first position and takes the later text.
    pub fn from_pairs<I, K, V>(id: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut verses: Vec<(String, String)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (reference, text) in pairs {
            let reference = reference.into();
            let text = text.into();
            match positions.get(&reference) {
                Some(&idx) => verses[idx].1 = text,
                None => {
                    positions.insert(reference.clone(), verses.len());
                    verses.push((reference, text));
                }
            }
        }

        Translation {
            id: id.to_string(),
            verses,
            positions,
        }
    }

    /// Parse a translation from its JSON object text.
    pub fn from_json_str(id: &str, json: &str) -> Result<Self, serde_json::Error> {
        let OrderedVerses(pairs) = serde_json::from_str(json)?;
        Ok(Self::from_pairs(id, pairs))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Exact-key lookup only.
    pub fn get_exact(&self, reference: &str) -> Option<&str> {
        self.positions
            .get(reference)
            .map(|&idx| self.verses[idx].1.as_str())
    }

    /// Exact lookup, falling back to a case-insensitive scan of all keys.
    pub fn get(&self, reference: &str) -> Option<&str> {
        self.get_exact(reference)
            .or_else(|| self.canonical_key(reference).and_then(|k| self.get_exact(k)))
    }

    /// The stored key matching `reference` case-insensitively.
    pub fn canonical_key(&self, reference: &str) -> Option<&str> {
        if let Some(&idx) = self.positions.get(reference) {
            return Some(self.verses[idx].0.as_str());
        }
        let wanted = reference.to_lowercase();
        self.verses
            .iter()
            .find(|(key, _)| key.to_lowercase() == wanted)
            .map(|(key, _)| key.as_str())
    }

    /// (reference, text) pairs in source order.
    pub fn verses(&self) -> &[(String, String)] {
        &self.verses
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.verses.iter().map(|(r, t)| (r.as_str(), t.as_str()))
    }
}

/// JSON object deserialized as an ordered list of entries
struct OrderedVerses(Vec<(String, String)>);

impl<'de> Deserialize<'de> for OrderedVerses {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VersesVisitor;

        impl<'de> Visitor<'de> for VersesVisitor {
            type Value = OrderedVerses;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping verse references to verse text")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut verses = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((reference, text)) = map.next_entry::<String, String>()? {
                    verses.push((reference, text));
                }
                Ok(OrderedVerses(verses))
            }
        }

        deserializer.deserialize_map(VersesVisitor)
    }
}

/// Load one translation file.
pub fn load_translation(id: &str, path: &Path) -> Result<Translation, LoadError> {
    let json = read_resource(path)?;
    Translation::from_json_str(id, &json).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a translation, trying each of its configured files in order.
/// Only a missing file moves on to the next candidate.
pub fn load_translation_with_fallback(
    data_dir: &Path,
    info: &TranslationInfo,
) -> Result<Translation, LoadError> {
    let mut last_missing = None;

    for file in &info.files {
        let path = data_dir.join(file);
        match load_translation(&info.id, &path) {
            Err(LoadError::Missing(p)) => {
                debug!(translation = %info.id, path = %p.display(), "translation file not found");
                last_missing = Some(LoadError::Missing(p));
            }
            other => return other,
        }
    }

    Err(last_missing.unwrap_or_else(|| LoadError::Missing(data_dir.to_path_buf())))
}

/// All loaded translations
#[derive(Debug, Default)]
pub struct VerseStore {
    translations: HashMap<String, Translation>,
}

impl VerseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a translation.
    pub fn insert(&mut self, translation: Translation) {
        self.translations
            .insert(translation.id().to_string(), translation);
    }

    /// Translation by id; exact first, then ignoring ASCII case.
    pub fn translation(&self, id: &str) -> Option<&Translation> {
        self.translations.get(id).or_else(|| {
            self.translations
                .values()
                .find(|t| t.id().eq_ignore_ascii_case(id))
        })
    }

    /// Verse text from one translation.
    pub fn get(&self, translation_id: &str, reference: &str) -> Option<&str> {
        self.translation(translation_id)?.get(reference)
    }

    /// Loaded translation ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.translations.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }
}

/// Load every configured translation in parallel.
///
/// Each load is independent: a missing or malformed file is logged and that
/// translation is left out, while the others still land in the store.
pub fn load_translations(config: &IndexConfig) -> VerseStore {
    let results: Vec<(&TranslationInfo, Result<Translation, LoadError>)> = config
        .translations
        .par_iter()
        .map(|info| (info, load_translation_with_fallback(&config.data_dir, info)))
        .collect();

    let mut store = VerseStore::new();

    for (info, result) in results {
        let is_default = info.id.eq_ignore_ascii_case(&config.default_translation);
        match result {
            Ok(translation) => {
                info!(
                    translation = %info.id,
                    name = %info.name,
                    verses = translation.len(),
                    "translation loaded"
                );
                store.insert(translation);
            }
            Err(e) if is_expected_absence(&e, is_default) => {
                info!(translation = %info.id, error = %e, "translation not available, skipping");
            }
            Err(e) => {
                warn!(translation = %info.id, error = %e, "failed to load translation");
            }
        }
    }

    if store.translation(&config.default_translation).is_none() {
        error!(
            translation = %config.default_translation,
            "default translation unavailable; queries against it will return no results"
        );
    }

    store
}

/// A missing optional translation is routine; anything else is worth a
/// warning.
fn is_expected_absence(error: &LoadError, is_default: bool) -> bool {
    error.is_missing() && !is_default
}
