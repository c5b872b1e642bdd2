//! Dictionary resource: keyword → per-language translations.
//!
//! A dictionary is parsed fresh from its JSON resource for every i18n pass and
//! dropped afterwards. It is never mutated after loading.
//!
//! ```json
//! {
//!   "languages": ["es", "fr"],
//!   "entries": {
//!     "Who will win the World Cup": { "es": "¿Quién ganará la Copa del Mundo?" }
//!   }
//! }
//! ```

use crate::error::{DictionaryError, DictionaryParseError, TranslationMissingError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::io::ErrorKind;
use std::path::Path;

/// On-disk shape. Both sections are required.
#[derive(Debug, Deserialize)]
struct RawDictionary {
    languages: Vec<String>,
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

/// Parsed, immutable translation dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    languages: Vec<String>,
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl Dictionary {
    /// Read and parse the dictionary at `path`.
    ///
    /// # Errors
    /// * `DictionaryError::NotFound` if nothing exists at `path`
    /// * `DictionaryError::Unreadable` for any other I/O failure
    /// * `DictionaryError::Format` if the content is not UTF-8 or not a valid
    ///   dictionary
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DictionaryError::NotFound {
                path: path.to_path_buf(),
            },
            _ => DictionaryError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        std::str::from_utf8(&bytes)
            .map_err(DictionaryParseError::from)
            .and_then(Self::parse)
            .map_err(|source| DictionaryError::Format {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Parse dictionary JSON.
    pub fn parse(json: &str) -> Result<Self, DictionaryParseError> {
        let raw: RawDictionary = serde_json::from_str(json)?;

        let mut seen = HashSet::new();
        for language in &raw.languages {
            if language.trim().is_empty() {
                return Err(DictionaryParseError::EmptyLanguage);
            }
            if !seen.insert(language.as_str()) {
                return Err(DictionaryParseError::DuplicateLanguage(language.clone()));
            }
        }

        Ok(Self {
            languages: raw.languages,
            entries: raw.entries,
        })
    }

    /// Declared languages, in declaration order.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Look up the `language` translation of `keyword`.
    ///
    /// An empty translation counts as missing.
    pub fn translate(&self, keyword: &str, language: &str) -> Result<&str, TranslationMissingError> {
        self.entries
            .get(keyword)
            .and_then(|entry| entry.get(language))
            .map(String::as_str)
            .filter(|translation| !translation.is_empty())
            .ok_or_else(|| TranslationMissingError {
                keyword: keyword.to_string(),
                language: language.to_string(),
            })
    }

    /// Iterate entries as `(keyword, language → translation)`, sorted by keyword.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
