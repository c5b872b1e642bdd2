//! Argument translation: builds a per-language copy of an argument vector.

use super::Dictionary;
use crate::args::ArgumentVector;
use crate::error::{MissingTranslations, TranslationMissingError};
use serde_json::Value;
use std::collections::BTreeSet;

/// Which argument positions are eligible for translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TranslatablePositions {
    /// Every top-level string argument.
    #[default]
    AllStrings,
    /// Only the listed indices, and only where they hold a string.
    Only(BTreeSet<usize>),
}

impl TranslatablePositions {
    pub fn only(positions: impl IntoIterator<Item = usize>) -> Self {
        Self::Only(positions.into_iter().collect())
    }

    /// Listed positions that do not exist in a row of `arity` arguments.
    pub fn out_of_range(&self, arity: usize) -> Vec<usize> {
        match self {
            Self::AllStrings => Vec::new(),
            Self::Only(positions) => positions.range(arity..).copied().collect(),
        }
    }

    pub fn includes(&self, index: usize) -> bool {
        match self {
            Self::AllStrings => true,
            Self::Only(positions) => positions.contains(&index),
        }
    }
}

/// Translates argument vectors against one dictionary.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'d> {
    dictionary: &'d Dictionary,
    positions: &'d TranslatablePositions,
}

static ALL_STRINGS: TranslatablePositions = TranslatablePositions::AllStrings;

impl<'d> Translator<'d> {
    pub fn new(dictionary: &'d Dictionary, positions: &'d TranslatablePositions) -> Self {
        Self {
            dictionary,
            positions,
        }
    }

    /// Translator that treats every string argument as translatable.
    pub fn all_strings(dictionary: &'d Dictionary) -> Self {
        Self::new(dictionary, &ALL_STRINGS)
    }

    /// Build a new vector with translatable strings replaced by their
    /// `language` translation. Other values are cloned unchanged; nested
    /// strings inside arrays or objects are never touched.
    ///
    /// Every translatable position is visited before failing so that the
    /// error lists all keywords lacking coverage for `language`.
    pub fn translate_arguments(
        &self,
        original: &ArgumentVector,
        language: &str,
    ) -> Result<ArgumentVector, MissingTranslations> {
        let mut missing: Vec<TranslationMissingError> = Vec::new();

        let translated: ArgumentVector = original
            .iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::String(keyword) if self.positions.includes(index) => {
                    match self.dictionary.translate(keyword, language) {
                        Ok(translation) => Value::String(translation.to_string()),
                        Err(e) => {
                            missing.push(e);
                            value.clone()
                        }
                    }
                }
                other => other.clone(),
            })
            .collect();

        if missing.is_empty() {
            Ok(translated)
        } else {
            Err(MissingTranslations {
                language: language.to_string(),
                missing,
            })
        }
    }
}

/// Translate every string argument of `original` into `language`.
pub fn translate_arguments(
    original: &ArgumentVector,
    language: &str,
    dictionary: &Dictionary,
) -> Result<ArgumentVector, MissingTranslations> {
    Translator::all_strings(dictionary).translate_arguments(original, language)
}
