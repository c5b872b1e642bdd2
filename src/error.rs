//! Error taxonomy for descriptor resolution, dictionary loading and translation.

use std::path::PathBuf;
use thiserror::Error;

/// A translation marker exists but the test cannot be re-run as declared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("test `{0}` is not registered")]
    UnknownTest(String),

    #[error("test `{0}` is registered more than once")]
    DuplicateTest(String),

    #[error("test `{test}` enables i18n checks but declares no dictionary path")]
    MissingDictionaryPath { test: String },

    #[error("test `{test}` declares no data source")]
    NoDataSource { test: String },

    #[error("data source `{name}` for test `{test}` not found on `{class}`")]
    DataSourceNotFound {
        test: String,
        class: String,
        name: String,
    },

    #[error("data source `{name}` for test `{test}` is ambiguous: {count} matches on `{class}`")]
    AmbiguousDataSource {
        test: String,
        class: String,
        name: String,
        count: usize,
    },

    #[error("test `{test}` translates argument position(s) {positions:?} but its data source supplies {arity} argument(s)")]
    PositionsOutOfRange {
        test: String,
        positions: Vec<usize>,
        arity: usize,
    },
}

/// The dictionary resource could not be acquired.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read dictionary at {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dictionary at {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: DictionaryParseError,
    },
}

impl DictionaryError {
    /// Whether the resource was absent (as opposed to present but unusable).
    pub fn is_not_found(&self) -> bool {
        matches!(self, DictionaryError::NotFound { .. })
    }
}

/// Dictionary content that is not a valid dictionary.
#[derive(Debug, Error)]
pub enum DictionaryParseError {
    #[error("not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("`languages` contains an empty language code")]
    EmptyLanguage,

    #[error("language `{0}` is declared more than once")]
    DuplicateLanguage(String),
}

/// A keyword or language is absent from an otherwise valid dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no `{language}` translation for keyword {keyword:?}")]
pub struct TranslationMissingError {
    pub keyword: String,
    pub language: String,
}

/// Every keyword of one argument vector that lacks a translation for `language`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} argument(s) lack a `{language}` translation: {}", missing.len(), keywords(missing))]
pub struct MissingTranslations {
    pub language: String,
    pub missing: Vec<TranslationMissingError>,
}

fn keywords(missing: &[TranslationMissingError]) -> String {
    missing
        .iter()
        .map(|m| format!("{:?}", m.keyword))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure raised while re-invoking a test.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The test logic itself failed: a genuine locale defect.
    #[error("test logic failed: {0:#}")]
    Failed(anyhow::Error),

    /// The test logic panicked.
    #[error("test logic panicked: {0}")]
    Panicked(String),

    /// The instance provider could not build a fixture.
    #[error("cannot instantiate `{class}`: {source:#}")]
    Instantiation {
        class: String,
        #[source]
        source: anyhow::Error,
    },

    /// A data source returned an error or panicked.
    #[error("data source `{name}` on `{class}` failed: {source:#}")]
    DataSource {
        class: String,
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// No method or data source with this name is registered on the class.
    #[error("cannot bind method `{method}` on `{class}`")]
    UnboundMethod { class: String, method: String },
}

impl InvocationError {
    /// Whether this error reflects the logic under test rather than the
    /// invocation machinery.
    pub fn is_test_failure(&self) -> bool {
        matches!(self, InvocationError::Failed(_) | InvocationError::Panicked(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_translations_lists_keywords() {
        let err = MissingTranslations {
            language: "fr".to_string(),
            missing: vec![
                TranslationMissingError {
                    keyword: "hello".to_string(),
                    language: "fr".to_string(),
                },
                TranslationMissingError {
                    keyword: "bye".to_string(),
                    language: "fr".to_string(),
                },
            ],
        };

        let message = err.to_string();
        assert!(message.starts_with("2 argument(s) lack a `fr` translation"));
        assert!(message.contains("\"hello\", \"bye\""));
    }

    #[test]
    fn test_dictionary_error_not_found() {
        let err = DictionaryError::NotFound {
            path: PathBuf::from("missing.json"),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_invocation_error_classification() {
        assert!(InvocationError::Failed(anyhow::anyhow!("boom")).is_test_failure());
        assert!(InvocationError::Panicked("boom".to_string()).is_test_failure());
        assert!(!InvocationError::UnboundMethod {
            class: "Mirror".to_string(),
            method: "ask".to_string(),
        }
        .is_test_failure());
    }

    #[test]
    fn test_data_source_error_names_source() {
        let err = InvocationError::DataSource {
            class: "Mirror".to_string(),
            name: "dp".to_string(),
            source: anyhow::anyhow!("db gone"),
        };
        assert!(!err.is_test_failure());
        assert_eq!(err.to_string(), "data source `dp` on `Mirror` failed: db gone");
    }
}
