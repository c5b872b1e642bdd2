//! Re-invocation engine.
//!
//! Given a resolved test that has just passed, the engine loads the test's
//! dictionary, takes the first row of its data source and re-runs the test
//! once per language with that row translated. Each run gets a fresh fixture.
//!
//! Per test the engine moves through:
//!
//! ```text
//! Idle -> DictionaryLoading -> Skipped
//!                           -> Iterating -> (Translating -> Invoking)* -> Done
//! ```
//!
//! A failure in one language never stops the remaining languages. A failed
//! dictionary load stops only this test's pass and leaves the original result
//! untouched.

use crate::args::ArgumentVector;
use crate::config::RunnerConfig;
use crate::error::{ConfigurationError, DictionaryError, InvocationError, MissingTranslations};
use crate::host::TestResult;
use crate::i18n::{CoverageAuditor, Dictionary, Translator};
use crate::resolver::ResolvedTest;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Why a language run failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureCause {
    /// Arguments could not be translated; lists every uncovered keyword.
    MissingTranslations { keywords: Vec<String> },
    /// The test logic failed or panicked on the translated arguments.
    TestFailed { message: String },
}

impl FailureCause {
    fn missing(err: &MissingTranslations) -> Self {
        Self::MissingTranslations {
            keywords: err.missing.iter().map(|m| m.keyword.clone()).collect(),
        }
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTranslations { keywords } => {
                write!(f, "missing translations for {:?}", keywords)
            }
            Self::TestFailed { message } => f.write_str(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LanguageStatus {
    Passed,
    Failed { cause: FailureCause },
    /// The invocation machinery failed; says nothing about the test logic.
    Inconclusive { reason: String },
}

/// Outcome of re-running a test in one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerLanguageOutcome {
    pub language: String,
    #[serde(flatten)]
    pub status: LanguageStatus,
    /// Translated arguments, when translation succeeded.
    pub arguments: Option<ArgumentVector>,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

impl PerLanguageOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self.status, LanguageStatus::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, LanguageStatus::Failed { .. })
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self.status, LanguageStatus::Inconclusive { .. })
    }
}

/// Why an i18n pass was abandoned before any language ran.
#[derive(Debug)]
pub enum SkipReason {
    /// The dictionary is missing or unusable. Not a defect of the test.
    DictionaryUnavailable(DictionaryError),
    /// The pass could not be set up (data source failed or was empty).
    InternalDefect(String),
    /// The marker does not fit the data it is applied to.
    Misconfigured(ConfigurationError),
}

/// Result of one test's i18n pass.
#[derive(Debug)]
pub enum I18nPass {
    /// i18n checks are switched off; nothing was loaded or invoked.
    Disabled,
    Skipped(SkipReason),
    Completed(Vec<PerLanguageOutcome>),
}

impl I18nPass {
    /// Per-language outcomes; empty unless the pass completed.
    pub fn outcomes(&self) -> &[PerLanguageOutcome] {
        match self {
            I18nPass::Completed(outcomes) => outcomes,
            _ => &[],
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, I18nPass::Skipped(_))
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes().iter().any(PerLanguageOutcome::is_failed)
    }

    pub fn failed_languages(&self) -> Vec<&str> {
        self.outcomes()
            .iter()
            .filter(|o| o.is_failed())
            .map(|o| o.language.as_str())
            .collect()
    }
}

/// Re-runs passing tests once per dictionary language.
#[derive(Debug, Clone, Default)]
pub struct ReinvocationEngine {
    config: RunnerConfig,
}

impl ReinvocationEngine {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run the i18n checks for `test`, escalating `result` to failed for
    /// every language whose run fails.
    pub fn run_i18n_checks(&self, test: &ResolvedTest, result: &mut TestResult) -> I18nPass {
        if !self.config.enabled || !test.config.enabled {
            debug!("I18n checks disabled for {}", test.id);
            return I18nPass::Disabled;
        }

        let path = self.config.resolve_dictionary_path(test.config.dictionary_path());
        let dictionary = match Dictionary::load(&path) {
            Ok(dictionary) => dictionary,
            Err(e) => {
                warn!("No usable dictionary for {}. I18n checks skipped: {}", test.id, e);
                return I18nPass::Skipped(SkipReason::DictionaryUnavailable(e));
            }
        };

        for finding in CoverageAuditor::audit(&dictionary).findings {
            warn!("Dictionary {} coverage: {}", path.display(), finding);
        }

        let row = match first_row(test) {
            Ok(row) => row,
            Err(reason) => {
                error!("I18n checks for {} not run: {}", test.id, reason);
                return I18nPass::Skipped(SkipReason::InternalDefect(reason));
            }
        };

        let out_of_range = test.config.positions.out_of_range(row.len());
        if !out_of_range.is_empty() {
            let err = ConfigurationError::PositionsOutOfRange {
                test: test.id.to_string(),
                positions: out_of_range,
                arity: row.len(),
            };
            error!("I18n checks for {} not run: {}", test.id, err);
            return I18nPass::Skipped(SkipReason::Misconfigured(err));
        }

        let languages = self.config.select_languages(dictionary.languages());
        info!(
            "I18n checks triggered for {} ({} languages)",
            test.id,
            languages.len()
        );

        let translator = Translator::new(&dictionary, &test.config.positions);
        let outcomes = languages
            .into_iter()
            .map(|language| check_language(test, &translator, &row, language, result))
            .collect();

        I18nPass::Completed(outcomes)
    }
}

/// Fetch the representative argument row from a fresh fixture.
fn first_row(test: &ResolvedTest) -> Result<ArgumentVector, String> {
    test.target
        .produce_rows(&test.data_source)
        .map_err(|e| e.to_string())?
        .into_iter()
        .next()
        .ok_or_else(|| format!("data source `{}` produced no rows", test.data_source))
}

fn check_language(
    test: &ResolvedTest,
    translator: &Translator<'_>,
    row: &ArgumentVector,
    language: &str,
    result: &mut TestResult,
) -> PerLanguageOutcome {
    info!("I18n testing language: {}", language);
    let started = Instant::now();

    let outcome = |status: LanguageStatus, arguments: Option<ArgumentVector>| PerLanguageOutcome {
        language: language.to_string(),
        status,
        arguments,
        duration: started.elapsed(),
    };

    let translated = match translator.translate_arguments(row, language) {
        Ok(translated) => translated,
        Err(missing) => {
            for gap in &missing.missing {
                error!("I18n failure for {}: {}", test.id, gap);
            }
            result.escalate_failure(format!("[{}] {}", language, missing));
            return outcome(
                LanguageStatus::Failed {
                    cause: FailureCause::missing(&missing),
                },
                None,
            );
        }
    };
    debug!("Translated arguments for {}: {:?}", language, translated);

    let status = match test.target.invoke(test.id.method(), &translated) {
        Ok(()) => LanguageStatus::Passed,
        Err(e) if e.is_test_failure() => {
            error!("I18n failure for {} in {}: {}", test.id, language, e);
            result.escalate_failure(format!("[{}] {}", language, e));
            LanguageStatus::Failed {
                cause: FailureCause::TestFailed {
                    message: failure_message(e),
                },
            }
        }
        Err(e) => {
            error!("I18n check for {} in {} inconclusive: {}", test.id, language, e);
            LanguageStatus::Inconclusive {
                reason: e.to_string(),
            }
        }
    };

    outcome(status, Some(translated))
}

/// Unwrap the cause from the invocation wrapper.
fn failure_message(error: InvocationError) -> String {
    match error {
        InvocationError::Failed(cause) => format!("{:#}", cause),
        InvocationError::Panicked(message) => format!("panicked: {}", message),
        other => other.to_string(),
    }
}
