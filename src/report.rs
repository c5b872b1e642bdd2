//! Run summary for i18n checks.
//!
//! Aggregates host results after a run: how many tests had their i18n pass
//! completed or skipped, and how each language run ended.

use crate::engine::{I18nPass, LanguageStatus};
use crate::host::{TestResult, TestStatus};
use crate::registry::TestId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One failed language run.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageFailure {
    pub test: TestId,
    pub language: String,
    pub reason: String,
}

/// Summary of a run containing current i18n statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,

    /// Number of test results
    pub tests: usize,

    /// Results still succeeded after i18n checks
    pub succeeded: usize,

    /// Results failed overall
    pub failed: usize,

    /// Results that passed originally and were failed by i18n checks
    pub escalated: usize,

    /// i18n passes that ran every selected language
    pub i18n_completed: usize,

    /// i18n passes abandoned (dictionary unavailable or setup defect)
    pub i18n_skipped: usize,

    pub languages_passed: usize,
    pub languages_failed: usize,
    pub languages_inconclusive: usize,

    /// Passed language runs as a percentage (0-100) of conclusive ones
    pub language_pass_rate: f64,

    pub failures: Vec<LanguageFailure>,
}

impl RunSummary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let mut summary = RunSummary {
            generated_at: Utc::now(),
            tests: results.len(),
            succeeded: 0,
            failed: 0,
            escalated: 0,
            i18n_completed: 0,
            i18n_skipped: 0,
            languages_passed: 0,
            languages_failed: 0,
            languages_inconclusive: 0,
            language_pass_rate: 0.0,
            failures: Vec::new(),
        };

        for result in results {
            match result.status() {
                TestStatus::Succeeded => summary.succeeded += 1,
                TestStatus::Failed => summary.failed += 1,
            }
            if result.was_escalated() {
                summary.escalated += 1;
            }

            match result.i18n() {
                Some(I18nPass::Completed(_)) => summary.i18n_completed += 1,
                Some(I18nPass::Skipped(_)) => summary.i18n_skipped += 1,
                Some(I18nPass::Disabled) | None => {}
            }

            for outcome in result.i18n().map(I18nPass::outcomes).unwrap_or_default() {
                match &outcome.status {
                    LanguageStatus::Passed => summary.languages_passed += 1,
                    LanguageStatus::Inconclusive { .. } => summary.languages_inconclusive += 1,
                    LanguageStatus::Failed { cause } => {
                        summary.languages_failed += 1;
                        summary.failures.push(LanguageFailure {
                            test: result.id().clone(),
                            language: outcome.language.clone(),
                            reason: cause.to_string(),
                        });
                    }
                }
            }
        }

        let conclusive = summary.languages_passed + summary.languages_failed;
        if conclusive > 0 {
            summary.language_pass_rate =
                (summary.languages_passed as f64 / conclusive as f64) * 100.0;
        }

        summary
    }

    /// Whether every i18n check that ran passed.
    pub fn is_clean(&self) -> bool {
        self.languages_failed == 0 && self.escalated == 0
    }
}
