//! Host listener that triggers i18n checks after a test passes.

use crate::engine::{I18nPass, ReinvocationEngine};
use crate::host::{TestListener, TestResult};
use crate::registry::TestRegistry;
use crate::resolver::{resolve, NotApplicable, Resolution};
use std::sync::Arc;
use tracing::{debug, error};

/// Re-runs every passing, marked test once per dictionary language.
///
/// Resolution problems are logged and leave the result untouched; they never
/// fail the host run.
pub struct I18nListener {
    registry: Arc<TestRegistry>,
    engine: ReinvocationEngine,
}

impl I18nListener {
    pub fn new(registry: Arc<TestRegistry>, engine: ReinvocationEngine) -> Self {
        Self { registry, engine }
    }
}

impl TestListener for I18nListener {
    fn on_test_success(&self, result: &mut TestResult) {
        let resolved = match resolve(&self.registry, result.id()) {
            Ok(Resolution::Ready(resolved)) => resolved,
            Ok(Resolution::NotApplicable(NotApplicable::MarkerAbsent)) => return,
            Ok(Resolution::NotApplicable(NotApplicable::Disabled)) => {
                debug!("I18n checks disabled for {}", result.id());
                result.record_i18n(I18nPass::Disabled);
                return;
            }
            Err(e) => {
                error!("I18n checks for {} not configured correctly: {}", result.id(), e);
                return;
            }
        };

        let pass = self.engine.run_i18n_checks(&resolved, result);
        result.record_i18n(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::host::{Runner, TestStatus};
    use crate::registry::{TestClass, TestId, TestSpec, TranslationConfig};
    use anyhow::ensure;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Echo;

    fn registry(dictionary: &std::path::Path) -> Arc<TestRegistry> {
        let class = TestClass::<Echo>::default_constructible("Echo")
            .data_source("dp", |_| Ok(vec![args!["yes"]]))
            .test(
                TestSpec::new("marked")
                    .data_source("dp")
                    .i18n(TranslationConfig::new(dictionary)),
                |_, args| {
                    ensure!(args.str(0)? != "non", "French refusal");
                    Ok(())
                },
            )
            .test(TestSpec::new("unmarked").data_source("dp"), |_, _| Ok(()))
            .test(
                TestSpec::new("misconfigured")
                    .data_source("nowhere")
                    .i18n(TranslationConfig::new(dictionary)),
                |_, _| Ok(()),
            );

        let mut registry = TestRegistry::new();
        registry.register(class).unwrap();
        Arc::new(registry)
    }

    fn run(dictionary_json: Option<&str>, method: &str) -> TestResult {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dictionary.json");
        if let Some(json) = dictionary_json {
            std::fs::write(&path, json).unwrap();
        }
        let registry = registry(&path);
        let listener = I18nListener::new(Arc::clone(&registry), ReinvocationEngine::default());
        let mut result = TestResult::succeeded(TestId::new("Echo", method), args!["yes"]);

        listener.on_test_success(&mut result);
        result
    }

    #[test]
    fn test_marked_test_is_escalated() {
        let result = run(
            Some(r#"{"languages":["es","fr"],"entries":{"yes":{"es":"sí","fr":"non"}}}"#),
            "marked",
        );

        assert_eq!(result.status(), TestStatus::Failed);
        assert_eq!(result.original_status(), TestStatus::Succeeded);
        assert_eq!(result.i18n().unwrap().failed_languages(), vec!["fr"]);
    }

    #[test]
    fn test_unmarked_test_untouched() {
        let result = run(None, "unmarked");
        assert_eq!(result.status(), TestStatus::Succeeded);
        assert!(result.i18n().is_none());
    }

    #[test]
    fn test_misconfigured_test_untouched() {
        let result = run(Some(r#"{"languages":[],"entries":{}}"#), "misconfigured");
        assert_eq!(result.status(), TestStatus::Succeeded);
        assert!(result.i18n().is_none());
    }

    #[test]
    fn test_missing_dictionary_recorded_as_skipped() {
        let result = run(None, "marked");
        assert_eq!(result.status(), TestStatus::Succeeded);
        assert!(result.i18n().unwrap().is_skipped());
    }

    #[test]
    fn test_listener_in_runner() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dictionary.json");
        std::fs::write(&path, r#"{"languages":["es"],"entries":{"yes":{"es":"sí"}}}"#).unwrap();
        let registry = registry(&path);

        let results = Runner::new(Arc::clone(&registry))
            .with_listener(I18nListener::new(registry, ReinvocationEngine::default()))
            .run_all();

        assert!(results.iter().all(|r| r.status() == TestStatus::Succeeded));
        let marked = results
            .iter()
            .find(|r| r.id().method() == "marked")
            .unwrap();
        assert_eq!(marked.i18n().unwrap().outcomes().len(), 1);
    }
}
