//! Minimal host test framework contract.
//!
//! The host owns test execution and final pass/fail bookkeeping. It hands a
//! mutable [`TestResult`] to its listeners after each successful invocation;
//! listeners may escalate that result to failed but never back to succeeded.
//!
//! [`Runner`] is a small sequential host that executes every registered test
//! once per data-source row and notifies its listeners.

use crate::args::ArgumentVector;
use crate::engine::I18nPass;
use crate::registry::{TestId, TestRegistry};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Succeeded,
    Failed,
}

/// Result of one test invocation, as owned by the host.
#[derive(Debug)]
pub struct TestResult {
    id: TestId,
    parameters: ArgumentVector,
    original_status: TestStatus,
    status: TestStatus,
    failures: Vec<String>,
    i18n: Option<I18nPass>,
}

impl TestResult {
    pub fn succeeded(id: TestId, parameters: ArgumentVector) -> Self {
        Self {
            id,
            parameters,
            original_status: TestStatus::Succeeded,
            status: TestStatus::Succeeded,
            failures: Vec::new(),
            i18n: None,
        }
    }

    pub fn failed(id: TestId, parameters: ArgumentVector, reason: impl Into<String>) -> Self {
        Self {
            id,
            parameters,
            original_status: TestStatus::Failed,
            status: TestStatus::Failed,
            failures: vec![reason.into()],
            i18n: None,
        }
    }

    pub fn id(&self) -> &TestId {
        &self.id
    }

    /// Parameters the original invocation ran with.
    pub fn parameters(&self) -> &ArgumentVector {
        &self.parameters
    }

    /// Status of the original invocation. Never changes.
    pub fn original_status(&self) -> TestStatus {
        self.original_status
    }

    /// Current overall status.
    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Mark the overall result as failed. There is no way back to succeeded.
    pub fn escalate_failure(&mut self, reason: impl Into<String>) {
        self.status = TestStatus::Failed;
        self.failures.push(reason.into());
    }

    /// Whether a listener downgraded a passing result.
    pub fn was_escalated(&self) -> bool {
        self.original_status == TestStatus::Succeeded && self.status == TestStatus::Failed
    }

    pub fn record_i18n(&mut self, pass: I18nPass) {
        self.i18n = Some(pass);
    }

    pub fn i18n(&self) -> Option<&I18nPass> {
        self.i18n.as_ref()
    }
}

/// Receives test lifecycle events from the host.
pub trait TestListener: Send + Sync {
    /// Called after a test invocation succeeded.
    fn on_test_success(&self, _result: &mut TestResult) {}

    /// Called after a test invocation failed.
    fn on_test_failure(&self, _result: &TestResult) {}
}

/// Sequential host: runs each registered test once per data-source row.
pub struct Runner {
    registry: Arc<TestRegistry>,
    listeners: Vec<Box<dyn TestListener>>,
}

impl Runner {
    pub fn new(registry: Arc<TestRegistry>) -> Self {
        Self {
            registry,
            listeners: Vec::new(),
        }
    }

    pub fn with_listener(mut self, listener: impl TestListener + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Run every registered test in registration order.
    pub fn run_all(&self) -> Vec<TestResult> {
        self.registry
            .test_ids()
            .iter()
            .flat_map(|id| self.run_test(id))
            .collect()
    }

    /// Run one test, producing one result per data-source row.
    pub fn run_test(&self, id: &TestId) -> Vec<TestResult> {
        let Some((target, spec)) = self.registry.find(id) else {
            warn!("Test {} is not registered", id);
            return vec![TestResult::failed(
                id.clone(),
                ArgumentVector::default(),
                "test is not registered",
            )];
        };

        let rows = match &spec.data_source {
            Some(name) => match target.produce_rows(name) {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("Test {} has no rows to run: {}", id, e);
                    let result = TestResult::failed(id.clone(), ArgumentVector::default(), e.to_string());
                    return vec![self.notify(result)];
                }
            },
            None => vec![ArgumentVector::default()],
        };

        rows.into_iter()
            .map(|row| {
                let result = match target.invoke(id.method(), &row) {
                    Ok(()) => TestResult::succeeded(id.clone(), row),
                    Err(e) => TestResult::failed(id.clone(), row, e.to_string()),
                };
                self.notify(result)
            })
            .collect()
    }

    fn notify(&self, mut result: TestResult) -> TestResult {
        debug!("Test {} finished: {:?}", result.id(), result.status());
        match result.status() {
            TestStatus::Succeeded => {
                for listener in &self.listeners {
                    listener.on_test_success(&mut result);
                }
            }
            TestStatus::Failed => {
                for listener in &self.listeners {
                    listener.on_test_failure(&result);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::registry::{TestClass, TestSpec};
    use anyhow::{anyhow, ensure};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        successes: Mutex<Vec<String>>,
        failures: Mutex<Vec<String>>,
    }

    struct Escalator;

    impl TestListener for Escalator {
        fn on_test_success(&self, result: &mut TestResult) {
            result.escalate_failure("listener said no");
        }
    }

    impl TestListener for Arc<Recorder> {
        fn on_test_success(&self, result: &mut TestResult) {
            self.successes.lock().unwrap().push(result.id().to_string());
        }

        fn on_test_failure(&self, result: &TestResult) {
            self.failures.lock().unwrap().push(result.id().to_string());
        }
    }

    #[derive(Default)]
    struct Math;

    fn registry() -> Arc<TestRegistry> {
        let class = TestClass::<Math>::default_constructible("Math")
            .data_source("pairs", |_| Ok(vec![args![1, 1], args![2, 3]]))
            .data_source("broken", |_| Err(anyhow!("no rows today")))
            .test(TestSpec::new("equal").data_source("pairs"), |_, args| {
                ensure!(args.i64(0)? == args.i64(1)?, "not equal");
                Ok(())
            })
            .test(TestSpec::new("no_args"), |_, args| {
                ensure!(args.is_empty());
                Ok(())
            })
            .test(TestSpec::new("bad_source").data_source("broken"), |_, _| Ok(()));

        let mut registry = TestRegistry::new();
        registry.register(class).unwrap();
        Arc::new(registry)
    }

    // ==================== TestResult Tests ====================

    #[test]
    fn test_escalation_is_one_way() {
        let mut result = TestResult::succeeded(TestId::new("A", "b"), args!["x"]);
        assert!(!result.was_escalated());

        result.escalate_failure("es: wrong answer");

        assert_eq!(result.status(), TestStatus::Failed);
        assert_eq!(result.original_status(), TestStatus::Succeeded);
        assert!(result.was_escalated());
        assert_eq!(result.failures(), ["es: wrong answer"]);
    }

    #[test]
    fn test_failed_result_is_not_escalated() {
        let mut result = TestResult::failed(TestId::new("A", "b"), args![], "boom");
        result.escalate_failure("again");
        assert!(!result.was_escalated());
        assert_eq!(result.failures().len(), 2);
    }

    // ==================== Runner Tests ====================

    #[test]
    fn test_runner_one_result_per_row() {
        let results = Runner::new(registry()).run_test(&TestId::new("Math", "equal"));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status(), TestStatus::Succeeded);
        assert_eq!(results[0].parameters(), &args![1, 1]);
        assert_eq!(results[1].status(), TestStatus::Failed);
        assert!(results[1].failures()[0].contains("not equal"));
    }

    #[test]
    fn test_runner_without_data_source_runs_once() {
        let results = Runner::new(registry()).run_test(&TestId::new("Math", "no_args"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status(), TestStatus::Succeeded);
    }

    #[test]
    fn test_runner_data_source_failure() {
        let results = Runner::new(registry()).run_test(&TestId::new("Math", "bad_source"));
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].failures()[0],
            "data source `broken` on `Math` failed: no rows today"
        );
    }

    #[test]
    fn test_runner_unknown_test() {
        let results = Runner::new(registry()).run_test(&TestId::new("Math", "ghost"));
        assert_eq!(results[0].status(), TestStatus::Failed);
    }

    #[test]
    fn test_runner_notifies_listeners() {
        let recorder = Arc::new(Recorder::default());
        let results = Runner::new(registry())
            .with_listener(Arc::clone(&recorder))
            .run_all();

        assert_eq!(results.len(), 4);
        assert_eq!(
            *recorder.successes.lock().unwrap(),
            vec!["Math::equal", "Math::no_args"]
        );
        assert_eq!(
            *recorder.failures.lock().unwrap(),
            vec!["Math::equal", "Math::bad_source"]
        );
    }

    #[test]
    fn test_runner_keeps_listener_escalation() {
        let results = Runner::new(registry())
            .with_listener(Escalator)
            .run_test(&TestId::new("Math", "no_args"));

        assert!(results[0].was_escalated());
    }
}
