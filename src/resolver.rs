//! Test descriptor resolution: from a completed test to what is needed to
//! re-run it.

use crate::error::ConfigurationError;
use crate::registry::{TestId, TestRegistry, TestTarget, TranslationConfig};
use std::sync::Arc;

/// Why a completed test is not eligible for i18n checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotApplicable {
    /// The test method carries no translation marker.
    MarkerAbsent,
    /// The marker is present with `enabled = false`.
    Disabled,
}

/// Everything the engine needs to re-run one test.
#[derive(Clone)]
pub struct ResolvedTest {
    pub id: TestId,
    pub target: Arc<dyn TestTarget>,
    pub data_source: String,
    pub config: TranslationConfig,
}

impl std::fmt::Debug for ResolvedTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedTest")
            .field("id", &self.id)
            .field("data_source", &self.data_source)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Resolution {
    NotApplicable(NotApplicable),
    Ready(ResolvedTest),
}

/// Resolve the callable, data source and marker for test `id`.
///
/// A disabled marker short-circuits before the data source is looked at.
///
/// # Errors
/// `ConfigurationError` when the test is unknown, the marker declares no
/// dictionary, or the data source is undeclared, missing or ambiguous.
pub fn resolve(registry: &TestRegistry, id: &TestId) -> Result<Resolution, ConfigurationError> {
    let (target, spec) = registry
        .find(id)
        .ok_or_else(|| ConfigurationError::UnknownTest(id.to_string()))?;

    let config = match &spec.i18n {
        None => return Ok(Resolution::NotApplicable(NotApplicable::MarkerAbsent)),
        Some(config) if !config.enabled => {
            return Ok(Resolution::NotApplicable(NotApplicable::Disabled))
        }
        Some(config) => config,
    };

    if config.dictionary_path.as_os_str().is_empty() {
        return Err(ConfigurationError::MissingDictionaryPath {
            test: id.to_string(),
        });
    }

    let data_source = spec
        .data_source
        .as_deref()
        .ok_or_else(|| ConfigurationError::NoDataSource {
            test: id.to_string(),
        })?;

    match target.data_source_matches(data_source) {
        0 => Err(ConfigurationError::DataSourceNotFound {
            test: id.to_string(),
            class: target.class_name().to_string(),
            name: data_source.to_string(),
        }),
        1 => Ok(Resolution::Ready(ResolvedTest {
            id: id.clone(),
            target: Arc::clone(target),
            data_source: data_source.to_string(),
            config: config.clone(),
        })),
        count => Err(ConfigurationError::AmbiguousDataSource {
            test: id.to_string(),
            class: target.class_name().to_string(),
            name: data_source.to_string(),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::registry::{TestClass, TestSpec};

    #[derive(Default)]
    struct Fixture;

    fn registry() -> TestRegistry {
        let class = TestClass::<Fixture>::default_constructible("Suite")
            .data_source("dp", |_| Ok(vec![args!["hello"]]))
            .data_source("twice", |_| Ok(vec![]))
            .data_source("twice", |_| Ok(vec![]))
            .test(TestSpec::new("plain").data_source("dp"), |_, _| Ok(()))
            .test(
                TestSpec::new("marked")
                    .data_source("dp")
                    .i18n(TranslationConfig::new("dict.json")),
                |_, _| Ok(()),
            )
            .test(
                TestSpec::new("disabled")
                    .data_source("missing")
                    .i18n(TranslationConfig::new("dict.json").enabled(false)),
                |_, _| Ok(()),
            )
            .test(
                TestSpec::new("no_source").i18n(TranslationConfig::new("dict.json")),
                |_, _| Ok(()),
            )
            .test(
                TestSpec::new("wrong_source")
                    .data_source("missing")
                    .i18n(TranslationConfig::new("dict.json")),
                |_, _| Ok(()),
            )
            .test(
                TestSpec::new("ambiguous")
                    .data_source("twice")
                    .i18n(TranslationConfig::new("dict.json")),
                |_, _| Ok(()),
            )
            .test(
                TestSpec::new("no_path")
                    .data_source("dp")
                    .i18n(TranslationConfig::new("")),
                |_, _| Ok(()),
            );

        let mut registry = TestRegistry::new();
        registry.register(class).unwrap();
        registry
    }

    fn resolve_method(method: &str) -> Result<Resolution, ConfigurationError> {
        resolve(&registry(), &TestId::new("Suite", method))
    }

    #[test]
    fn test_resolve_marked_test() {
        match resolve_method("marked").unwrap() {
            Resolution::Ready(resolved) => {
                assert_eq!(resolved.id, TestId::new("Suite", "marked"));
                assert_eq!(resolved.data_source, "dp");
                assert_eq!(resolved.target.class_name(), "Suite");
                assert_eq!(resolved.config, TranslationConfig::new("dict.json"));
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_without_marker() {
        assert!(matches!(
            resolve_method("plain").unwrap(),
            Resolution::NotApplicable(NotApplicable::MarkerAbsent)
        ));
    }

    #[test]
    fn test_resolve_disabled_skips_data_source_lookup() {
        assert!(matches!(
            resolve_method("disabled").unwrap(),
            Resolution::NotApplicable(NotApplicable::Disabled)
        ));
    }

    #[test]
    fn test_resolve_without_data_source() {
        assert!(matches!(
            resolve_method("no_source").unwrap_err(),
            ConfigurationError::NoDataSource { .. }
        ));
    }

    #[test]
    fn test_resolve_unknown_data_source() {
        let err = resolve_method("wrong_source").unwrap_err();
        assert!(matches!(err, ConfigurationError::DataSourceNotFound { .. }));
        assert!(err.to_string().contains("`missing`"));
    }

    #[test]
    fn test_resolve_ambiguous_data_source() {
        assert!(matches!(
            resolve_method("ambiguous").unwrap_err(),
            ConfigurationError::AmbiguousDataSource { count: 2, .. }
        ));
    }

    #[test]
    fn test_resolve_empty_dictionary_path() {
        assert!(matches!(
            resolve_method("no_path").unwrap_err(),
            ConfigurationError::MissingDictionaryPath { .. }
        ));
    }

    #[test]
    fn test_resolve_unknown_test() {
        assert_eq!(
            resolve_method("ghost").unwrap_err(),
            ConfigurationError::UnknownTest("Suite::ghost".to_string())
        );
    }
}
