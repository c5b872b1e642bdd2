//! Explicit test registry.
//!
//! Test classes are registered up front with an instance provider, their named
//! data sources and their test methods. Each method may carry a
//! [`TranslationConfig`] marker. Resolving a completed test is then a table
//! lookup rather than a scan of runtime metadata.

use crate::args::ArgumentVector;
use crate::error::{ConfigurationError, InvocationError};
use crate::i18n::TranslatablePositions;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ==================== Identity ====================

/// Identifies one test method on one test class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestId {
    class: String,
    method: String,
}

impl TestId {
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.method)
    }
}

impl Serialize for TestId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ==================== Markers ====================

/// Per-method i18n marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationConfig {
    pub enabled: bool,
    pub dictionary_path: PathBuf,
    pub positions: TranslatablePositions,
}

impl TranslationConfig {
    /// Enabled marker reading its dictionary from `dictionary_path`.
    pub fn new(dictionary_path: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            dictionary_path: dictionary_path.into(),
            positions: TranslatablePositions::AllStrings,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Restrict translation to the given argument indices.
    pub fn translate_positions(mut self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.positions = TranslatablePositions::only(positions);
        self
    }

    pub fn dictionary_path(&self) -> &Path {
        &self.dictionary_path
    }
}

/// Declared metadata of a test method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSpec {
    pub name: String,
    pub data_source: Option<String>,
    pub i18n: Option<TranslationConfig>,
}

impl TestSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_source: None,
            i18n: None,
        }
    }

    pub fn data_source(mut self, name: impl Into<String>) -> Self {
        self.data_source = Some(name.into());
        self
    }

    pub fn i18n(mut self, config: TranslationConfig) -> Self {
        self.i18n = Some(config);
        self
    }
}

// ==================== Test Classes ====================

/// Builds a fresh fixture for every invocation.
pub trait InstanceProvider<T>: Send + Sync {
    fn provide(&self) -> Result<T>;
}

impl<T, F> InstanceProvider<T> for F
where
    F: Fn() -> Result<T> + Send + Sync,
{
    fn provide(&self) -> Result<T> {
        self()
    }
}

type DataSourceFn<T> = Box<dyn Fn(&T) -> Result<Vec<ArgumentVector>> + Send + Sync>;
type TestBody<T> = Box<dyn Fn(&mut T, &ArgumentVector) -> Result<()> + Send + Sync>;

struct DataSource<T> {
    name: String,
    produce: DataSourceFn<T>,
}

struct TestMethod<T> {
    spec: TestSpec,
    body: TestBody<T>,
}

/// A test class: fixture type `T`, how to build it, its data sources and
/// its test methods.
pub struct TestClass<T> {
    name: String,
    provider: Box<dyn InstanceProvider<T>>,
    data_sources: Vec<DataSource<T>>,
    methods: Vec<TestMethod<T>>,
}

impl<T: 'static> TestClass<T> {
    /// Class whose fixtures are built by `provider`.
    pub fn new<F>(name: impl Into<String>, provider: F) -> Self
    where
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        Self::with_provider(name, provider)
    }

    pub fn with_provider(name: impl Into<String>, provider: impl InstanceProvider<T> + 'static) -> Self {
        Self {
            name: name.into(),
            provider: Box::new(provider),
            data_sources: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Register a data source under `name`. Registering the same name twice
    /// makes it ambiguous for every test that refers to it.
    pub fn data_source<F>(mut self, name: impl Into<String>, produce: F) -> Self
    where
        F: Fn(&T) -> Result<Vec<ArgumentVector>> + Send + Sync + 'static,
    {
        self.data_sources.push(DataSource {
            name: name.into(),
            produce: Box::new(produce),
        });
        self
    }

    /// Register a test method.
    pub fn test<F>(mut self, spec: TestSpec, body: F) -> Self
    where
        F: Fn(&mut T, &ArgumentVector) -> Result<()> + Send + Sync + 'static,
    {
        self.methods.push(TestMethod {
            spec,
            body: Box::new(body),
        });
        self
    }

    fn instantiate(&self) -> Result<T, InvocationError> {
        self.provider
            .provide()
            .map_err(|source| InvocationError::Instantiation {
                class: self.name.clone(),
                source,
            })
    }
}

impl<T: Default + 'static> TestClass<T> {
    /// Class whose fixtures are built with `T::default()`.
    pub fn default_constructible(name: impl Into<String>) -> Self {
        Self::new(name, || Ok(T::default()))
    }
}

/// Type-erased view of a [`TestClass`].
pub trait TestTarget: Send + Sync {
    fn class_name(&self) -> &str;

    fn specs(&self) -> Vec<&TestSpec>;

    fn spec(&self, method: &str) -> Option<&TestSpec> {
        self.specs().into_iter().find(|s| s.name == method)
    }

    /// Number of data sources registered under `name`.
    fn data_source_matches(&self, name: &str) -> usize;

    /// Run data source `name` on a fresh fixture.
    fn produce_rows(&self, name: &str) -> Result<Vec<ArgumentVector>, InvocationError>;

    /// Run test `method` with `args` on a fresh fixture.
    fn invoke(&self, method: &str, args: &ArgumentVector) -> Result<(), InvocationError>;
}

impl<T: 'static> TestTarget for TestClass<T> {
    fn class_name(&self) -> &str {
        &self.name
    }

    fn specs(&self) -> Vec<&TestSpec> {
        self.methods.iter().map(|m| &m.spec).collect()
    }

    fn data_source_matches(&self, name: &str) -> usize {
        self.data_sources.iter().filter(|d| d.name == name).count()
    }

    fn produce_rows(&self, name: &str) -> Result<Vec<ArgumentVector>, InvocationError> {
        let source = self
            .data_sources
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| InvocationError::UnboundMethod {
                class: self.name.clone(),
                method: name.to_string(),
            })?;
        let fixture = self.instantiate()?;
        catch_panic(|| (source.produce)(&fixture)).map_err(|e| {
            let cause = match e {
                InvocationError::Failed(cause) => cause,
                InvocationError::Panicked(message) => anyhow!("panicked: {}", message),
                other => return other,
            };
            InvocationError::DataSource {
                class: self.name.clone(),
                name: name.to_string(),
                source: cause,
            }
        })
    }

    fn invoke(&self, method: &str, args: &ArgumentVector) -> Result<(), InvocationError> {
        let test = self
            .methods
            .iter()
            .find(|m| m.spec.name == method)
            .ok_or_else(|| InvocationError::UnboundMethod {
                class: self.name.clone(),
                method: method.to_string(),
            })?;
        let mut fixture = self.instantiate()?;
        catch_panic(|| (test.body)(&mut fixture, args))
    }
}

fn catch_panic<R>(f: impl FnOnce() -> Result<R>) -> Result<R, InvocationError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(InvocationError::Failed(e)),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(InvocationError::Panicked(message))
        }
    }
}

// ==================== Registry ====================

/// Registered test classes, indexed by [`TestId`].
#[derive(Default)]
pub struct TestRegistry {
    classes: Vec<Arc<dyn TestTarget>>,
    index: HashMap<TestId, usize>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every test method of `class`.
    ///
    /// # Errors
    /// `ConfigurationError::DuplicateTest` if a test with the same identity is
    /// already registered; nothing from `class` is registered in that case.
    pub fn register<T: 'static>(&mut self, class: TestClass<T>) -> Result<&mut Self, ConfigurationError> {
        let slot = self.classes.len();
        let mut ids = Vec::with_capacity(class.methods.len());
        for method in &class.methods {
            let id = TestId::new(class.name.as_str(), method.spec.name.as_str());
            if self.index.contains_key(&id) || ids.contains(&id) {
                return Err(ConfigurationError::DuplicateTest(id.to_string()));
            }
            ids.push(id);
        }

        self.index.extend(ids.into_iter().map(|id| (id, slot)));
        self.classes.push(Arc::new(class));
        Ok(self)
    }

    /// Look up the class owning `id` and the method's declared metadata.
    pub fn find(&self, id: &TestId) -> Option<(&Arc<dyn TestTarget>, &TestSpec)> {
        let class = self.classes.get(*self.index.get(id)?)?;
        let spec = class.spec(id.method())?;
        Some((class, spec))
    }

    /// All registered test identities in registration order.
    pub fn test_ids(&self) -> Vec<TestId> {
        self.classes
            .iter()
            .flat_map(|class| {
                class
                    .specs()
                    .into_iter()
                    .map(|spec| TestId::new(class.class_name(), spec.name.as_str()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl fmt::Debug for TestRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestRegistry")
            .field("tests", &self.test_ids())
            .finish()
    }
}
