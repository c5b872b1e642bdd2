//! Locale-independence checks for data-driven tests.
//!
//! After a test passes with its original arguments, its string arguments are
//! replaced with dictionary translations and the test is run again, once per
//! language declared in the dictionary. A test that only passes in its
//! original language is reported as failed.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use i18n_rerun::{args, I18nListener, ReinvocationEngine, Runner, TestClass, TestRegistry,
//!     TestSpec, TranslationConfig};
//!
//! #[derive(Default)]
//! struct Oracle;
//!
//! let class = TestClass::<Oracle>::default_constructible("Oracle")
//!     .data_source("dp", |_| Ok(vec![args!["Who will win the World Cup", "Costa Rica"]]))
//!     .test(
//!         TestSpec::new("prophecy")
//!             .data_source("dp")
//!             .i18n(TranslationConfig::new("data/mirror_dictionary.json").translate_positions([0])),
//!         |_, args| {
//!             anyhow::ensure!(!args.str(0)?.is_empty());
//!             Ok(())
//!         },
//!     );
//!
//! let mut registry = TestRegistry::new();
//! registry.register(class)?;
//! let registry = Arc::new(registry);
//!
//! let results = Runner::new(Arc::clone(&registry))
//!     .with_listener(I18nListener::new(registry, ReinvocationEngine::default()))
//!     .run_all();
//! # Ok::<(), i18n_rerun::error::ConfigurationError>(())
//! ```

pub mod args;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod i18n;
pub mod listener;
pub mod registry;
pub mod report;
pub mod resolver;

pub use args::ArgumentVector;
pub use config::RunnerConfig;
pub use engine::{I18nPass, LanguageStatus, PerLanguageOutcome, ReinvocationEngine, SkipReason};
pub use host::{Runner, TestListener, TestResult, TestStatus};
pub use listener::I18nListener;
pub use registry::{TestClass, TestId, TestRegistry, TestSpec, TranslationConfig};
pub use report::RunSummary;

#[doc(hidden)]
pub use serde_json;
