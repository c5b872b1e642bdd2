//! Mirror demo - runs the magic-mirror tests with i18n checks and prints the
//! run summary as JSON.
//!
//! Usage:
//!   cargo run --bin mirror-demo
//!
//! The naive mirror only understands English questions, so its Spanish and
//! French re-runs fail. The polyglot mirror passes in every language.
//!
//! Optional:
//! - I18N_RERUN_ENABLED (defaults to true)
//! - I18N_DICTIONARY_ROOT (defaults to the crate's data/ directory)
//! - I18N_LANGUAGES (comma-separated subset of the dictionary's languages)

use anyhow::{ensure, Context, Result};
use i18n_rerun::{
    args, I18nListener, ReinvocationEngine, Runner, RunSummary, RunnerConfig, TestClass,
    TestRegistry, TestSpec, TranslationConfig,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Answers questions it recognizes.
struct Mirror {
    answers: HashMap<&'static str, &'static str>,
}

impl Mirror {
    fn naive() -> Self {
        Self {
            answers: HashMap::from([
                ("Who will win the World Cup", "Costa Rica"),
                ("Who is the fairest of them all", "Snow White"),
            ]),
        }
    }

    fn polyglot() -> Self {
        let mut mirror = Self::naive();
        mirror.answers.extend([
            ("¿Quién ganará la Copa del Mundo?", "Costa Rica"),
            ("Qui va gagner la Coupe du monde ?", "Costa Rica"),
            ("¿Quién es la más bella de todas?", "Snow White"),
            ("Qui est la plus belle de toutes ?", "Snow White"),
        ]);
        mirror
    }

    fn answer(&self, question: &str) -> &'static str {
        self.answers
            .get(question)
            .copied()
            .unwrap_or("The mirror is silent")
    }
}

fn prophecy(mirror: &mut Mirror, args: &i18n_rerun::ArgumentVector) -> Result<()> {
    let question = args.str(0)?;
    let expected = args.str(1)?;
    let answer = mirror.answer(question);

    info!("Question: {} / Answer: {} / Expected: {}", question, answer, expected);
    ensure!(
        answer == expected,
        "expected {:?} but the mirror said {:?}",
        expected,
        answer
    );
    Ok(())
}

fn mirror_class(name: &str, build: fn() -> Mirror) -> TestClass<Mirror> {
    let marker = TranslationConfig::new("mirror_dictionary.json").translate_positions([0]);

    TestClass::new(name, move || Ok(build()))
        .data_source("dp", |_| {
            Ok(vec![
                args!["Who will win the World Cup", "Costa Rica"],
                args!["Who is the fairest of them all", "Snow White"],
            ])
        })
        .test(
            TestSpec::new("test_prophecy_of_mirror")
                .data_source("dp")
                .i18n(marker),
            prophecy,
        )
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_rerun=info".parse()?)
                .add_directive("mirror_demo=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = RunnerConfig::from_env()?;
    if config.dictionary_root.is_none() {
        config.dictionary_root = Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"));
    }

    let mut registry = TestRegistry::new();
    registry.register(mirror_class("NaiveMirrorTest", Mirror::naive))?;
    registry.register(mirror_class("PolyglotMirrorTest", Mirror::polyglot))?;
    let registry = Arc::new(registry);

    info!("Running {} tests", registry.len());
    let results = Runner::new(Arc::clone(&registry))
        .with_listener(I18nListener::new(registry, ReinvocationEngine::new(config)))
        .run_all();

    let summary = RunSummary::from_results(&results);
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")?
    );
    Ok(())
}
