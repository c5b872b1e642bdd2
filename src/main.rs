//! Dictionary tooling.
//!
//! Usage:
//!   i18n-rerun audit <dictionary.json>
//!   i18n-rerun translate <dictionary.json> <language> <arg>...
//!
//! `translate` reads each argument as JSON when it parses (`42`, `true`,
//! `{"a":1}`) and as a plain string otherwise.
//!
//! Optional:
//! - I18N_DICTIONARY_ROOT (base directory for relative dictionary paths)
//! - RUST_LOG (defaults to i18n_rerun=info)

use anyhow::{bail, Context, Result};
use i18n_rerun::i18n::{translate_arguments, CoverageAuditor, Dictionary};
use i18n_rerun::{ArgumentVector, RunnerConfig};
use serde_json::Value;
use std::path::Path;
use tracing::info;

const USAGE: &str = "usage: i18n-rerun audit <dictionary.json>\n       i18n-rerun translate <dictionary.json> <language> <arg>...";

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_rerun=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RunnerConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [command, path] if command == "audit" => audit(&config, path),
        [command, path, language, rest @ ..] if command == "translate" => {
            translate(&config, path, language, rest)
        }
        _ => bail!("{}", USAGE),
    }
}

fn load(config: &RunnerConfig, path: &str) -> Result<Dictionary> {
    let path = config.resolve_dictionary_path(Path::new(path));
    let dictionary = Dictionary::load(&path)?;
    info!(
        "Loaded {} entries in {} languages from {}",
        dictionary.len(),
        dictionary.languages().len(),
        path.display()
    );
    Ok(dictionary)
}

fn audit(config: &RunnerConfig, path: &str) -> Result<()> {
    let dictionary = load(config, path)?;
    let report = CoverageAuditor::audit(&dictionary);

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize coverage report")?
    );

    if report.has_gaps() {
        bail!("Dictionary has {} coverage gap(s)", report.gaps().count());
    }
    Ok(())
}

fn translate(config: &RunnerConfig, path: &str, language: &str, raw: &[String]) -> Result<()> {
    let dictionary = load(config, path)?;
    let original: ArgumentVector = raw
        .iter()
        .map(|arg| serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone())))
        .collect();

    let translated = translate_arguments(&original, language, &dictionary)?;

    println!(
        "{}",
        serde_json::to_string(&translated).context("Failed to serialize arguments")?
    );
    Ok(())
}
