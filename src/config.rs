use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Runner-wide settings for i18n checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Global switch; when false no dictionary is ever loaded
    pub enabled: bool,

    /// Base directory for relative dictionary paths
    pub dictionary_root: Option<PathBuf>,

    /// Restrict checks to these languages (dictionary order is kept)
    pub languages: Option<Vec<String>>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dictionary_root: None,
            languages: None,
        }
    }
}

impl RunnerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            enabled: lookup("I18N_RERUN_ENABLED")
                .map(|v| parse_bool(&v))
                .transpose()
                .context("I18N_RERUN_ENABLED is not a boolean")?
                .unwrap_or(true),

            dictionary_root: lookup("I18N_DICTIONARY_ROOT")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            languages: lookup("I18N_LANGUAGES")
                .map(|v| {
                    v.split(',')
                        .map(|lang| lang.trim().to_string())
                        .filter(|lang| !lang.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|langs| !langs.is_empty()),
        })
    }

    /// Resolve a marker's dictionary path against `dictionary_root`.
    /// Absolute paths are returned unchanged.
    pub fn resolve_dictionary_path(&self, path: &Path) -> PathBuf {
        match &self.dictionary_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// The declared languages to check, filtered by `languages` if set.
    pub fn select_languages<'a>(&self, declared: &'a [String]) -> Vec<&'a str> {
        declared
            .iter()
            .filter(|lang| match &self.languages {
                Some(allowed) => allowed.contains(*lang),
                None => true,
            })
            .map(String::as_str)
            .collect()
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("expected true/false, got '{}'", other),
    }
}
