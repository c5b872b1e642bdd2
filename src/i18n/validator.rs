//! Dictionary coverage audit.
//!
//! Checks that every entry covers every declared language. This does not
//! judge translation quality, only whether a lookup would succeed.

use super::Dictionary;
use serde::Serialize;
use std::fmt;

/// Something the audit noticed about one dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "finding", rename_all = "snake_case")]
pub enum CoverageFinding {
    /// Declared languages the entry has no translation for.
    MissingLanguages {
        keyword: String,
        languages: Vec<String>,
    },
    /// Looked up as missing during a run.
    EmptyTranslation { keyword: String, language: String },
    /// Never used: only declared languages are iterated.
    UndeclaredLanguage { keyword: String, language: String },
    NoLanguages,
    NoEntries,
}

impl CoverageFinding {
    /// Whether a run will hit this as a missing translation.
    pub fn is_gap(&self) -> bool {
        matches!(
            self,
            CoverageFinding::MissingLanguages { .. } | CoverageFinding::EmptyTranslation { .. }
        )
    }
}

impl fmt::Display for CoverageFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLanguages { keyword, languages } => {
                write!(f, "keyword {:?} missing languages: {}", keyword, languages.join(", "))
            }
            Self::EmptyTranslation { keyword, language } => {
                write!(f, "keyword {:?} has an empty `{}` translation", keyword, language)
            }
            Self::UndeclaredLanguage { keyword, language } => {
                write!(f, "keyword {:?} has undeclared language `{}`", keyword, language)
            }
            Self::NoLanguages => f.write_str("no languages declared; i18n checks will not run"),
            Self::NoEntries => f.write_str("dictionary has no entries"),
        }
    }
}

/// Audit findings for one dictionary, dictionary-level findings first, then
/// by keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub findings: Vec<CoverageFinding>,
}

impl CoverageReport {
    pub fn gaps(&self) -> impl Iterator<Item = &CoverageFinding> {
        self.findings.iter().filter(|f| f.is_gap())
    }

    pub fn has_gaps(&self) -> bool {
        self.gaps().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Checks every entry of a dictionary against its declared languages.
pub struct CoverageAuditor;

impl CoverageAuditor {
    pub fn audit(dictionary: &Dictionary) -> CoverageReport {
        let mut findings = Vec::new();

        if dictionary.languages().is_empty() {
            findings.push(CoverageFinding::NoLanguages);
        }
        if dictionary.is_empty() {
            findings.push(CoverageFinding::NoEntries);
        }

        for (keyword, translations) in dictionary.entries() {
            let missing: Vec<String> = dictionary
                .languages()
                .iter()
                .filter(|lang| !translations.contains_key(lang.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                findings.push(CoverageFinding::MissingLanguages {
                    keyword: keyword.to_string(),
                    languages: missing,
                });
            }

            for (language, translation) in translations {
                if !dictionary.languages().contains(language) {
                    findings.push(CoverageFinding::UndeclaredLanguage {
                        keyword: keyword.to_string(),
                        language: language.clone(),
                    });
                } else if translation.is_empty() {
                    findings.push(CoverageFinding::EmptyTranslation {
                        keyword: keyword.to_string(),
                        language: language.clone(),
                    });
                }
            }
        }

        CoverageReport { findings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(json: &str) -> Dictionary {
        Dictionary::parse(json).expect("Should parse")
    }

    // ==================== Audit Tests ====================

    #[test]
    fn test_audit_full_coverage_is_clean() {
        let d = dict(
            r#"{"languages": ["es", "fr"], "entries": {
                "hello": {"es": "hola", "fr": "bonjour"},
                "bye": {"es": "adiós", "fr": "au revoir"}
            }}"#,
        );
        let report = CoverageAuditor::audit(&d);
        assert!(report.is_clean());
        assert!(!report.has_gaps());
    }

    #[test]
    fn test_audit_missing_language() {
        let d = dict(r#"{"languages": ["es", "fr", "de"], "entries": {"hello": {"es": "hola"}}}"#);
        let report = CoverageAuditor::audit(&d);

        assert!(report.has_gaps());
        assert_eq!(
            report.findings,
            vec![CoverageFinding::MissingLanguages {
                keyword: "hello".to_string(),
                languages: vec!["fr".to_string(), "de".to_string()],
            }]
        );
        assert_eq!(
            report.findings[0].to_string(),
            "keyword \"hello\" missing languages: fr, de"
        );
    }

    #[test]
    fn test_audit_empty_translation_is_gap() {
        let d = dict(r#"{"languages": ["es"], "entries": {"hello": {"es": ""}}}"#);
        let report = CoverageAuditor::audit(&d);

        assert_eq!(report.gaps().count(), 1);
        assert!(matches!(
            &report.findings[0],
            CoverageFinding::EmptyTranslation { language, .. } if language == "es"
        ));
    }

    #[test]
    fn test_audit_undeclared_language_is_not_gap() {
        let d = dict(r#"{"languages": ["es"], "entries": {"hello": {"es": "hola", "de": ""}}}"#);
        let report = CoverageAuditor::audit(&d);

        assert!(!report.has_gaps());
        assert!(!report.is_clean());
        assert_eq!(
            report.findings,
            vec![CoverageFinding::UndeclaredLanguage {
                keyword: "hello".to_string(),
                language: "de".to_string(),
            }]
        );
    }

    #[test]
    fn test_audit_empty_dictionary() {
        let d = dict(r#"{"languages": [], "entries": {}}"#);
        let report = CoverageAuditor::audit(&d);

        assert!(!report.has_gaps());
        assert_eq!(
            report.findings,
            vec![CoverageFinding::NoLanguages, CoverageFinding::NoEntries]
        );
    }

    #[test]
    fn test_coverage_report_serializes() {
        let d = dict(r#"{"languages": ["es"], "entries": {"hello": {}}}"#);
        let report = CoverageAuditor::audit(&d);

        let json = serde_json::to_value(&report).expect("Should serialize");
        assert_eq!(json["findings"][0]["finding"], "missing_languages");
        assert_eq!(json["findings"][0]["keyword"], "hello");
        assert_eq!(json["findings"][0]["languages"][0], "es");
    }
}
