//! Dictionary-backed translation of test arguments.
//!
//! # Architecture
//!
//! - `dictionary`: Parsed keyword → language → translation resource
//! - `translator`: Builds translated argument vectors from a dictionary
//! - `validator`: Coverage audit of a dictionary against its declared languages
//!
//! # Example
//!
//! ```
//! use i18n_rerun::args;
//! use i18n_rerun::i18n::{translate_arguments, Dictionary};
//!
//! let dict = Dictionary::parse(
//!     r#"{"languages":["es"],"entries":{"hello":{"es":"hola"}}}"#,
//! ).unwrap();
//! let translated = translate_arguments(&args!["hello", 3], "es", &dict).unwrap();
//! assert_eq!(translated, args!["hola", 3]);
//! ```

mod dictionary;
mod translator;
mod validator;

pub use dictionary::Dictionary;
pub use translator::{translate_arguments, TranslatablePositions, Translator};
pub use validator::{CoverageAuditor, CoverageFinding, CoverageReport};
