//! Argument vectors: the ordered parameters a data source supplies to a test.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered, fixed-arity list of heterogeneous test parameters.
///
/// Values use the JSON value model so strings, numbers, booleans and
/// structured objects can sit side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentVector(Vec<Value>);

impl ArgumentVector {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// Borrow the string at `index`, failing if it is absent or not a string.
    ///
    /// Test bodies use this to unpack their parameters with `?`.
    pub fn str(&self, index: usize) -> Result<&str> {
        match self.0.get(index) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(anyhow!(
                "argument {} is not a string: {}",
                index,
                other
            )),
            None => Err(anyhow!(
                "argument {} out of range (arity {})",
                index,
                self.0.len()
            )),
        }
    }

    /// Read the integer at `index`.
    pub fn i64(&self, index: usize) -> Result<i64> {
        self.0
            .get(index)
            .and_then(Value::as_i64)
            .ok_or_else(|| anyhow!("argument {} is not an integer", index))
    }
}

impl From<Vec<Value>> for ArgumentVector {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for ArgumentVector {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ArgumentVector {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build an [`ArgumentVector`] from a list of JSON-convertible values.
///
/// ```
/// use i18n_rerun::args;
///
/// let row = args!["Who will win the World Cup", 2014, true];
/// assert_eq!(row.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        $crate::ArgumentVector::new(vec![$($crate::serde_json::json!($value)),*])
    };
}
