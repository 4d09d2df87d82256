use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A single sheet cell.
///
/// Sheet cells arrive from the server as plain JSON scalars, so the wire
/// form is untagged: `"+2"`, `true`, `14`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl SheetValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SheetValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SheetValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SheetValue::Integer(value) => Some(*value),
            SheetValue::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            _ => None,
        }
    }

    /// Interprets the cell as a base-10 integer.
    ///
    /// Strings are trimmed and may carry a leading sign (`"+2"`, `"-1"`).
    /// Floats are truncated toward zero. Booleans never parse.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            SheetValue::String(value) => value.trim().parse::<i64>().ok(),
            SheetValue::Boolean(_) => None,
            other => other.as_i64(),
        }
    }

    /// An empty or whitespace-only string cell.
    pub fn is_blank(&self) -> bool {
        matches!(self, SheetValue::String(value) if value.trim().is_empty())
    }

    /// Truthiness as the sheet front-end sees it: `false`, `""`, `0` and
    /// `NaN` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            SheetValue::Boolean(value) => *value,
            SheetValue::Integer(value) => *value != 0,
            SheetValue::Float(value) => *value != 0.0 && !value.is_nan(),
            SheetValue::String(value) => !value.is_empty(),
        }
    }
}

impl From<bool> for SheetValue {
    fn from(value: bool) -> Self {
        SheetValue::Boolean(value)
    }
}

impl From<i64> for SheetValue {
    fn from(value: i64) -> Self {
        SheetValue::Integer(value)
    }
}

impl From<i32> for SheetValue {
    fn from(value: i32) -> Self {
        SheetValue::Integer(value.into())
    }
}

impl From<&str> for SheetValue {
    fn from(value: &str) -> Self {
        SheetValue::String(value.to_string())
    }
}

impl From<String> for SheetValue {
    fn from(value: String) -> Self {
        SheetValue::String(value)
    }
}

/// The open `data` mapping of a character sheet: every cell keyed by field name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetData {
    values: BTreeMap<String, SheetValue>,
}

impl SheetData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SheetValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SheetValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SheetValue> {
        self.values.iter()
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|value| value.as_str().map(str::to_string))
    }

    /// Whether a flag cell (`Charisma-prof`, `spells-lvl1-3-prepped`, ...) is set.
    ///
    /// Missing cells count as unset.
    pub fn is_flag_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(SheetValue::is_truthy)
    }

    /// Reads a numeric cell.
    ///
    /// Returns `Ok(None)` when the cell is absent or blank.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` when the cell holds something
    /// that is not a base-10 integer.
    pub fn get_integer(&self, key: &str) -> Result<Option<i64>, DomainError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) if value.is_blank() => Ok(None),
            Some(value) => value
                .to_integer()
                .map(Some)
                .ok_or_else(|| DomainError::invalid_field(key, format!("expected an integer, got {value:?}"))),
        }
    }

    /// Overlays `other` on top of `self`, field by field.
    pub fn merge(&mut self, other: &SheetData) {
        for (key, value) in other.iter() {
            self.values.insert(key.clone(), value.clone());
        }
    }
}

impl From<BTreeMap<String, SheetValue>> for SheetData {
    fn from(values: BTreeMap<String, SheetValue>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<SheetValue>> FromIterator<(K, V)> for SheetData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SheetData {
    type Item = (&'a String, &'a SheetValue);
    type IntoIter = btree_map::Iter<'a, String, SheetValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
