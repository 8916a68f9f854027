//! Core types used throughout the project.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use crate::error::{
    StoreError,
    TranslateError,
};

/// Maximum length of a single locale subtag.
const MAX_SUBTAG_LENGTH: usize = 8;

/// A canonical locale identifier (e.g. `en`, `pt-BR`, `zh_Hant_TW`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Coerces a raw identifier into a locale.
    ///
    /// Surrounding whitespace is dropped; case and separators are kept as given.
    ///
    /// # Errors
    /// `InvalidLocale` when the identifier is empty or not made of a 2-8 letter
    /// language subtag followed by `-`/`_` separated alphanumeric subtags.
    pub fn parse(raw: &str) -> Result<Self, TranslateError> {
        let trimmed = raw.trim();
        if is_well_formed(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(TranslateError::InvalidLocale(raw.to_string()))
        }
    }

    /// The identifier as given, minus surrounding whitespace.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Less specific locales, most specific first.
    ///
    /// `de-AT-x` yields `de-AT`, then `de`.
    #[must_use]
    pub fn parents(&self) -> Vec<Self> {
        let mut parents = Vec::new();
        let mut current = self.0.as_str();
        while let Some(index) = current.rfind(['-', '_']) {
            current = current.split_at(index).0;
            parents.push(Self(current.to_string()));
        }
        parents
    }

    /// Suffix used in accessor names.
    ///
    /// Case and digits are kept, `_` becomes `__` and `-` becomes `_`
    /// (`pt-BR` -> `pt_BR`, `pt_BR` -> `pt__BR`, `es-419` -> `es_419`), so distinct
    /// locales never share a suffix.
    #[must_use]
    pub fn accessor_suffix(&self) -> String {
        self.0.replace('_', "__").replace('-', "_")
    }
}

/// Checks the subtag structure of a trimmed identifier.
fn is_well_formed(tag: &str) -> bool {
    let mut subtags = tag.split(['-', '_']);
    let Some(language) = subtags.next() else {
        return false;
    };
    if !(2..=MAX_SUBTAG_LENGTH).contains(&language.len())
        || !language.chars().all(|c| c.is_ascii_alphabetic())
    {
        return false;
    }
    subtags.all(|subtag| {
        (1..=MAX_SUBTAG_LENGTH).contains(&subtag.len())
            && subtag.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

impl TryFrom<String> for Locale {
    type Error = TranslateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Locale {
    type Error = TranslateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Locale {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if the value is empty or whitespace only.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Translations of one attribute, keyed by locale identifier.
///
/// Persisted as a JSON object whose members are all strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationMap(BTreeMap<String, String>);

impl TranslationMap {
    /// The empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value for `locale`, blank or not.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Returns the value only if it is present and not blank.
    #[must_use]
    pub fn get_present(&self, locale: &str) -> Option<&str> {
        self.get(locale).filter(|value| !is_blank(value))
    }

    /// Stores `value` for `locale`, returning the previous value.
    pub fn insert(&mut self, locale: &Locale, value: impl Into<String>) -> Option<String> {
        self.0.insert(locale.as_str().to_string(), value.into())
    }

    /// Removes `locale`, returning its value.
    pub fn remove(&mut self, locale: &str) -> Option<String> {
        self.0.remove(locale)
    }

    /// Whether `locale` has a stored value.
    #[must_use]
    pub fn contains_locale(&self, locale: &str) -> bool {
        self.0.contains_key(locale)
    }

    /// Number of locales with a stored value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no locale has a stored value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(locale, value)` pairs in locale order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(locale, value)| (locale.as_str(), value.as_str()))
    }

    /// Drops every blank value.
    pub fn retain_present(&mut self) {
        self.0.retain(|_, value| !is_blank(value));
    }

    /// Decodes the raw value of a backing field.
    ///
    /// A missing field or JSON `null` decodes as the empty map.
    ///
    /// # Errors
    /// `StoreError::Malformed` when the value is not an object of strings.
    pub fn from_field_value(field: &str, value: Option<Value>) -> Result<Self, StoreError> {
        let malformed = || StoreError::Malformed { field: field.to_string() };
        match value {
            None | Some(Value::Null) => Ok(Self::new()),
            Some(Value::Object(object)) => object
                .into_iter()
                .map(|(locale, value)| match value {
                    Value::String(text) => Ok((locale, text)),
                    _ => Err(malformed()),
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Self),
            Some(_) => Err(malformed()),
        }
    }

    /// Encodes the map as the JSON object stored in the backing field.
    #[must_use]
    pub fn to_field_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(locale, value)| (locale.clone(), Value::String(value.clone())))
                .collect::<Map<_, _>>(),
        )
    }
}

impl<L: AsRef<str>, V: Into<String>> FromIterator<(L, V)> for TranslationMap {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(locale, value)| (locale.as_ref().to_string(), value.into())).collect())
    }
}
