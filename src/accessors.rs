//! Per-locale accessor table
//!
//! Each translatable attribute gets a reader/writer pair per locale, named
//! `<attribute>_<locale>` (`title_fr`, `title_fr=`). The pairs are plain data
//! consulted by the record's dispatch functions.

use std::collections::{
    BTreeMap,
    HashSet,
};

use crate::error::TranslateError;
use crate::types::Locale;

/// How an accessor came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorOrigin {
    /// Defined for one of the available locales when the record was built
    Baseline,
    /// Added by synchronization for a locale outside the available locales
    Dynamic,
}

/// One reader/writer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorDescriptor {
    /// Translatable attribute
    pub attribute: String,
    /// Locale read and written
    pub locale: Locale,
    /// Baseline or added by synchronization
    pub origin: AccessorOrigin,
}

impl AccessorDescriptor {
    /// Reader name (`title_fr`).
    #[must_use]
    pub fn reader_name(&self) -> String {
        accessor_name(&self.attribute, &self.locale)
    }

    /// Writer name (`title_fr=`).
    #[must_use]
    pub fn writer_name(&self) -> String {
        format!("{}=", self.reader_name())
    }
}

/// Reader name for `attribute` in `locale` (`pt-BR` gives `title_pt_BR`).
#[must_use]
pub fn accessor_name(attribute: &str, locale: &Locale) -> String {
    format!("{attribute}_{}", locale.accessor_suffix())
}

/// Accessors added and removed by one synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Reader names defined, in definition order
    pub added: Vec<String>,
    /// Reader names removed, in removal order
    pub removed: Vec<String>,
}

impl SyncReport {
    /// True when the synchronization changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Accessors keyed by `(attribute, locale)`, with a reader name index for dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessorTable {
    /// (属性, ロケール) -> アクセサ
    entries: BTreeMap<(String, Locale), AccessorDescriptor>,
    /// リーダー名 -> entries のキー
    names: BTreeMap<String, (String, Locale)>,
}

impl AccessorTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One accessor per attribute and available locale.
    #[must_use]
    pub fn baseline(attributes: &[String], available: &[Locale]) -> Self {
        let mut table = Self::new();
        for attribute in attributes {
            for locale in available {
                table.define(attribute, locale, AccessorOrigin::Baseline);
            }
        }
        table
    }

    /// Defines an accessor; returns false if the pair already has one.
    ///
    /// Also returns false, leaving the table unchanged, when another attribute
    /// already owns the same reader name (`a_b` + `c` against `a` + `b-c`).
    pub fn define(&mut self, attribute: &str, locale: &Locale, origin: AccessorOrigin) -> bool {
        let key = (attribute.to_string(), locale.clone());
        if self.entries.contains_key(&key) {
            return false;
        }
        let name = accessor_name(attribute, locale);
        if let Some((owner, owner_locale)) = self.names.get(&name) {
            tracing::warn!(
                "Accessor {} for {}/{} clashes with {}/{}",
                name,
                attribute,
                locale,
                owner,
                owner_locale
            );
            return false;
        }
        self.names.insert(name, key.clone());
        self.entries.insert(
            key,
            AccessorDescriptor { attribute: attribute.to_string(), locale: locale.clone(), origin },
        );
        true
    }

    /// Removes an accessor; removing one that does not exist is a no-op returning false.
    pub fn remove(&mut self, attribute: &str, locale: &Locale) -> bool {
        let key = (attribute.to_string(), locale.clone());
        let Some(descriptor) = self.entries.remove(&key) else {
            return false;
        };
        self.names.remove(&descriptor.reader_name());
        true
    }

    /// Finds the accessor behind a reader (`title_fr`) or writer (`title_fr=`) name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&AccessorDescriptor> {
        let key = self.names.get(name.strip_suffix('=').unwrap_or(name))?;
        self.entries.get(key)
    }

    /// Whether `attribute` has an accessor for `locale`.
    #[must_use]
    pub fn contains(&self, attribute: &str, locale: &Locale) -> bool {
        self.entries.contains_key(&(attribute.to_string(), locale.clone()))
    }

    /// Reader names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Accessors ordered by attribute, then locale.
    pub fn descriptors(&self) -> impl Iterator<Item = &AccessorDescriptor> {
        self.entries.values()
    }

    /// Number of accessor pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no accessor is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reconciles the table with the `desired` locales.
    ///
    /// For each attribute, accessors of available locales that are not desired are
    /// removed, and desired locales get an accessor when they have none. Accessors
    /// added for locales outside `available` stay even once no longer desired.
    pub fn sync(
        &mut self,
        attributes: &[String],
        desired: &[Locale],
        available: &[Locale],
    ) -> SyncReport {
        let mut report = SyncReport::default();

        for attribute in attributes {
            for locale in available.iter().filter(|locale| !desired.contains(locale)) {
                if self.remove(attribute, locale) {
                    tracing::debug!("Removed accessor {}", accessor_name(attribute, locale));
                    report.removed.push(accessor_name(attribute, locale));
                }
            }

            for locale in desired {
                let origin = if available.contains(locale) {
                    AccessorOrigin::Baseline
                } else {
                    AccessorOrigin::Dynamic
                };
                if self.define(attribute, locale, origin) {
                    tracing::debug!("Defined accessor {}", accessor_name(attribute, locale));
                    report.added.push(accessor_name(attribute, locale));
                }
            }
        }

        report
    }
}

/// Coerces raw identifiers into locales, dropping duplicates but keeping order.
///
/// # Errors
/// `InvalidLocale` for the first malformed identifier.
pub fn desired_locales<I, S>(raw: I) -> Result<Vec<Locale>, TranslateError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut locales = Vec::new();
    for item in raw {
        let locale = Locale::parse(item.as_ref())?;
        if seen.insert(locale.clone()) {
            locales.push(locale);
        }
    }
    Ok(locales)
}
