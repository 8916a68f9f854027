//! Fallback chain computation

use std::collections::HashMap;

use super::FallbackProvider;
use crate::config::FallbacksConfig;
use crate::error::TranslateError;
use crate::types::Locale;

/// Fallback chains built from per-locale mappings and a default list.
///
/// The chain for a locale is the locale and its parents, then every mapped
/// fallback (recursively, with its own parents and mappings), then the defaults.
/// Each locale appears at most once; cyclic mappings are cut at the first repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fallbacks {
    /// Tried after every mapped fallback
    defaults: Vec<Locale>,
    /// Explicit fallbacks per locale
    map: HashMap<Locale, Vec<Locale>>,
}

impl Fallbacks {
    /// Fallbacks with `defaults` and no per-locale mapping.
    #[must_use]
    pub fn new(defaults: Vec<Locale>) -> Self {
        Self { defaults, map: HashMap::new() }
    }

    /// Builds fallbacks from configuration.
    ///
    /// # Errors
    /// `InvalidLocale` for any malformed identifier.
    pub fn from_config(config: &FallbacksConfig) -> Result<Self, TranslateError> {
        let defaults = config
            .defaults
            .iter()
            .map(|raw| Locale::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        let mut fallbacks = Self::new(defaults);
        for (raw, chain) in &config.map {
            let chain = chain.iter().map(|raw| Locale::parse(raw)).collect::<Result<Vec<_>, _>>()?;
            fallbacks.map(Locale::parse(raw)?, chain);
        }
        Ok(fallbacks)
    }

    /// Adds fallbacks for `locale` after the ones already mapped.
    pub fn map(&mut self, locale: Locale, fallbacks: impl IntoIterator<Item = Locale>) {
        self.map.entry(locale).or_default().extend(fallbacks);
    }

    /// Locales tried last, for every chain.
    #[must_use]
    pub fn defaults(&self) -> &[Locale] {
        &self.defaults
    }

    /// Chain for `locale`, starting with `locale` itself.
    #[must_use]
    pub fn compute(&self, locale: &Locale) -> Vec<Locale> {
        let mut chain = Vec::new();
        self.expand(locale, &mut chain);
        for default in &self.defaults {
            self.expand(default, &mut chain);
        }
        chain
    }

    /// Appends `locale`, its parents and their mapped fallbacks that are not in `chain` yet.
    fn expand(&self, locale: &Locale, chain: &mut Vec<Locale>) {
        let mut tags = vec![locale.clone()];
        tags.extend(locale.parents());
        tags.retain(|tag| !chain.contains(tag));
        chain.extend(tags.iter().cloned());

        for tag in &tags {
            let Some(mapped) = self.map.get(tag) else {
                continue;
            };
            for fallback in mapped {
                if !chain.contains(fallback) {
                    self.expand(fallback, chain);
                }
            }
        }
    }
}

impl FallbackProvider for Fallbacks {
    fn fallback_chain(&self, locale: &Locale) -> Vec<Locale> {
        self.compute(locale)
    }
}
