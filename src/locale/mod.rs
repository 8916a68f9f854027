//! Locale collaborators consulted while reading and writing translations.
//!
//! The record layer never reaches for global state: the active locale, the
//! available locales, fallback chains and interpolation are all injected
//! through an [`I18nContext`].

mod fallbacks;
mod static_i18n;

use std::fmt;
use std::sync::Arc;

pub use fallbacks::Fallbacks;
pub use static_i18n::StaticI18n;

use crate::interpolate::{
    DefaultInterpolator,
    Interpolator,
};
use crate::types::Locale;

/// Supplies the ambient locale and the locales every record type exposes accessors for.
pub trait LocaleProvider: Send + Sync {
    /// Locale used when a read or write names none.
    fn active_locale(&self) -> Locale;

    /// Locales that get baseline accessors.
    fn available_locales(&self) -> Vec<Locale>;
}

/// Supplies the ordered candidates tried when a locale has no translation.
pub trait FallbackProvider: Send + Sync {
    /// The chain for `locale`, normally starting with `locale` itself.
    fn fallback_chain(&self, locale: &Locale) -> Vec<Locale>;
}

/// The collaborators a translated record resolves against.
#[derive(Clone)]
pub struct I18nContext {
    /// Active and available locales
    locales: Arc<dyn LocaleProvider>,
    /// `None` when fallbacks are not configured
    fallbacks: Option<Arc<dyn FallbackProvider>>,
    /// Fills `%{name}` placeholders
    interpolator: Arc<dyn Interpolator>,
}

impl I18nContext {
    /// A context with no fallback provider and the default interpolator.
    #[must_use]
    pub fn new(locales: Arc<dyn LocaleProvider>) -> Self {
        Self { locales, fallbacks: None, interpolator: Arc::new(DefaultInterpolator) }
    }

    /// Wires every collaborator to one `StaticI18n`.
    ///
    /// The fallback provider is only installed when the settings enable fallbacks.
    #[must_use]
    pub fn from_static(i18n: &Arc<StaticI18n>) -> Self {
        let context = Self::new(Arc::clone(i18n) as Arc<dyn LocaleProvider>);
        if i18n.fallbacks().is_some() {
            context.with_fallbacks(Arc::clone(i18n) as Arc<dyn FallbackProvider>)
        } else {
            context
        }
    }

    /// Installs a fallback provider.
    #[must_use]
    pub fn with_fallbacks(mut self, fallbacks: Arc<dyn FallbackProvider>) -> Self {
        self.fallbacks = Some(fallbacks);
        self
    }

    /// Replaces the interpolator.
    #[must_use]
    pub fn with_interpolator(mut self, interpolator: Arc<dyn Interpolator>) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Active locale of the locale provider.
    #[must_use]
    pub fn active_locale(&self) -> Locale {
        self.locales.active_locale()
    }

    /// Available locales of the locale provider.
    #[must_use]
    pub fn available_locales(&self) -> Vec<Locale> {
        self.locales.available_locales()
    }

    /// Whether a fallback provider is installed.
    #[must_use]
    pub fn has_fallbacks(&self) -> bool {
        self.fallbacks.is_some()
    }

    /// Candidates for `locale`: the provider's chain when `enabled` and a provider
    /// exists, `[locale]` otherwise.
    #[must_use]
    pub fn fallback_chain(&self, locale: &Locale, enabled: bool) -> Vec<Locale> {
        match &self.fallbacks {
            Some(provider) if enabled => provider.fallback_chain(locale),
            _ => vec![locale.clone()],
        }
    }

    /// Interpolator applied to resolved translations.
    #[must_use]
    pub fn interpolator(&self) -> &dyn Interpolator {
        self.interpolator.as_ref()
    }
}

impl fmt::Debug for I18nContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18nContext")
            .field("active_locale", &self.locales.active_locale())
            .field("has_fallbacks", &self.fallbacks.is_some())
            .finish_non_exhaustive()
    }
}
