//! Locale resolution
//!
//! Picks the stored translation to return for a requested locale.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | No candidate | No locale in the chain has a non-blank value | Returns `None` |
//! | Missing interpolation arg | `%{name}` but no `name` param | Raw translation returned |
//! | Other interpolation error | e.g. reserved placeholder | Error propagated |

use crate::fallback::FallbackState;
use crate::interpolate::InterpolationError;
use crate::locale::I18nContext;
use crate::types::{
    Locale,
    TranslationMap,
};

/// Options for one read; defaults to the active locale with fallback and no params.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions<'a> {
    /// Locale to read, the active locale when `None`
    pub locale: Option<&'a Locale>,
    /// Walk the fallback chain
    pub fallback: bool,
    /// Interpolation parameters; interpolation is skipped when empty
    pub params: &'a [(&'a str, &'a str)],
}

impl Default for ReadOptions<'_> {
    fn default() -> Self {
        Self { locale: None, fallback: true, params: &[] }
    }
}

impl<'a> ReadOptions<'a> {
    /// Active locale, fallback on, no params.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `locale` instead of the active locale.
    #[must_use]
    pub const fn locale(mut self, locale: &'a Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Enables or disables the fallback chain for this read.
    #[must_use]
    pub const fn fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Interpolation parameters.
    #[must_use]
    pub const fn params(mut self, params: &'a [(&'a str, &'a str)]) -> Self {
        self.params = params;
        self
    }
}

/// Resolves the translation for `locale`.
///
/// With `fallback`, the first locale of the chain holding a non-blank value wins;
/// the chain collapses to `[locale]` when `state` disables fallback or `context`
/// has no fallback provider. Without `fallback`, the value stored for `locale` is
/// returned as is.
///
/// # Errors
/// Interpolation errors other than a missing argument.
pub fn resolve(
    translations: &TranslationMap,
    locale: &Locale,
    fallback: bool,
    state: FallbackState,
    params: &[(&str, &str)],
    context: &I18nContext,
) -> Result<Option<String>, InterpolationError> {
    let translation = if fallback {
        let chain = context.fallback_chain(locale, state.allows_fallback());
        let selected = chain.iter().find_map(|candidate| {
            translations.get_present(candidate.as_str()).map(|value| (candidate, value))
        });
        if let Some((candidate, _)) = selected {
            tracing::trace!("Resolved {} through chain {:?} to {}", locale, chain, candidate);
        }
        selected.map(|(_, value)| value)
    } else {
        translations.get(locale.as_str())
    };

    let Some(translation) = translation else {
        return Ok(None);
    };

    if params.is_empty() {
        return Ok(Some(translation.to_string()));
    }

    match context.interpolator().interpolate(translation, params) {
        Ok(interpolated) => Ok(Some(interpolated)),
        Err(e) if e.is_missing_argument() => {
            tracing::debug!("{e}; returning the translation uninterpolated");
            Ok(Some(translation.to_string()))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::interpolate::Interpolator;
    use crate::test_utils::{
        locale,
        static_i18n,
        static_i18n_with_fallbacks,
    };

    /// `fr -> [fr, en]` fallbacks
    #[fixture]
    fn context() -> I18nContext {
        I18nContext::from_static(&static_i18n_with_fallbacks(&["en", "fr", "de"], &[("fr", "en")]))
    }

    fn unset() -> FallbackState {
        FallbackState::default()
    }

    fn disabled() -> FallbackState {
        let mut state = FallbackState::default();
        state.set(false);
        state
    }

    #[rstest]
    fn fallback_reaches_next_locale(context: I18nContext) {
        let translations: TranslationMap = [("en", "Hello")].into_iter().collect();

        let with_fallback = resolve(&translations, &locale("fr"), true, unset(), &[], &context);
        let without_fallback = resolve(&translations, &locale("fr"), false, unset(), &[], &context);

        assert_that!(with_fallback, ok(some(eq("Hello"))));
        assert_that!(without_fallback, ok(none()));
    }

    #[rstest]
    fn requested_locale_wins_over_fallback(context: I18nContext) {
        let translations: TranslationMap =
            [("en", "Hello"), ("fr", "Bonjour")].into_iter().collect();

        let result = resolve(&translations, &locale("fr"), true, unset(), &[], &context);

        assert_that!(result, ok(some(eq("Bonjour"))));
    }

    #[rstest]
    fn blank_value_is_skipped_by_fallback(context: I18nContext) {
        let translations: TranslationMap = [("en", "Hello"), ("fr", "  ")].into_iter().collect();

        let with_fallback = resolve(&translations, &locale("fr"), true, unset(), &[], &context);
        let without_fallback = resolve(&translations, &locale("fr"), false, unset(), &[], &context);

        assert_that!(with_fallback, ok(some(eq("Hello"))));
        assert_that!(without_fallback, ok(some(eq("  "))));
    }

    #[rstest]
    fn no_candidate_returns_none(context: I18nContext) {
        let translations: TranslationMap = [("de", "Hallo")].into_iter().collect();

        let result = resolve(&translations, &locale("fr"), true, unset(), &[], &context);

        assert_that!(result, ok(none()));
    }

    #[rstest]
    fn disabled_state_ignores_chain(context: I18nContext) {
        let translations: TranslationMap = [("en", "Hello")].into_iter().collect();

        let result = resolve(&translations, &locale("fr"), true, disabled(), &[], &context);

        assert_that!(result, ok(none()));
    }

    #[rstest]
    fn missing_provider_means_no_fallback() {
        let context = I18nContext::new(static_i18n(&["en", "fr"]));
        let translations: TranslationMap = [("en", "Hello")].into_iter().collect();

        let result = resolve(&translations, &locale("fr"), true, unset(), &[], &context);

        assert_that!(result, ok(none()));
    }

    #[rstest]
    fn params_are_interpolated(context: I18nContext) {
        let translations: TranslationMap = [("en", "Hello %{name}")].into_iter().collect();

        let result =
            resolve(&translations, &locale("en"), true, unset(), &[("name", "Alice")], &context);

        assert_that!(result, ok(some(eq("Hello Alice"))));
    }

    #[rstest]
    fn missing_param_returns_raw_translation(context: I18nContext) {
        let translations: TranslationMap = [("en", "Hello %{name}")].into_iter().collect();

        let result =
            resolve(&translations, &locale("en"), true, unset(), &[("other", "x")], &context);

        assert_that!(result, ok(some(eq("Hello %{name}"))));
    }

    #[rstest]
    fn empty_params_skip_interpolation(context: I18nContext) {
        let translations: TranslationMap = [("en", "Hello %{name}")].into_iter().collect();

        let result = resolve(&translations, &locale("en"), true, unset(), &[], &context);

        assert_that!(result, ok(some(eq("Hello %{name}"))));
    }

    #[rstest]
    fn reserved_placeholder_propagates(context: I18nContext) {
        let translations: TranslationMap = [("en", "In %{scope}")].into_iter().collect();

        let result =
            resolve(&translations, &locale("en"), true, unset(), &[("scope", "x")], &context);

        assert_that!(result, err(displays_as(contains_substring("Reserved key 'scope'"))));
    }

    /// Interpolator that upper-cases the template, to observe injection.
    struct Shouting;

    impl Interpolator for Shouting {
        fn interpolate(
            &self,
            template: &str,
            _params: &[(&str, &str)],
        ) -> std::result::Result<String, InterpolationError> {
            Ok(template.to_uppercase())
        }
    }

    #[rstest]
    fn injected_interpolator_is_used(context: I18nContext) {
        let context = context.with_interpolator(Arc::new(Shouting));
        let translations: TranslationMap = [("en", "hello")].into_iter().collect();

        let result = resolve(&translations, &locale("en"), true, unset(), &[("a", "b")], &context);

        assert_that!(result, ok(some(eq("HELLO"))));
    }
}
