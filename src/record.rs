//! Translated record facade
//!
//! Ties a model's backing fields to the codec, the resolution engine, the
//! accessor table and the fallback toggle.
//!
//! ```text
//! read_accessor("title_fr") ──► AccessorTable ──► resolve(fallback = false)
//! write_accessor("title_fr=") ─► AccessorTable ──► store::write(allow_blank)
//! read("title") ─────────────────────────────────► resolve(fallback = true)
//! ```

use std::fmt;
use std::sync::Arc;

use crate::accessors::{
    AccessorTable,
    SyncReport,
    desired_locales,
};
use crate::error::TranslateError;
use crate::fallback::{
    FallbackState,
    FallbackToggle,
};
use crate::locale::I18nContext;
use crate::resolve::{
    ReadOptions,
    resolve,
};
use crate::store::{
    self,
    BackingField,
    DEFAULT_SUFFIX,
};
use crate::types::{
    Locale,
    TranslationMap,
};

/// Evaluated per record to get the locales it exposes accessors for.
pub type LocaleAccessorsFn<B> = dyn Fn(&B) -> Vec<String> + Send + Sync;

/// Declaration of the translatable attributes of one record type.
pub struct Translates<B> {
    /// Declared attribute names
    attributes: Vec<String>,
    /// Keep blank values on write
    allow_blank: bool,
    /// Appended to an attribute name to get its backing field
    suffix: String,
    /// Locale list the accessor table is reconciled against
    locale_accessors: Option<Arc<LocaleAccessorsFn<B>>>,
}

impl<B> Translates<B> {
    /// Declares `attributes` as translatable, with blank stripping and the default suffix.
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            allow_blank: false,
            suffix: DEFAULT_SUFFIX.to_string(),
            locale_accessors: None,
        }
    }

    /// Keep blank values instead of treating them as "no translation".
    #[must_use]
    pub const fn allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    /// Backing field suffix (`_translations` unless set).
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Per-record locale list that accessors are reconciled against.
    #[must_use]
    pub fn locale_accessors<F>(mut self, locales: F) -> Self
    where
        F: Fn(&B) -> Vec<String> + Send + Sync + 'static,
    {
        self.locale_accessors = Some(Arc::new(locales));
        self
    }

    /// Declared attribute names.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Whether blank values are stored.
    #[must_use]
    pub const fn allows_blank(&self) -> bool {
        self.allow_blank
    }

    /// Whether `attribute` was declared.
    #[must_use]
    pub fn is_translatable(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    /// Backing field of a declared attribute.
    ///
    /// # Errors
    /// `UnknownAttribute` if `attribute` was not declared.
    pub fn field_name(&self, attribute: &str) -> Result<String, TranslateError> {
        if !self.is_translatable(attribute) {
            return Err(TranslateError::UnknownAttribute(attribute.to_string()));
        }
        Ok(store::field_name(attribute, &self.suffix))
    }
}

impl<B> Clone for Translates<B> {
    fn clone(&self) -> Self {
        Self {
            attributes: self.attributes.clone(),
            allow_blank: self.allow_blank,
            suffix: self.suffix.clone(),
            locale_accessors: self.locale_accessors.clone(),
        }
    }
}

impl<B> fmt::Debug for Translates<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translates")
            .field("attributes", &self.attributes)
            .field("allow_blank", &self.allow_blank)
            .field("suffix", &self.suffix)
            .field("locale_accessors", &self.locale_accessors.is_some())
            .finish()
    }
}

/// A model with translatable attributes.
#[derive(Debug)]
pub struct TranslatedRecord<B> {
    /// Owner of the backing fields
    model: B,
    /// Shared by every record of the type
    translates: Arc<Translates<B>>,
    /// Locale collaborators
    i18n: I18nContext,
    /// Per-record fallback flag
    fallback: FallbackState,
    /// Per-locale readers and writers of this record
    accessors: AccessorTable,
}

impl<B: BackingField> TranslatedRecord<B> {
    /// Wraps `model`, defining accessors for every available locale and then
    /// reconciling them with the declared locale list, if any.
    ///
    /// # Errors
    /// `InvalidLocale` if the locale list holds a malformed identifier.
    pub fn new(
        model: B,
        translates: Arc<Translates<B>>,
        i18n: I18nContext,
    ) -> Result<Self, TranslateError> {
        let accessors = AccessorTable::baseline(translates.attributes(), &i18n.available_locales());
        let mut record =
            Self { model, translates, i18n, fallback: FallbackState::default(), accessors };
        record.sync_locale_accessors()?;
        Ok(record)
    }

    /// Re-evaluates the locale list and reconciles the accessor table with it.
    ///
    /// Returns an empty report when no locale list was declared.
    ///
    /// # Errors
    /// `InvalidLocale` if the locale list holds a malformed identifier.
    pub fn sync_locale_accessors(&mut self) -> Result<SyncReport, TranslateError> {
        let Some(locales) = &self.translates.locale_accessors else {
            return Ok(SyncReport::default());
        };

        let desired = desired_locales(locales(&self.model))?;
        let available = self.i18n.available_locales();
        let report = self.accessors.sync(self.translates.attributes(), &desired, &available);
        if !report.is_empty() {
            tracing::debug!(
                "Accessors synchronized: added={:?}, removed={:?}",
                report.added,
                report.removed
            );
        }
        Ok(report)
    }

    /// Value of `attribute` in the active locale, with fallback.
    ///
    /// # Errors
    /// See [`Self::read_with`].
    pub fn read(&self, attribute: &str) -> Result<Option<String>, TranslateError> {
        self.read_with(attribute, ReadOptions::default())
    }

    /// # Errors
    /// - `UnknownAttribute`
    /// - backing field failures
    /// - interpolation errors other than a missing argument
    pub fn read_with(
        &self,
        attribute: &str,
        options: ReadOptions<'_>,
    ) -> Result<Option<String>, TranslateError> {
        let translations = self.translations(attribute)?;
        let locale = options.locale.cloned().unwrap_or_else(|| self.i18n.active_locale());
        let value = resolve(
            &translations,
            &locale,
            options.fallback,
            self.fallback,
            options.params,
            &self.i18n,
        )?;
        Ok(value)
    }

    /// Writes `value` for the active locale.
    ///
    /// # Errors
    /// See [`Self::write_in`].
    pub fn write(
        &mut self,
        attribute: &str,
        value: Option<&str>,
    ) -> Result<Option<String>, TranslateError> {
        let locale = self.i18n.active_locale();
        self.write_in(attribute, value, &locale)
    }

    /// Writes `value` for `locale` and returns what was stored.
    ///
    /// # Errors
    /// `UnknownAttribute` or backing field failures.
    pub fn write_in(
        &mut self,
        attribute: &str,
        value: Option<&str>,
        locale: &Locale,
    ) -> Result<Option<String>, TranslateError> {
        let field = self.translates.field_name(attribute)?;
        let stored =
            store::write(&mut self.model, &field, value, locale, self.translates.allows_blank())?;
        Ok(stored)
    }

    /// The whole translation map of `attribute`.
    ///
    /// # Errors
    /// `UnknownAttribute` or backing field failures.
    pub fn translations(&self, attribute: &str) -> Result<TranslationMap, TranslateError> {
        let field = self.translates.field_name(attribute)?;
        Ok(store::read_map(&self.model, &field)?)
    }

    /// Replaces the translation map of `attribute`; returns whether it changed.
    ///
    /// # Errors
    /// `UnknownAttribute` or backing field failures.
    pub fn set_translations(
        &mut self,
        attribute: &str,
        translations: TranslationMap,
    ) -> Result<bool, TranslateError> {
        let field = self.translates.field_name(attribute)?;
        let changed = store::replace(
            &mut self.model,
            &field,
            translations,
            self.translates.allows_blank(),
        )?;
        Ok(changed)
    }

    /// Calls a reader accessor such as `title_fr`. Readers never fall back.
    ///
    /// # Errors
    /// `UndefinedAccessor` for names without a reader, then as [`Self::read_with`].
    pub fn read_accessor(
        &self,
        name: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<String>, TranslateError> {
        let descriptor = self
            .accessors
            .lookup(name)
            .filter(|_| !name.ends_with('='))
            .ok_or_else(|| TranslateError::UndefinedAccessor(name.to_string()))?;

        let options = ReadOptions::new().locale(&descriptor.locale).fallback(false).params(params);
        self.read_with(&descriptor.attribute, options)
    }

    /// Calls a writer accessor such as `title_fr=` (the `=` is optional).
    ///
    /// # Errors
    /// `UndefinedAccessor` for unknown names, then as [`Self::write_in`].
    pub fn write_accessor(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> Result<Option<String>, TranslateError> {
        let descriptor = self
            .accessors
            .lookup(name)
            .cloned()
            .ok_or_else(|| TranslateError::UndefinedAccessor(name.to_string()))?;

        self.write_in(&descriptor.attribute, value, &descriptor.locale)
    }

    /// Whether `name` (reader or writer) dispatches to an accessor.
    #[must_use]
    pub fn has_accessor(&self, name: &str) -> bool {
        self.accessors.lookup(name).is_some()
    }

    /// Reader names, sorted.
    #[must_use]
    pub fn accessor_names(&self) -> Vec<String> {
        self.accessors.names().map(str::to_string).collect()
    }
}

impl<B> TranslatedRecord<B> {
    /// The wrapped model.
    #[must_use]
    pub const fn model(&self) -> &B {
        &self.model
    }

    /// Direct access to the model; call [`TranslatedRecord::sync_locale_accessors`]
    /// after changing what the locale list depends on.
    pub const fn model_mut(&mut self) -> &mut B {
        &mut self.model
    }

    /// Unwraps the model.
    pub fn into_model(self) -> B {
        self.model
    }

    /// Locale collaborators of this record.
    #[must_use]
    pub const fn i18n(&self) -> &I18nContext {
        &self.i18n
    }

    /// Declaration shared by the record type.
    #[must_use]
    pub fn translates(&self) -> &Translates<B> {
        &self.translates
    }

    /// Accessor table of this record.
    #[must_use]
    pub const fn accessors(&self) -> &AccessorTable {
        &self.accessors
    }
}

impl<B> FallbackToggle for TranslatedRecord<B> {
    fn fallback_state(&self) -> FallbackState {
        self.fallback
    }

    fn fallback_state_mut(&mut self) -> &mut FallbackState {
        &mut self.fallback
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::{
        Value,
        json,
    };

    use super::*;
    use crate::store::MemoryModel;
    use crate::test_utils::{
        locale,
        static_i18n,
        static_i18n_with_fallbacks,
    };

    /// Locales listed in the model's own `locales` field.
    fn model_locales(model: &MemoryModel) -> Vec<String> {
        model
            .field("locales")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[fixture]
    fn context() -> I18nContext {
        I18nContext::from_static(&static_i18n_with_fallbacks(&["en", "fr"], &[("fr", "en")]))
    }

    fn record(translates: Translates<MemoryModel>, context: I18nContext) -> TranslatedRecord<MemoryModel> {
        TranslatedRecord::new(MemoryModel::new(), Arc::new(translates), context).unwrap()
    }

    #[rstest]
    fn write_uses_active_locale(context: I18nContext) {
        let mut record = record(Translates::new(["title"]), context);

        record.write("title", Some("Hello")).unwrap();

        assert_that!(record.model().field("title_translations"), some(eq(&json!({"en": "Hello"}))));
        assert_that!(record.read("title"), ok(some(eq("Hello"))));
    }

    #[rstest]
    fn read_with_locale_and_fallback(context: I18nContext) {
        let mut record = record(Translates::new(["title"]), context);
        record.write_in("title", Some("Hello"), &locale("en")).unwrap();
        let fr = locale("fr");

        let with_fallback = record.read_with("title", ReadOptions::new().locale(&fr));
        let without_fallback =
            record.read_with("title", ReadOptions::new().locale(&fr).fallback(false));

        assert_that!(with_fallback, ok(some(eq("Hello"))));
        assert_that!(without_fallback, ok(none()));
    }

    #[rstest]
    fn custom_suffix_names_backing_field(context: I18nContext) {
        let mut record = record(Translates::new(["body"]).suffix("_i18n"), context);

        record.write("body", Some("Text")).unwrap();

        assert_that!(record.model().field("body_i18n"), some(eq(&json!({"en": "Text"}))));
    }

    #[rstest]
    fn unknown_attribute_is_rejected(context: I18nContext) {
        let mut record = record(Translates::new(["title"]), context);

        assert!(matches!(
            record.write("name", Some("x")),
            Err(TranslateError::UnknownAttribute(ref a)) if a == "name"
        ));
        assert!(matches!(record.read("name"), Err(TranslateError::UnknownAttribute(_))));
    }

    #[rstest]
    fn baseline_accessors_cover_available_locales(context: I18nContext) {
        let record = record(Translates::new(["title", "body"]), context);

        assert_that!(
            record.accessor_names(),
            elements_are![eq("body_en"), eq("body_fr"), eq("title_en"), eq("title_fr")]
        );
    }

    #[rstest]
    fn accessor_reader_does_not_fall_back(context: I18nContext) {
        let mut record = record(Translates::new(["title"]), context);
        record.write_accessor("title_en=", Some("Hello")).unwrap();

        assert_that!(record.read_accessor("title_en", &[]), ok(some(eq("Hello"))));
        assert_that!(record.read_accessor("title_fr", &[]), ok(none()));
    }

    #[rstest]
    fn accessor_reader_interpolates(context: I18nContext) {
        let mut record = record(Translates::new(["title"]), context);
        record.write_accessor("title_en", Some("Hello %{name}")).unwrap();

        let result = record.read_accessor("title_en", &[("name", "Alice")]);

        assert_that!(result, ok(some(eq("Hello Alice"))));
    }

    #[rstest]
    fn undefined_accessor_is_rejected(context: I18nContext) {
        let mut record = record(Translates::new(["title"]), context);

        assert!(matches!(
            record.read_accessor("title_de", &[]),
            Err(TranslateError::UndefinedAccessor(ref n)) if n == "title_de"
        ));
        assert!(matches!(
            record.read_accessor("title_en=", &[]),
            Err(TranslateError::UndefinedAccessor(_))
        ));
        assert!(matches!(
            record.write_accessor("title_de=", Some("Hallo")),
            Err(TranslateError::UndefinedAccessor(_))
        ));
    }

    #[rstest]
    fn writer_accessor_follows_blank_policy(context: I18nContext) {
        let mut strict = record(Translates::new(["title"]), context.clone());
        let mut lenient = record(Translates::new(["title"]).allow_blank(true), context);

        let stripped = strict.write_accessor("title_fr=", Some(" ")).unwrap();
        let kept = lenient.write_accessor("title_fr=", Some(" ")).unwrap();

        assert_that!(stripped, none());
        assert_that!(kept, some(eq(" ")));
        assert_that!(lenient.read_accessor("title_fr", &[]), ok(some(eq(" "))));
    }

    #[rstest]
    fn set_translations_replaces_map(context: I18nContext) {
        let mut record = record(Translates::new(["title"]), context);
        record.write_in("title", Some("Hallo"), &locale("de")).unwrap();
        let translations: TranslationMap = [("en", "Hello"), ("fr", "")].into_iter().collect();

        let changed = record.set_translations("title", translations).unwrap();

        assert_that!(changed, eq(true));
        assert_that!(record.translations("title").unwrap().len(), eq(1));
        assert_that!(record.read_accessor("title_en", &[]), ok(some(eq("Hello"))));
    }

    #[rstest]
    fn locale_list_reconciles_accessors(context: I18nContext) {
        let translates = Translates::new(["title"]).locale_accessors(model_locales);
        let model = MemoryModel::new().with_field("locales", json!(["en", "de"]));

        let mut record = TranslatedRecord::new(model, Arc::new(translates), context).unwrap();

        assert_that!(record.accessor_names(), elements_are![eq("title_de"), eq("title_en")]);

        record.write_accessor("title_de=", Some("Hallo")).unwrap();
        assert_that!(record.read_accessor("title_de", &[]), ok(some(eq("Hallo"))));
    }

    #[rstest]
    fn resync_after_model_change(context: I18nContext) {
        let translates = Translates::new(["title"]).locale_accessors(model_locales);
        let model = MemoryModel::new().with_field("locales", json!(["en"]));
        let mut record = TranslatedRecord::new(model, Arc::new(translates), context).unwrap();

        record.model_mut().set("locales", json!(["en", "fr", "de"])).unwrap();
        let report = record.sync_locale_accessors().unwrap();

        assert_that!(report.added, elements_are![eq("title_fr"), eq("title_de")]);
        assert_that!(report.removed, is_empty());
        assert!(record.sync_locale_accessors().unwrap().is_empty());
    }

    #[rstest]
    fn malformed_locale_list_fails_construction(context: I18nContext) {
        let translates =
            Translates::new(["title"]).locale_accessors(|_: &MemoryModel| vec!["not a locale".to_string()]);

        let result = TranslatedRecord::new(MemoryModel::new(), Arc::new(translates), context);

        assert!(matches!(result, Err(TranslateError::InvalidLocale(_))));
    }

    #[rstest]
    fn disabled_fallback_applies_to_reads(context: I18nContext) {
        let mut record = record(Translates::new(["title"]), context);
        record.write_in("title", Some("Hello"), &locale("en")).unwrap();
        let fr = locale("fr");

        let inside = record.with_fallback_disabled(|r| {
            r.read_with("title", ReadOptions::new().locale(&fr)).unwrap()
        });
        let after = record.read_with("title", ReadOptions::new().locale(&fr)).unwrap();

        assert_that!(inside, none());
        assert_that!(after, some(eq("Hello")));
    }

    #[rstest]
    fn records_without_fallbacks_read_requested_locale_only() {
        let context = I18nContext::from_static(&static_i18n(&["en", "fr"]));
        let mut record = record(Translates::new(["title"]), context);
        record.write_in("title", Some("Hello"), &locale("en")).unwrap();
        let fr = locale("fr");

        assert_that!(record.read_with("title", ReadOptions::new().locale(&fr)), ok(none()));
    }
}
