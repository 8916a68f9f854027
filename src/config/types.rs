//! 設定の型定義とバリデーション

use std::collections::{
    BTreeMap,
    HashSet,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::Locale;

/// 設定値 1 件のバリデーションエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "availableLocales[0]")
    pub field_path: String,
    /// エラー内容
    pub message: String,
}

impl ValidationError {
    /// バリデーションエラーを作成する
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// 設定の読み込み・検証エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// バリデーションエラー（全件）
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// ファイル読み込みエラー
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON パースエラー
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// バリデーションエラーを番号付きリストに整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `.json-translate.json` の設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Active locale until one is set explicitly.
    pub default_locale: String,

    /// Locales every translatable attribute gets an accessor for.
    pub available_locales: Vec<String>,

    /// Reject `set_locale` calls for locales outside `available_locales`.
    pub enforce_available_locales: bool,

    /// Fallback chains.
    ///
    /// - `None`: no fallback provider, every chain is just the requested locale (default)
    /// - `Some(..)`: chains are computed from the configured defaults and mapping
    pub fallbacks: Option<FallbacksConfig>,
}

/// フォールバック設定
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FallbacksConfig {
    /// Tried after the requested locale and its mapped fallbacks.
    pub defaults: Vec<String>,

    /// Explicit fallbacks per locale (e.g. `"fr": ["en"]`).
    pub map: BTreeMap<String, Vec<String>>,
}

impl I18nSettings {
    /// # Errors
    /// - Malformed locale identifier
    /// - No available locales, or duplicates
    /// - Default locale not available while enforcement is on
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Locale::parse(&self.default_locale) {
            errors.push(ValidationError::new("defaultLocale", e.to_string()));
        }

        if self.available_locales.is_empty() {
            errors.push(ValidationError::new(
                "availableLocales",
                "At least one locale is required. Example: [\"en\"]",
            ));
        }

        let mut seen = HashSet::new();
        for (index, raw) in self.available_locales.iter().enumerate() {
            match Locale::parse(raw) {
                Ok(locale) => {
                    if !seen.insert(locale) {
                        errors.push(ValidationError::new(
                            format!("availableLocales[{index}]"),
                            format!("Duplicate locale '{raw}'"),
                        ));
                    }
                }
                Err(e) => {
                    errors.push(ValidationError::new(
                        format!("availableLocales[{index}]"),
                        e.to_string(),
                    ));
                }
            }
        }

        if self.enforce_available_locales
            && let Ok(default_locale) = Locale::parse(&self.default_locale)
            && !self.available_locales.is_empty()
            && !seen.contains(&default_locale)
        {
            errors.push(ValidationError::new(
                "defaultLocale",
                format!(
                    "'{}' is not listed in availableLocales. Add it, or disable enforceAvailableLocales",
                    self.default_locale
                ),
            ));
        }

        if let Some(fallbacks) = &self.fallbacks {
            fallbacks.validate_into(&mut errors);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl FallbacksConfig {
    /// フォールバック設定のロケールを検証する
    fn validate_into(&self, errors: &mut Vec<ValidationError>) {
        for (index, raw) in self.defaults.iter().enumerate() {
            if let Err(e) = Locale::parse(raw) {
                errors.push(ValidationError::new(
                    format!("fallbacks.defaults[{index}]"),
                    e.to_string(),
                ));
            }
        }

        for (key, chain) in &self.map {
            if let Err(e) = Locale::parse(key) {
                errors.push(ValidationError::new(format!("fallbacks.map.{key}"), e.to_string()));
            }
            for (index, raw) in chain.iter().enumerate() {
                if let Err(e) = Locale::parse(raw) {
                    errors.push(ValidationError::new(
                        format!("fallbacks.map.{key}[{index}]"),
                        e.to_string(),
                    ));
                }
            }
        }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            available_locales: vec!["en".to_string()],
            enforce_available_locales: true,
            fallbacks: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = I18nSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"availableLocales": ["en", "fr"], "fallbacks": {"map": {"fr": ["en"]}}}"#;

        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale, eq("en"));
        assert_that!(settings.available_locales, elements_are![eq("en"), eq("fr")]);
        assert_that!(settings.enforce_available_locales, eq(true));
        let fallbacks = settings.fallbacks.unwrap();
        assert_that!(fallbacks.defaults, is_empty());
        assert_that!(fallbacks.map.get("fr"), some(elements_are![eq("en")]));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale, eq("en"));
        assert_that!(settings.available_locales, elements_are![eq("en")]);
        assert_that!(settings.fallbacks.is_none(), eq(true));
    }

    #[rstest]
    fn validate_invalid_default_locale() {
        let settings =
            I18nSettings { default_locale: "e n".to_string(), ..I18nSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("defaultLocale")),
                field!(ValidationError.message, contains_substring("Invalid locale"))
            ]])
        );
    }

    #[rstest]
    fn validate_available_locales_empty() {
        let settings = I18nSettings { available_locales: vec![], ..I18nSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("availableLocales")),
                field!(ValidationError.message, contains_substring("At least one locale"))
            ]])
        );
    }

    #[rstest]
    fn validate_available_locales_duplicate_and_malformed() {
        let settings = I18nSettings {
            available_locales: vec![
                "en".to_string(),
                "fr".to_string(),
                "en".to_string(),
                "x".to_string(),
            ],
            ..I18nSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![
                all![
                    field!(ValidationError.field_path, eq("availableLocales[2]")),
                    field!(ValidationError.message, contains_substring("Duplicate locale 'en'"))
                ],
                all![
                    field!(ValidationError.field_path, eq("availableLocales[3]")),
                    field!(ValidationError.message, contains_substring("Invalid locale"))
                ]
            ])
        );
    }

    #[rstest]
    fn validate_default_locale_not_available() {
        let settings = I18nSettings { default_locale: "de".to_string(), ..I18nSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("defaultLocale")),
                field!(ValidationError.message, contains_substring("not listed in availableLocales"))
            ]])
        );
    }

    #[rstest]
    fn validate_default_locale_not_available_without_enforcement() {
        let settings = I18nSettings {
            default_locale: "de".to_string(),
            enforce_available_locales: false,
            ..I18nSettings::default()
        };

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn validate_malformed_fallbacks() {
        let settings = I18nSettings {
            fallbacks: Some(FallbacksConfig {
                defaults: vec!["e".to_string()],
                map: BTreeMap::from([("fr".to_string(), vec!["en".to_string(), "??".to_string()])]),
            }),
            ..I18nSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![
                field!(ValidationError.field_path, eq("fallbacks.defaults[0]")),
                field!(ValidationError.field_path, eq("fallbacks.map.fr[1]"))
            ])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = I18nSettings {
            default_locale: String::new(),
            available_locales: vec![],
            ..I18nSettings::default()
        };

        let validation_result = settings.validate();
        let errors = validation_result.unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. defaultLocale"));
        assert_that!(error_message, contains_substring("2. availableLocales"));
        assert_that!(error_message, contains_substring("At least one locale"));
    }
}
