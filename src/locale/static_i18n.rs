//! 設定ファイルに基づくロケール管理

use std::path::Path;
use std::sync::{
    PoisonError,
    RwLock,
};

use super::{
    FallbackProvider,
    Fallbacks,
    LocaleProvider,
};
use crate::config::{
    self,
    ConfigError,
    I18nSettings,
    ValidationError,
};
use crate::error::TranslateError;
use crate::types::Locale;

/// 設定から構築されるロケールプロバイダー
///
/// アクティブロケールは `RwLock` で保持し、`Arc` で複数のレコードから共有できる。
#[derive(Debug)]
pub struct StaticI18n {
    /// デフォルトロケール
    default_locale: Locale,
    /// 利用可能なロケール（設定順）
    available_locales: Vec<Locale>,
    /// `set_locale` で利用可能ロケール以外を拒否するか
    enforce_available_locales: bool,
    /// フォールバック設定（`None` の場合は無効）
    fallbacks: Option<Fallbacks>,
    /// 現在のロケール（未設定の場合はデフォルトロケール）
    current: RwLock<Option<Locale>>,
}

impl StaticI18n {
    /// 設定から作成する
    ///
    /// # Errors
    /// バリデーションエラー
    pub fn from_settings(settings: &I18nSettings) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        let default_locale = parse_setting("defaultLocale", &settings.default_locale)?;
        let available_locales = settings
            .available_locales
            .iter()
            .enumerate()
            .map(|(index, raw)| parse_setting(&format!("availableLocales[{index}]"), raw))
            .collect::<Result<Vec<_>, _>>()?;
        let fallbacks = settings
            .fallbacks
            .as_ref()
            .map(Fallbacks::from_config)
            .transpose()
            .map_err(|e| ConfigError::ValidationErrors(vec![ValidationError::new("fallbacks", e.to_string())]))?;

        tracing::debug!(
            "I18n configured: default={}, available={:?}, fallbacks={}",
            default_locale,
            available_locales,
            fallbacks.is_some()
        );

        Ok(Self {
            default_locale,
            available_locales,
            enforce_available_locales: settings.enforce_available_locales,
            fallbacks,
            current: RwLock::new(None),
        })
    }

    /// ディレクトリの設定ファイルから作成する（ファイルがない場合はデフォルト設定）
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let settings = config::load_from_dir(dir)?.unwrap_or_default();
        Self::from_settings(&settings)
    }

    /// デフォルトロケール
    #[must_use]
    pub const fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// フォールバック設定（無効な場合は `None`）
    #[must_use]
    pub const fn fallbacks(&self) -> Option<&Fallbacks> {
        self.fallbacks.as_ref()
    }

    /// アクティブロケールを変更する
    ///
    /// # Errors
    /// - 不正なロケール識別子
    /// - 利用可能ロケール以外（`enforce_available_locales` が有効な場合）
    pub fn set_locale(&self, raw: &str) -> Result<(), TranslateError> {
        let locale = self.checked_locale(raw)?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(locale);
        Ok(())
    }

    /// ブロックの間だけアクティブロケールを変更する
    ///
    /// ブロックが panic した場合も元のロケールに戻す。
    ///
    /// # Errors
    /// `set_locale` と同じ
    pub fn with_locale<R>(&self, raw: &str, body: impl FnOnce() -> R) -> Result<R, TranslateError> {
        let locale = self.checked_locale(raw)?;
        let previous = self.current.write().unwrap_or_else(PoisonError::into_inner).replace(locale);
        let _restore = RestoreLocale { i18n: self, previous };
        Ok(body())
    }

    /// ロケールをパースし、必要なら利用可能ロケールに含まれるか確認する
    fn checked_locale(&self, raw: &str) -> Result<Locale, TranslateError> {
        let locale = Locale::parse(raw)?;
        if self.enforce_available_locales && !self.available_locales.contains(&locale) {
            return Err(TranslateError::UnavailableLocale(locale.to_string()));
        }
        Ok(locale)
    }
}

/// `with_locale` のスコープ終了時にロケールを戻すガード
struct RestoreLocale<'a> {
    /// 対象のプロバイダー
    i18n: &'a StaticI18n,
    /// 変更前のロケール
    previous: Option<Locale>,
}

impl Drop for RestoreLocale<'_> {
    fn drop(&mut self) {
        *self.i18n.current.write().unwrap_or_else(PoisonError::into_inner) = self.previous.take();
    }
}

/// 設定値のロケールをパースする（エラーは設定項目のパス付き）
fn parse_setting(field_path: &str, raw: &str) -> Result<Locale, ConfigError> {
    Locale::parse(raw).map_err(|e| {
        ConfigError::ValidationErrors(vec![ValidationError::new(field_path, e.to_string())])
    })
}

impl LocaleProvider for StaticI18n {
    fn active_locale(&self) -> Locale {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| self.default_locale.clone())
    }

    fn available_locales(&self) -> Vec<Locale> {
        self.available_locales.clone()
    }
}

impl FallbackProvider for StaticI18n {
    fn fallback_chain(&self, locale: &Locale) -> Vec<Locale> {
        self.fallbacks.as_ref().map_or_else(|| vec![locale.clone()], |f| f.compute(locale))
    }
}
