//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{
    FallbacksConfig,
    I18nSettings,
};
use crate::locale::StaticI18n;
use crate::types::Locale;

/// テスト用の Locale を作成する（不正な識別子の場合は panic）
pub(crate) fn locale(raw: &str) -> Locale {
    Locale::parse(raw).unwrap()
}

/// テスト用の Locale のリストを作成する
pub(crate) fn locales(raw: &[&str]) -> Vec<Locale> {
    raw.iter().map(|r| locale(r)).collect()
}

/// 指定ロケールを利用可能にした設定（先頭がデフォルトロケール）
fn settings(available: &[&str]) -> I18nSettings {
    I18nSettings {
        default_locale: available.first().map_or_else(|| "en".to_string(), |l| (*l).to_string()),
        available_locales: available.iter().map(|l| (*l).to_string()).collect(),
        ..I18nSettings::default()
    }
}

/// フォールバックなしの StaticI18n を作成する
///
/// # Arguments
/// * `available` - 利用可能なロケール（先頭がデフォルトロケール）
pub(crate) fn static_i18n(available: &[&str]) -> Arc<StaticI18n> {
    Arc::new(StaticI18n::from_settings(&settings(available)).unwrap())
}

/// フォールバック付きの StaticI18n を作成する
///
/// # Arguments
/// * `available` - 利用可能なロケール（先頭がデフォルトロケール）
/// * `fallbacks` - `(ロケール, フォールバック先)` のペア。同じロケールを複数回指定すると末尾に追加される
pub(crate) fn static_i18n_with_fallbacks(
    available: &[&str],
    fallbacks: &[(&str, &str)],
) -> Arc<StaticI18n> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (from, to) in fallbacks {
        map.entry((*from).to_string()).or_default().push((*to).to_string());
    }

    let settings = I18nSettings {
        fallbacks: Some(FallbacksConfig { defaults: Vec::new(), map }),
        ..settings(available)
    };
    Arc::new(StaticI18n::from_settings(&settings).unwrap())
}
