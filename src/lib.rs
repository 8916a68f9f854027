//! json-translate
//!
//! レコードの翻訳可能な属性を、ロケールごとのカラムではなく属性ごとに 1 つの JSON
//! フィールド（`{"en": "Hello", "fr": "Bonjour"}`）に保存するライブラリ
//!
//! - [`store`]: 翻訳マップの読み書き（空白値ポリシー、変更通知）
//! - [`resolve`]: フォールバックチェーンと補間を使ったロケール解決
//! - [`accessors`]: ロケールごとのアクセサテーブルと同期
//! - [`fallback`]: レコード単位のフォールバック切り替え
//! - [`record`]: 上記をまとめた [`TranslatedRecord`]

pub mod accessors;
pub mod config;
pub mod error;
pub mod fallback;
pub mod interpolate;
pub mod locale;
pub mod record;
pub mod resolve;
pub mod store;
pub mod types;

mod test_utils;

pub use error::{
    StoreError,
    TranslateError,
};
pub use fallback::{
    FallbackState,
    FallbackToggle,
};
pub use locale::{
    I18nContext,
    StaticI18n,
};
pub use record::{
    TranslatedRecord,
    Translates,
};
pub use resolve::ReadOptions;
pub use store::{
    BackingField,
    MemoryModel,
};
pub use types::{
    Locale,
    TranslationMap,
};
