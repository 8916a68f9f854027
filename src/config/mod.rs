//! Locale configuration
/// Config file loader
mod loader;
/// Configuration types and settings
mod types;

pub use loader::{
    CONFIG_FILE_NAME,
    load_from_dir,
    load_from_path,
};
pub use types::{
    ConfigError,
    FallbacksConfig,
    I18nSettings,
    ValidationError,
};
