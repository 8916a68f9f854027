//! Reads and writes translation maps held in a backing field.

use super::BackingField;
use crate::error::StoreError;
use crate::types::{
    Locale,
    TranslationMap,
    is_blank,
};

/// Field suffix appended to an attribute name to get its backing field.
pub const DEFAULT_SUFFIX: &str = "_translations";

/// Backing field name for `attribute` (e.g. `title` -> `title_translations`).
#[must_use]
pub fn field_name(attribute: &str, suffix: &str) -> String {
    format!("{attribute}{suffix}")
}

/// Decodes the map stored in `field`; a missing field is the empty map.
///
/// # Errors
/// Backend failures, or a field that does not hold a JSON object of strings.
pub fn read_map<B>(model: &B, field: &str) -> Result<TranslationMap, StoreError>
where
    B: BackingField + ?Sized,
{
    TranslationMap::from_field_value(field, model.get(field)?)
}

/// # Errors
/// Same as [`read_map`].
pub fn read<B>(model: &B, field: &str, locale: &Locale) -> Result<Option<String>, StoreError>
where
    B: BackingField + ?Sized,
{
    Ok(read_map(model, field)?.get(locale.as_str()).map(str::to_string))
}

/// Stores `value` for `locale` and returns what was actually stored.
///
/// Unless `allow_blank` is set, blank values are stored as "no translation" and
/// remove the locale from the map. The model is told the field changed at most
/// once, and only when the stored value differs from the current one.
///
/// # Errors
/// Backend failures, or a malformed current value.
pub fn write<B>(
    model: &mut B,
    field: &str,
    value: Option<&str>,
    locale: &Locale,
    allow_blank: bool,
) -> Result<Option<String>, StoreError>
where
    B: BackingField + ?Sized,
{
    let stored = (if allow_blank { value } else { value.filter(|v| !is_blank(v)) }).map(str::to_string);

    let mut translations = read_map(model, field)?;
    if translations.get(locale.as_str()) != stored.as_deref() {
        tracing::debug!("Translation of {} changed for locale {}", field, locale);
        model.mark_dirty(field);
    }

    match &stored {
        Some(text) => {
            translations.insert(locale, text.clone());
        }
        None => {
            translations.remove(locale.as_str());
        }
    }
    model.set(field, translations.to_field_value())?;

    Ok(stored)
}

/// Replaces the whole map; returns whether it differed from the stored one.
///
/// # Errors
/// Same as [`write`].
pub fn replace<B>(
    model: &mut B,
    field: &str,
    mut translations: TranslationMap,
    allow_blank: bool,
) -> Result<bool, StoreError>
where
    B: BackingField + ?Sized,
{
    if !allow_blank {
        translations.retain_present();
    }

    let changed = read_map(model, field)? != translations;
    if changed {
        tracing::debug!("Translations of {} replaced", field);
        model.mark_dirty(field);
    }
    model.set(field, translations.to_field_value())?;

    Ok(changed)
}
