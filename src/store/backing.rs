//! Persistence collaborator contract

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::StoreError;

/// The persisted structured fields of a record and their change tracking.
///
/// Implemented by the model type that owns the translation fields.
pub trait BackingField {
    /// Current in-memory value of `field`, `None` if the field was never set.
    fn get(&self, field: &str) -> Result<Option<Value>, StoreError>;

    /// Assigns `value` to `field`.
    fn set(&mut self, field: &str, value: Value) -> Result<(), StoreError>;

    /// Called before `field` is assigned a value that differs from the current one.
    fn mark_dirty(&mut self, field: &str);
}

/// In-memory model keeping fields as JSON values and logging change notifications.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryModel {
    /// Field values by name
    fields: BTreeMap<String, Value>,
    /// Every `mark_dirty` call, in order.
    notifications: Vec<String>,
}

impl MemoryModel {
    /// A model without fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a field without recording a change, as when loading a persisted record.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    /// Current value of `field`.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Fields passed to `mark_dirty`, in call order.
    #[must_use]
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Number of change notifications received for `field`.
    #[must_use]
    pub fn notification_count(&self, field: &str) -> usize {
        self.notifications.iter().filter(|f| *f == field).count()
    }

    /// Whether any field was marked dirty.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.notifications.is_empty()
    }

    /// Forgets recorded notifications, as after a save.
    pub fn clear_changes(&mut self) {
        self.notifications.clear();
    }
}

impl BackingField for MemoryModel {
    fn get(&self, field: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.fields.get(field).cloned())
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), StoreError> {
        self.fields.insert(field.to_string(), value);
        Ok(())
    }

    fn mark_dirty(&mut self, field: &str) {
        self.notifications.push(field.to_string());
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn with_field_does_not_record_change() {
        let model = MemoryModel::new().with_field("title_translations", json!({"en": "Hi"}));

        assert_that!(model.field("title_translations"), some(eq(&json!({"en": "Hi"}))));
        assert_that!(model.changed(), eq(false));
    }

    #[rstest]
    fn mark_dirty_is_logged_per_field() {
        let mut model = MemoryModel::new();

        model.mark_dirty("title_translations");
        model.mark_dirty("body_translations");
        model.mark_dirty("title_translations");

        assert_that!(model.notification_count("title_translations"), eq(2));
        assert_that!(model.notification_count("body_translations"), eq(1));

        model.clear_changes();
        assert_that!(model.changed(), eq(false));
    }
}
