//! Per-record fallback toggle
//!
//! # Invariants
//!
//! 1. **Unset means allowed**: a record that never toggled fallback resolves
//!    through the fallback chain.
//!
//! 2. **Scopes nest**: a scoped override restores the exact prior state when
//!    its body returns, whatever it returns, and when it panics.

use std::panic::{
    self,
    AssertUnwindSafe,
};

/// Fallback flag of one record: unset, enabled or disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallbackState(Option<bool>);

impl FallbackState {
    /// The explicit flag, `None` while unset.
    #[must_use]
    pub const fn get(self) -> Option<bool> {
        self.0
    }

    /// Sets the flag explicitly.
    pub const fn set(&mut self, enabled: bool) {
        self.0 = Some(enabled);
    }

    /// False only when fallback was explicitly disabled.
    #[must_use]
    pub const fn allows_fallback(self) -> bool {
        !matches!(self.0, Some(false))
    }
}

/// Enables and disables fallback on a record, persistently or for a scope.
pub trait FallbackToggle {
    /// Current fallback state.
    fn fallback_state(&self) -> FallbackState;

    /// Mutable access used by the toggles.
    fn fallback_state_mut(&mut self) -> &mut FallbackState;

    /// Disables fallback until it is enabled again.
    fn disable_fallback(&mut self) {
        self.fallback_state_mut().set(false);
    }

    /// Enables fallback until it is disabled again.
    fn enable_fallback(&mut self) {
        self.fallback_state_mut().set(true);
    }

    /// Runs `body` with fallback disabled, then restores the previous state.
    fn with_fallback_disabled<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        toggle_scoped(self, false, body)
    }

    /// Runs `body` with fallback enabled, then restores the previous state.
    fn with_fallback_enabled<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        toggle_scoped(self, true, body)
    }
}

/// Sets `enabled` for the duration of `body`, restoring the previous state on every exit path.
fn toggle_scoped<T, R>(target: &mut T, enabled: bool, body: impl FnOnce(&mut T) -> R) -> R
where
    T: FallbackToggle,
{
    let previous = target.fallback_state();
    target.fallback_state_mut().set(enabled);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(target)));

    *target.fallback_state_mut() = previous;
    match outcome {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}
