//! Named placeholder interpolation (`%{name}`)

use thiserror::Error;

/// Option names the I18n layer reserves; templates may not use them as placeholders.
pub const RESERVED_KEYS: &[&str] = &[
    "cascade",
    "deep_interpolation",
    "default",
    "fallback",
    "format",
    "object",
    "raise",
    "resolve",
    "scope",
    "separator",
    "throw",
];

/// Defines errors that may occur while interpolating a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpolationError {
    /// The template references a placeholder with no matching parameter
    #[error("Missing interpolation argument '{key}' in \"{template}\"")]
    MissingArgument {
        /// Placeholder name
        key: String,
        /// Template being interpolated
        template: String,
    },
    /// The template uses a reserved option name as a placeholder
    #[error("Reserved key '{key}' used in \"{template}\"")]
    ReservedKey {
        /// Placeholder name
        key: String,
        /// Template being interpolated
        template: String,
    },
}

impl InterpolationError {
    /// True for `MissingArgument`, the error resolution recovers from.
    #[must_use]
    pub const fn is_missing_argument(&self) -> bool {
        matches!(self, Self::MissingArgument { .. })
    }
}

/// Interpolation service consulted by the resolution engine.
pub trait Interpolator: Send + Sync {
    /// Replaces the placeholders in `template` with `params`.
    ///
    /// # Errors
    /// `MissingArgument` must be used for placeholders absent from `params`, since
    /// callers recover from it.
    fn interpolate(
        &self,
        template: &str,
        params: &[(&str, &str)],
    ) -> Result<String, InterpolationError>;
}

/// `%{name}` and `%<name>s` substitution with `%%` as an escaped percent sign.
///
/// Format-style placeholders are only substituted for the `s` conversion;
/// `%<count>d`, `%<price>.2f` and any other `%` not starting a complete
/// placeholder are copied as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInterpolator;

impl Interpolator for DefaultInterpolator {
    fn interpolate(
        &self,
        template: &str,
        params: &[(&str, &str)],
    ) -> Result<String, InterpolationError> {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(index) = rest.find('%') {
            let (head, tail) = rest.split_at(index);
            output.push_str(head);

            if let Some(after) = tail.strip_prefix("%%") {
                output.push('%');
                rest = after;
                continue;
            }

            if let Some((key, after)) = placeholder(tail) {
                if RESERVED_KEYS.contains(&key) {
                    return Err(InterpolationError::ReservedKey {
                        key: key.to_string(),
                        template: template.to_string(),
                    });
                }
                let value = params.iter().find(|(name, _)| *name == key).map(|(_, v)| *v).ok_or_else(
                    || InterpolationError::MissingArgument {
                        key: key.to_string(),
                        template: template.to_string(),
                    },
                )?;
                output.push_str(value);
                rest = after;
                continue;
            }

            output.push('%');
            rest = tail.split_at(1).1;
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Splits `%{name}rest` or `%<name>srest` into `("name", "rest")`.
fn placeholder(text: &str) -> Option<(&str, &str)> {
    if let Some(body) = text.strip_prefix("%{") {
        return delimited(body, '}');
    }
    let (key, after) = delimited(text.strip_prefix("%<")?, '>')?;
    Some((key, after.strip_prefix('s')?))
}

/// Splits `name<close>rest` into `("name", "rest")` when `name` is a valid key.
fn delimited(body: &str, close: char) -> Option<(&str, &str)> {
    let end = body.find(close)?;
    let (key, after) = body.split_at(end);
    let valid = !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_');
    valid.then_some((key, after.split_at(1).1))
}
