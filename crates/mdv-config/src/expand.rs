//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// Bare `$VAR` is left alone so tokens and paths containing a dollar sign
/// survive unchanged. `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let escaped = escape_bare_dollars(value);
    shellexpand::env_with_context(&escaped, |var| -> Result<Option<String>, MissingVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| MissingVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.0),
    })
}

/// Double every `$` outside a `${...}` reference so only braced references
/// are looked up.
fn escape_bare_dollars(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 4);
    let mut chars = value.chars().peekable();
    let mut in_reference = false;
    while let Some(c) = chars.next() {
        escaped.push(c);
        match c {
            '$' if !in_reference => {
                if chars.peek() == Some(&'{') {
                    in_reference = true;
                } else {
                    escaped.push('$');
                }
            }
            '}' => in_reference = false,
            _ => {}
        }
    }
    escaped
}

/// Name of an environment variable that is not set.
struct MissingVar(String);
