//! Expansion of path-valued settings.
//!
//! `attachments_dir` and `output.dir` may start with `~` for the home
//! directory and may reference `${VAR}` or `${VAR:-default}`.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `value` against the process environment.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_path_with(value, field, |name| std::env::var(name).ok())
}

/// Expand `value`, resolving variables (and `HOME` for `~`) through `lookup`.
///
/// A referenced variable without a default must resolve. Settings with
/// neither a leading `~` nor a `${` are returned as written, so a literal
/// `$` in a directory name survives.
fn expand_path_with<L>(value: &str, field: &str, lookup: L) -> Result<String, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    if !value.starts_with('~') && !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::full_with_context(
        value,
        || lookup("HOME"),
        |name| lookup(name).map(Some).ok_or(()),
    )
    .map(Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.var_name),
    })
}
