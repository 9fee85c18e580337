//! `${VAR}` references in `dokumd.toml` string fields.
//!
//! Lets one config file serve several machines, e.g.
//! `source_dir = "${WIKI_ROOT:-/var/www/dokuwiki}/data"`. A reference without
//! a default must name a set variable. A bare `$` is literal, since DokuWiki
//! paths and log file names may contain one.

use std::env;

use crate::ConfigError;

/// Variable referenced without a default and missing from the environment.
struct UnsetVar(String);

/// Substitute `${VAR}` and `${VAR:-default}` in the value of `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let expanded = shellexpand::env_with_context(value, lookup).map_err(|e| {
        ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} is not set", e.cause.0),
        }
    })?;
    Ok(expanded.into_owned())
}

/// [`expand_env`] for fields that may be absent from the file.
pub(crate) fn expand_opt(value: Option<&str>, field: &str) -> Result<Option<String>, ConfigError> {
    value.map(|v| expand_env(v, field)).transpose()
}

fn lookup(name: &str) -> Result<Option<String>, UnsetVar> {
    env::var(name).map(Some).map_err(|_| UnsetVar(name.to_owned()))
}
