use std::collections::HashMap;

use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// A source of environment-style `NAME=value` settings.
///
/// Production code reads the process environment through [`ProcessEnv`];
/// tests hand in a plain `HashMap` so they never touch global state.
pub trait EnvSource {
    /// Returns the value of `name`, or `None` if it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Reads `name` from `source`, failing with [`MissingEnvVarError`] when unset.
pub fn require_var(source: &impl EnvSource, name: &str) -> Result<String, MissingEnvVarError> {
    source
        .var(name)
        .ok_or_else(|| MissingEnvVarError(name.to_string()))
}

/// Reads `name` from `source`, falling back to `default` when unset.
pub fn var_or(source: &impl EnvSource, name: &str, default: &str) -> String {
    source.var(name).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn require_var_reports_the_missing_name() {
        let vars = env(&[("PRESENT", "1")]);

        assert_eq!(require_var(&vars, "PRESENT").unwrap(), "1");
        assert_eq!(
            require_var(&vars, "ABSENT"),
            Err(MissingEnvVarError("ABSENT".into()))
        );
        assert_eq!(
            MissingEnvVarError("ABSENT".into()).to_string(),
            "Missing environment variable: ABSENT"
        );
    }

    #[test]
    fn var_or_prefers_the_set_value() {
        let vars = env(&[("SEARCH_URL", "http://localhost")]);

        assert_eq!(var_or(&vars, "SEARCH_URL", "x"), "http://localhost");
        assert_eq!(var_or(&vars, "OTHER", "x"), "x");
    }
}
