//! Filter configuration (`config.json`).
//!
//! Declares which documents in the docs directory are processed. A non-empty
//! `whitelist` takes precedence over `ignoreFiles` entirely.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RunError;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Filename allow/deny lists for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Filenames to skip when no whitelist is configured.
    pub ignore_files: Vec<String>,
    /// Filenames to process. When non-empty, nothing else is processed.
    pub whitelist: Vec<String>,
}

impl Configuration {
    pub fn has_whitelist(&self) -> bool {
        !self.whitelist.is_empty()
    }

    /// Exact, case-sensitive match against the whitelist.
    pub fn is_whitelisted(&self, filename: &str) -> bool {
        self.whitelist.iter().any(|f| f == filename)
    }

    /// Exact, case-sensitive match against the ignore list.
    pub fn is_ignored(&self, filename: &str) -> bool {
        self.ignore_files.iter().any(|f| f == filename)
    }

    /// Build a configuration from a decoded JSON object.
    ///
    /// Unknown keys are ignored. For a repeated key the last value wins.
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            ignore_files: lenient_list(object.get("ignoreFiles")),
            whitelist: lenient_list(object.get("whitelist")),
        }
    }
}

/// A list field that is missing or not an array of strings is treated as empty.
fn lenient_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

/// Load the configuration file at `path`.
///
/// Only an unreadable file is an error. The first JSON value in the file is
/// decoded and anything after it is ignored. If that value is malformed or
/// not an object, the configuration is empty.
pub fn load(path: &Path) -> Result<Configuration, RunError> {
    let content = fs::read(path).map_err(|source| RunError::ConfigOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let first = serde_json::Deserializer::from_slice(&content)
        .into_iter::<Value>()
        .next();

    match first {
        Some(Ok(Value::Object(object))) => Ok(Configuration::from_object(&object)),
        Some(Ok(other)) => {
            tracing::warn!(
                path = %path.display(),
                kind = json_kind(&other),
                "configuration is not a JSON object, using empty lists"
            );
            Ok(Configuration::default())
        }
        Some(Err(e)) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "configuration is not valid JSON, using empty lists"
            );
            Ok(Configuration::default())
        }
        None => {
            tracing::warn!(path = %path.display(), "configuration is empty, using empty lists");
            Ok(Configuration::default())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
