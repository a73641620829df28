//! Variables file support.
//!
//! A TOML table of build variables, e.g.
//!
//! ```toml
//! backend = "omp"
//! mode = "debug"
//! Wall = true
//! ```
//!
//! Values are turned back into strings and go through the same validation
//! as command-line assignments.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Assignments from a variables file, in key order.
pub fn load_variables_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::VariablesFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let vars = parse_variables(&text).map_err(|reason| ConfigError::VariablesFile {
        path: path.to_path_buf(),
        reason,
    })?;
    log::debug!("{} variables from {}", vars.len(), path.display());
    Ok(vars)
}

/// Parses the TOML body of a variables file.
pub fn parse_variables(text: &str) -> Result<Vec<(String, String)>, String> {
    let table: toml::Table = text.parse().map_err(|e: toml::de::Error| e.to_string())?;
    table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Boolean(b) => (if b { "yes" } else { "no" }).to_string(),
                toml::Value::Integer(i) => i.to_string(),
                // MSVC_VERSION = 9.0
                toml::Value::Float(f) => format!("{f:.1}"),
                other => return Err(format!("{key}: unsupported value type {}", other.type_str())),
            };
            Ok((key, value))
        })
        .collect()
}
