//! TEAM_512: Configuration error types.
//!
//! Every failure is fatal: a half-configured build environment cannot safely
//! build anything, so nothing here is recovered locally.

use core::fmt;
use std::path::PathBuf;

use crate::platform::PlatformFamily;

/// Errors raised while assembling a build environment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// The platform has no answer for something we need (SDK default path,
    /// library name, extra search path).
    UnsupportedPlatform {
        what: &'static str,
        platform: PlatformFamily,
    },
    /// A compiler or linker program is not in the switch table.
    UnsupportedToolchain { role: &'static str, program: String },
    /// A build variable was given a value outside its legal set.
    UnsupportedOption {
        variable: String,
        value: String,
        allowed: String,
    },
    /// A build variable that is not declared on this platform.
    UnknownVariable(String),
    /// An assignment that is not of the form `KEY=VALUE`.
    MalformedAssignment(String),
    /// The `tests` filter does not compile as a regular expression.
    InvalidTestFilter { pattern: String, reason: String },
    /// An SDK has no default on this platform and some of its overrides
    /// are unset. `variables` lists the unset ones.
    MissingPath {
        sdk: &'static str,
        variables: Vec<&'static str>,
    },
    /// An external configuration tool could not be run.
    ToolProbe { tool: String, reason: String },
    /// The variables file could not be read or parsed.
    VariablesFile { path: PathBuf, reason: String },
}

impl ConfigError {
    /// Short category name used in log lines.
    pub fn category(&self) -> &'static str {
        match self {
            ConfigError::UnsupportedPlatform { .. } => "unsupported-platform",
            ConfigError::UnsupportedToolchain { .. } => "unsupported-toolchain",
            ConfigError::UnsupportedOption { .. }
            | ConfigError::UnknownVariable(_)
            | ConfigError::MalformedAssignment(_)
            | ConfigError::InvalidTestFilter { .. } => "unsupported-option",
            ConfigError::MissingPath { .. } => "missing-path",
            ConfigError::ToolProbe { .. } => "tool-probe",
            ConfigError::VariablesFile { .. } => "variables-file",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnsupportedPlatform { what, platform } => {
                write!(f, "unknown OS ({platform}): {what}")
            }
            ConfigError::UnsupportedToolchain { role, program } => {
                write!(f, "unsupported {role} '{program}': no switch table entry")
            }
            ConfigError::UnsupportedOption {
                variable,
                value,
                allowed,
            } => write!(
                f,
                "invalid value for option {variable}: {value} (allowed: {allowed})"
            ),
            ConfigError::UnknownVariable(name) => write!(f, "unknown build variable '{name}'"),
            ConfigError::MalformedAssignment(arg) => {
                write!(f, "expected KEY=VALUE, got '{arg}'")
            }
            ConfigError::InvalidTestFilter { pattern, reason } => {
                write!(f, "invalid tests filter '{pattern}': {reason}")
            }
            ConfigError::MissingPath { sdk, variables } => {
                write!(f, "where is {sdk} installed? set {}", variables.join(", "))
            }
            ConfigError::ToolProbe { tool, reason } => write!(f, "failed to run {tool}: {reason}"),
            ConfigError::VariablesFile { path, reason } => {
                write!(f, "reading variables file {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
