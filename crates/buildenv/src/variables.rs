//! TEAM_513: Build variable declarations, `KEY=VALUE` parsing and help text.
//!
//! The declaration table is the single source for what the command line
//! accepts, what the defaults are and what `xtask vars` prints.

use crate::error::ConfigError;
use crate::filter::TestFilter;
use crate::options::{Backend, BuildOptions, ComputeArch, HostBackend, Mode, MsvcVersion};
use crate::platform::PlatformFamily;

const TRUE_STRINGS: &[&str] = &["y", "yes", "true", "t", "1", "on", "all"];
const FALSE_STRINGS: &[&str] = &["n", "no", "false", "f", "0", "off", "none"];

/// What values a variable accepts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VariableKind {
    /// One of a fixed set, `|`-separated.
    Enum(String),
    Bool,
    /// Free text.
    Text,
}

/// A declared build variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variable {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: VariableKind,
    pub default: Option<String>,
}

impl Variable {
    fn enumerated(name: &'static str, help: &'static str, allowed: String, default: Option<&str>) -> Self {
        Self {
            name,
            help,
            kind: VariableKind::Enum(allowed),
            default: default.map(str::to_string),
        }
    }

    fn boolean(name: &'static str, help: &'static str, default: bool) -> Self {
        Self {
            name,
            help,
            kind: VariableKind::Bool,
            default: Some(bool_str(default).to_string()),
        }
    }

    /// Help string with the allowed values appended.
    pub fn full_help(&self) -> String {
        match &self.kind {
            VariableKind::Enum(allowed) => format!("{} ({allowed})", self.help),
            VariableKind::Bool => format!("{} (yes|no)", self.help),
            VariableKind::Text => self.help.to_string(),
        }
    }
}

fn bool_str(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

/// Variables recognized on `platform`, in help-text order.
pub fn declared(platform: PlatformFamily) -> Vec<Variable> {
    let defaults = BuildOptions::defaults_for(platform);
    let mut vars = Vec::new();
    if platform == PlatformFamily::Windows {
        vars.push(Variable::enumerated(
            MsvcVersion::VARIABLE,
            "MS Visual C++ version",
            MsvcVersion::allowed(),
            None,
        ));
    }
    vars.push(Variable::enumerated(
        Backend::VARIABLE,
        "The parallel device backend to target",
        Backend::allowed(),
        Some(defaults.backend.id()),
    ));
    vars.push(Variable::enumerated(
        HostBackend::VARIABLE,
        "The host backend to target",
        HostBackend::allowed(),
        Some(defaults.host_backend.id()),
    ));
    vars.push(Variable::enumerated(
        Mode::VARIABLE,
        "Release versus debug mode",
        Mode::allowed(),
        Some(defaults.mode.id()),
    ));
    vars.push(Variable::enumerated(
        ComputeArch::VARIABLE,
        "Compute capability code generation",
        ComputeArch::allowed(),
        Some(defaults.arch.id()),
    ));
    vars.push(Variable::boolean(
        "Wall",
        "Enable all compilation warnings",
        defaults.warn_all,
    ));
    vars.push(Variable::boolean(
        "Werror",
        "Treat warnings as errors",
        defaults.warn_errors,
    ));
    vars.push(Variable {
        name: "tests",
        help: "Filter test files using a regex",
        kind: VariableKind::Text,
        default: None,
    });
    vars
}

/// Splits `KEY=VALUE` at the first `=`.
pub fn parse_assignment(arg: &str) -> Result<(String, String), ConfigError> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ConfigError::MalformedAssignment(arg.to_string())),
    }
}

/// Boolean spelling accepted for `Wall`/`Werror`, case-insensitive.
pub fn parse_bool(variable: &str, value: &str) -> Result<bool, ConfigError> {
    let lower = value.to_ascii_lowercase();
    if TRUE_STRINGS.contains(&lower.as_str()) {
        Ok(true)
    } else if FALSE_STRINGS.contains(&lower.as_str()) {
        Ok(false)
    } else {
        Err(ConfigError::UnsupportedOption {
            variable: variable.to_string(),
            value: value.to_string(),
            allowed: "yes|no".to_string(),
        })
    }
}

/// Applies one assignment on top of `opts`.
pub fn apply(
    opts: &mut BuildOptions,
    platform: PlatformFamily,
    name: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match name {
        "backend" => opts.backend = Backend::parse(value)?,
        "host_backend" => opts.host_backend = HostBackend::parse(value)?,
        "mode" => opts.mode = Mode::parse(value)?,
        "arch" => opts.arch = ComputeArch::parse(value)?,
        "Wall" => opts.warn_all = parse_bool(name, value)?,
        "Werror" => opts.warn_errors = parse_bool(name, value)?,
        "tests" => {
            TestFilter::new(Some(value))?;
            opts.tests = Some(value.to_string());
        }
        "MSVC_VERSION" if platform == PlatformFamily::Windows => {
            opts.msvc_version = Some(MsvcVersion::parse(value)?);
        }
        _ => return Err(ConfigError::UnknownVariable(name.to_string())),
    }
    log::debug!("build variable {name}={value}");
    Ok(())
}

/// Defaults for `platform`, then each assignment in order (later wins).
pub fn build_options<I, K, V>(platform: PlatformFamily, assignments: I) -> Result<BuildOptions, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut opts = BuildOptions::defaults_for(platform);
    for (name, value) in assignments {
        apply(&mut opts, platform, name.as_ref(), value.as_ref())?;
    }
    Ok(opts)
}

/// Value in effect for a declared variable, as shown in help text.
fn actual_value(opts: &BuildOptions, name: &str) -> Option<String> {
    match name {
        "backend" => Some(opts.backend.to_string()),
        "host_backend" => Some(opts.host_backend.to_string()),
        "mode" => Some(opts.mode.to_string()),
        "arch" => Some(opts.arch.to_string()),
        "Wall" => Some(bool_str(opts.warn_all).to_string()),
        "Werror" => Some(bool_str(opts.warn_errors).to_string()),
        "tests" => opts.tests.clone(),
        "MSVC_VERSION" => opts.msvc_version.map(|v| v.to_string()),
        _ => None,
    }
}

/// Help text describing every recognized variable and its current value.
pub fn help_text(platform: PlatformFamily, opts: &BuildOptions) -> String {
    let mut out = String::new();
    for var in declared(platform) {
        let default = var.default.as_deref().unwrap_or("None");
        let actual = actual_value(opts, var.name).unwrap_or_else(|| "None".to_string());
        out.push_str(&format!(
            "\n{}: {}\n    default: {default}\n    actual: {actual}\n",
            var.name,
            var.full_help()
        ));
    }
    out
}
