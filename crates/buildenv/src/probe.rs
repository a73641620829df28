//! External configuration tools (`OcelotConfig` and friends).

use std::collections::BTreeMap;
use std::process::Command;

use crate::error::ConfigError;

/// Runs a configuration tool and returns its standard output.
pub trait ToolProbe {
    fn output(&self, program: &str, args: &[&str]) -> Result<String, ConfigError>;
}

/// Spawns the real program.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandProbe;

impl ToolProbe for CommandProbe {
    fn output(&self, program: &str, args: &[&str]) -> Result<String, ConfigError> {
        log::debug!("probing {program} {}", args.join(" "));
        let out = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| ConfigError::ToolProbe {
                tool: program.to_string(),
                reason: e.to_string(),
            })?;
        if !out.status.success() {
            return Err(ConfigError::ToolProbe {
                tool: program.to_string(),
                reason: format!("exited with {}", out.status),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

/// Canned answers keyed by `"program args..."`. Anything else fails.
#[derive(Clone, Debug, Default)]
pub struct FixedProbe(BTreeMap<String, String>);

impl FixedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, command_line: &str, stdout: &str) -> Self {
        self.0.insert(command_line.to_string(), stdout.to_string());
        self
    }
}

impl ToolProbe for FixedProbe {
    fn output(&self, program: &str, args: &[&str]) -> Result<String, ConfigError> {
        let mut key = program.to_string();
        for arg in args {
            key.push(' ');
            key.push_str(arg);
        }
        self.0.get(&key).cloned().ok_or(ConfigError::ToolProbe {
            tool: program.to_string(),
            reason: "not found".to_string(),
        })
    }
}
