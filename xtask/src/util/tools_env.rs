use buildenv::BuildEnvironment;
use std::process::Command;

/// Applies the assembled flags and propagated library path to a command, the
/// same wiring `xtask env` prints for shells.
pub fn apply_to_command(cmd: &mut Command, env: &BuildEnvironment) {
    for (key, value) in env.shell_exports() {
        cmd.env(key, value);
    }
    for (key, value) in &env.env {
        cmd.env(key, value);
    }
}
