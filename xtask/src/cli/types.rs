use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Thrust build environment tasks (flags, build variables, SDK checks)")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

/// Build variables shared by every subcommand.
#[derive(Args, Clone, Debug, Default)]
pub struct VariableArgs {
    /// Build variables, e.g. `backend=omp mode=debug Wall=no`.
    #[arg(value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,

    #[arg(
        long = "config",
        value_name = "PATH",
        help = "TOML variables file. Defaults to <repo>/buildenv.toml when present; command-line assignments win."
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Print the assembled build environment.
    Configure {
        #[command(flatten)]
        vars: VariableArgs,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Print help for the recognized build variables, with their values in effect.
    Vars {
        #[command(flatten)]
        vars: VariableArgs,
    },

    /// Print shell exports for the assembled flags.
    ///
    /// Usage:
    ///   eval "$(cargo xtask env backend=omp)"
    Env {
        /// Shell dialect of the exports. A flag, so assignments stay positional.
        #[arg(long, value_enum, default_value_t = Shell::Bash)]
        shell: Shell,

        #[command(flatten)]
        vars: VariableArgs,
    },

    /// Run a command (usually the build tool) inside the assembled environment.
    ///
    /// Usage:
    ///   cargo xtask exec mode=debug -- scons -j8
    Exec {
        #[command(flatten)]
        vars: VariableArgs,

        #[arg(last = true, required = true, value_name = "COMMAND")]
        command: Vec<String>,
    },

    /// List test sources selected by the `tests` filter.
    Tests {
        #[arg(long, value_name = "DIR", help = "Test source directory. Defaults to <repo>/testing.")]
        dir: Option<PathBuf>,

        #[command(flatten)]
        vars: VariableArgs,
    },

    /// Check that the resolved SDK locations and tools exist on this machine.
    Doctor {
        #[command(flatten)]
        vars: VariableArgs,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    Json,
    Shell,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Shell {
    Bash,
    Sh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_shell_flag_and_assignments() {
        let cli = Cli::try_parse_from(["xtask", "env", "--shell", "sh", "backend=omp"]).unwrap();
        let Cmd::Env { shell, vars } = cli.cmd else {
            unreachable!("parsed as env")
        };
        assert!(matches!(shell, Shell::Sh));
        assert_eq!(vars.assignments, ["backend=omp"]);

        let cli = Cli::try_parse_from(["xtask", "env", "backend=omp", "mode=debug"]).unwrap();
        let Cmd::Env { shell, vars } = cli.cmd else {
            unreachable!("parsed as env")
        };
        assert!(matches!(shell, Shell::Bash));
        assert_eq!(vars.assignments, ["backend=omp", "mode=debug"]);
    }
}
