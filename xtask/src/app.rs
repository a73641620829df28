use anyhow::Result;

pub fn run(cli: crate::cli::Cli) -> Result<()> {
    match cli.cmd {
        crate::cli::Cmd::Configure { vars, format } => {
            crate::tasks::build::configure::run(&vars, format)
        }
        crate::cli::Cmd::Vars { vars } => crate::tasks::build::vars::run(&vars),
        crate::cli::Cmd::Env { shell, vars } => crate::tasks::tooling::env::run(shell, &vars),
        crate::cli::Cmd::Exec { vars, command } => {
            crate::tasks::tooling::exec::run(&vars, &command)
        }
        crate::cli::Cmd::Tests { dir, vars } => crate::tasks::build::tests::run(dir, &vars),
        crate::cli::Cmd::Doctor { vars } => crate::tasks::tooling::doctor::run(&vars),
    }
}
