use anyhow::{bail, Context, Result};
use std::process::Command;

use crate::cli::VariableArgs;

pub fn run(vars: &VariableArgs, command: &[String]) -> Result<()> {
    let (resolved, env) = crate::util::options::assemble(vars)?;
    let Some((program, args)) = command.split_first() else {
        bail!("no command given");
    };

    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(&resolved.root);
    crate::util::tools_env::apply_to_command(&mut cmd, &env);

    log::info!("running {} in {}", command.join(" "), resolved.root.display());
    let status = cmd
        .status()
        .with_context(|| format!("Failed to run {program}"))?;
    if !status.success() {
        bail!("{program} failed ({status})");
    }
    Ok(())
}
