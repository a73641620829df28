use anyhow::{Context, Result};
use buildenv::{Assembler, BuildEnvironment, BuildOptions, HostInfo};
use std::path::PathBuf;

use crate::cli::VariableArgs;

/// Host identity and build options resolved for one invocation.
pub struct Resolved {
    pub root: PathBuf,
    pub host: HostInfo,
    pub opts: BuildOptions,
}

/// Defaults, then the variables file, then command-line assignments.
pub fn resolve(vars: &VariableArgs) -> Result<Resolved> {
    let root = crate::util::repo::repo_root()?;
    let host = HostInfo::current();
    let file = crate::util::repo::variables_file(&root, vars.config.as_deref());
    if let Some(file) = &file {
        log::info!("reading build variables from {}", file.display());
    }
    let opts = buildenv::resolve_options(host.family, file.as_deref(), &vars.assignments)
        .context("Resolving build variables")?;
    Ok(Resolved { root, host, opts })
}

/// Resolve options and assemble the environment against the process env.
pub fn assemble(vars: &VariableArgs) -> Result<(Resolved, BuildEnvironment)> {
    let resolved = resolve(vars)?;
    let env = Assembler::new(resolved.host.clone())
        .source_root(&resolved.root)
        .assemble(&resolved.opts)
        .context("Configuring build environment")?;
    Ok((resolved, env))
}
