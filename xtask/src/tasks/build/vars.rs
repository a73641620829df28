use anyhow::Result;

use crate::cli::VariableArgs;

pub fn run(vars: &VariableArgs) -> Result<()> {
    let resolved = crate::util::options::resolve(vars)?;
    print!(
        "{}",
        buildenv::variables::help_text(resolved.host.family, &resolved.opts)
    );
    Ok(())
}
