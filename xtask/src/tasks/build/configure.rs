use anyhow::Result;

use crate::cli::{Format, Shell, VariableArgs};

pub fn run(vars: &VariableArgs, format: Format) -> Result<()> {
    let (_, env) = crate::util::options::assemble(vars)?;
    match format {
        Format::Json => println!("{}", env.to_json()?),
        Format::Shell => print!("{}", crate::tasks::tooling::env::render(&env, Shell::Sh)),
    }
    Ok(())
}
