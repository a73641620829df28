use anyhow::Result;
use buildenv::BuildEnvironment;

use crate::cli::{Shell, VariableArgs};

pub fn run(shell: Shell, vars: &VariableArgs) -> Result<()> {
    let (_, env) = crate::util::options::assemble(vars)?;
    print!("{}", render(&env, shell));
    Ok(())
}

/// Pure `export` lines so users can `eval` them.
pub fn render(env: &BuildEnvironment, shell: Shell) -> String {
    let mut out = String::new();
    match shell {
        Shell::Bash | Shell::Sh => {
            let mut pairs: Vec<(String, String)> = env
                .shell_exports()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            pairs.extend(env.env.iter().map(|(k, v)| (k.clone(), v.clone())));
            for (key, value) in pairs {
                out.push_str(&format!("export {key}=\"{}\"\n", quote(&value)));
            }
        }
    }
    out
}

/// Escapes the characters that stay special inside double quotes.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildenv::{Assembler, BuildOptions, FixedProbe, HostInfo, MapEnv, PlatformFamily};

    #[test]
    fn test_quote() {
        assert_eq!(quote("-O2 -Wall"), "-O2 -Wall");
        assert_eq!(quote("a\"b$c"), "a\\\"b\\$c");
    }

    #[test]
    fn test_render_exports() {
        let vars = MapEnv::new();
        let env = Assembler::new(HostInfo::posix())
            .env(&vars)
            .probe(&FixedProbe::new())
            .assemble(&BuildOptions::defaults_for(PlatformFamily::Posix))
            .unwrap();
        let text = render(&env, Shell::Bash);
        assert!(text.contains("export LIBS=\"-lstdc++ -lcudart\"\n"));
        assert!(text.contains("export NVCCFLAGS=\"-arch=sm_10\"\n"));
        assert!(text.contains("export CPATH=\"/usr/local/cuda/include\"\n"));
        assert!(text.contains("export LIBRARY_PATH=\"/usr/local/cuda/lib64\"\n"));
        assert!(!text.contains("export NVCC="));
        assert!(text.lines().all(|l| l.starts_with("export ")));
    }
}
