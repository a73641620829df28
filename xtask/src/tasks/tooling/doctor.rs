use anyhow::{bail, Result};
use buildenv::{flags::OCELOT_CONFIG, Backend, ProcessEnv, Sdk};

use crate::cli::VariableArgs;

pub fn run(vars: &VariableArgs) -> Result<()> {
    let resolved = crate::util::options::resolve(vars)?;
    let host = &resolved.host;
    let opts = &resolved.opts;

    let mut ok = true;

    let mut sdks = vec![Sdk::Cuda];
    if opts.uses_tbb() {
        sdks.push(Sdk::Tbb);
    }
    for sdk in sdks {
        let paths = match sdk.resolve(host, &ProcessEnv) {
            Ok(paths) => paths,
            Err(e) => {
                eprintln!("[FAIL] {}: {e}", sdk.name());
                ok = false;
                continue;
            }
        };
        for (kind, dir) in paths.entries() {
            if dir.is_dir() {
                eprintln!("[OK] {} {kind}: {}", sdk.name(), dir.display());
            } else {
                eprintln!("[FAIL] missing {} {kind} directory: {}", sdk.name(), dir.display());
                ok = false;
            }
        }
        if sdk == Sdk::Cuda {
            let bundled = paths.bin.join("nvcc");
            if bundled.is_file() || bundled.with_extension("exe").is_file() {
                eprintln!("[OK] {}", bundled.display());
            } else if let Ok(found) = which::which("nvcc") {
                eprintln!("[OK] nvcc (from PATH: {})", found.display());
            } else {
                eprintln!("[FAIL] missing `nvcc` in {} and PATH", paths.bin.display());
                ok = false;
            }
        }
    }

    if opts.backend == Backend::Ocelot {
        if which::which(OCELOT_CONFIG).is_err() {
            eprintln!("[FAIL] missing `{OCELOT_CONFIG}` in PATH");
            ok = false;
        } else {
            eprintln!("[OK] {OCELOT_CONFIG}");
        }
    }

    if !ok {
        bail!("doctor checks failed");
    }
    Ok(())
}
