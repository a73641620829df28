//! TEAM_512: Per-tool flag lists.
//!
//! Each list is built by independent checks appended in a fixed order. The
//! order only matters for humans reading the command lines.

use crate::error::ConfigError;
use crate::options::{Backend, BuildOptions, Mode};
use crate::platform::HostInfo;
use crate::probe::ToolProbe;
use crate::toolchain::{compiler_switches, linker_switches, Toolchain};

/// Program that reports Ocelot's link flags.
pub const OCELOT_CONFIG: &str = "OcelotConfig";

fn push_all(out: &mut Vec<String>, switches: &[&str]) {
    out.extend(switches.iter().map(|s| (*s).to_string()));
}

/// Flags for the C compiler.
pub fn c_flags(
    opts: &BuildOptions,
    host: &HostInfo,
    toolchain: &Toolchain,
) -> Result<Vec<String>, ConfigError> {
    let sw = compiler_switches(&toolchain.cc)?;
    let mut out = Vec::new();

    match opts.mode {
        Mode::Release => push_all(&mut out, sw.optimization),
        Mode::Debug => {
            push_all(&mut out, sw.debug);
            out.push("-DTHRUST_DEBUG".to_string());
        }
    }
    if host.darwin {
        out.push("-m32".to_string());
    }
    if opts.uses_omp() {
        push_all(&mut out, sw.omp);
    }
    if opts.warn_all {
        push_all(&mut out, sw.warn_all);
    }
    if opts.warn_errors {
        push_all(&mut out, sw.warn_errors);
    }
    if toolchain.cc_is_msvc() {
        // min/max macros from windows.h
        out.push("/DNOMINMAX".to_string());
        // "decorated name length exceeded"
        out.push("/wd4503".to_string());
    }
    Ok(out)
}

/// Flags for the C++ compiler.
pub fn cxx_flags(
    opts: &BuildOptions,
    host: &HostInfo,
    toolchain: &Toolchain,
) -> Result<Vec<String>, ConfigError> {
    let sw = compiler_switches(&toolchain.cxx)?;
    let mut out = Vec::new();

    match opts.mode {
        Mode::Release => push_all(&mut out, sw.optimization),
        Mode::Debug => push_all(&mut out, sw.debug),
    }
    push_all(&mut out, sw.exception_handling);
    if host.darwin {
        out.push("-m32".to_string());
    }
    if opts.uses_omp() {
        push_all(&mut out, sw.omp);
    }
    if opts.warn_all {
        push_all(&mut out, sw.warn_all);
    }
    if opts.warn_errors {
        push_all(&mut out, sw.warn_errors);
    }
    Ok(out)
}

/// Flags for nvcc. Device debugging (`-G`) is not enabled in debug mode.
pub fn nvcc_flags(opts: &BuildOptions) -> Vec<String> {
    let mut out = vec![format!("-arch={}", opts.arch)];
    if opts.backend != Backend::Cuda {
        // .cu sources are plain C++ for non-CUDA device backends
        out.push("--x=c++".to_string());
    }
    out
}

/// Flags for the linker. Ocelot's flags come from running `OcelotConfig -l`.
pub fn link_flags(
    opts: &BuildOptions,
    host: &HostInfo,
    toolchain: &Toolchain,
    probe: &dyn ToolProbe,
) -> Result<Vec<String>, ConfigError> {
    let sw = linker_switches(&toolchain.link)?;
    let mut out = Vec::new();

    if opts.mode == Mode::Debug {
        push_all(&mut out, sw.debug);
    }
    if host.darwin {
        out.push("-m32".to_string());
    }
    if opts.backend == Backend::Ocelot {
        let reported = probe.output(OCELOT_CONFIG, &["-l"])?;
        out.extend(reported.split_whitespace().map(str::to_string));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ComputeArch, HostBackend};
    use crate::platform::PlatformFamily;
    use crate::probe::FixedProbe;

    fn gnu() -> Toolchain {
        Toolchain::platform_default(PlatformFamily::Posix)
    }

    fn msvc() -> Toolchain {
        Toolchain::platform_default(PlatformFamily::Windows)
    }

    fn opts() -> BuildOptions {
        BuildOptions::defaults_for(PlatformFamily::Posix)
    }

    #[test]
    fn test_release_is_optimized_not_debug() {
        let flags = c_flags(&opts(), &HostInfo::posix(), &gnu()).unwrap();
        assert_eq!(flags, ["-O2", "-Wall"]);
        let flags = cxx_flags(&opts(), &HostInfo::posix(), &gnu()).unwrap();
        assert!(flags.contains(&"-O2".to_string()));
        assert!(!flags.contains(&"-g".to_string()));
    }

    #[test]
    fn test_debug_is_complement_of_release() {
        let mut o = opts();
        o.mode = Mode::Debug;
        let c = c_flags(&o, &HostInfo::posix(), &gnu()).unwrap();
        assert_eq!(c, ["-g", "-DTHRUST_DEBUG", "-Wall"]);
        let cxx = cxx_flags(&o, &HostInfo::posix(), &gnu()).unwrap();
        assert!(cxx.contains(&"-g".to_string()));
        assert!(!cxx.contains(&"-O2".to_string()));

        let cl = c_flags(&o, &HostInfo::windows(), &msvc()).unwrap();
        assert!(cl.starts_with(&["/Zi".to_string(), "-D_DEBUG".to_string(), "/MTd".to_string()]));
        assert!(!cl.contains(&"/Ox".to_string()));
    }

    #[test]
    fn test_werror_without_wall_still_appended() {
        let mut o = opts();
        o.warn_all = false;
        o.warn_errors = true;
        let flags = c_flags(&o, &HostInfo::posix(), &gnu()).unwrap();
        assert_eq!(flags, ["-O2", "-Werror"]);
        let flags = cxx_flags(&o, &HostInfo::posix(), &gnu()).unwrap();
        assert_eq!(flags, ["-O2", "-Werror"]);
    }

    #[test]
    fn test_omp_from_host_backend() {
        let mut o = opts();
        o.host_backend = HostBackend::Omp;
        let flags = cxx_flags(&o, &HostInfo::posix(), &gnu()).unwrap();
        assert_eq!(flags, ["-O2", "-fopenmp", "-Wall"]);
    }

    #[test]
    fn test_darwin_forces_32bit() {
        let darwin = HostInfo::new(PlatformFamily::Posix, true, "x86_64");
        let c = c_flags(&opts(), &darwin, &gnu()).unwrap();
        assert_eq!(c, ["-O2", "-m32", "-Wall"]);
        let l = link_flags(&opts(), &darwin, &gnu(), &FixedProbe::new()).unwrap();
        assert_eq!(l, ["-m32"]);
    }

    #[test]
    fn test_msvc_c_flags() {
        let o = BuildOptions::defaults_for(PlatformFamily::Windows);
        let c = c_flags(&o, &HostInfo::windows(), &msvc()).unwrap();
        assert_eq!(c, ["/Ox", "/DNOMINMAX", "/wd4503"]);
        let cxx = cxx_flags(&o, &HostInfo::windows(), &msvc()).unwrap();
        assert_eq!(cxx, ["/Ox", "/EHsc"]);
    }

    #[test]
    fn test_unsupported_compiler() {
        let tc = Toolchain::new("icc", "g++", "g++");
        assert!(c_flags(&opts(), &HostInfo::posix(), &tc).is_err());
        assert!(cxx_flags(&opts(), &HostInfo::posix(), &tc).is_ok());
    }

    #[test]
    fn test_nvcc_flags() {
        let mut o = opts();
        o.arch = ComputeArch::Sm20;
        assert_eq!(nvcc_flags(&o), ["-arch=sm_20"]);
        o.backend = Backend::Omp;
        o.mode = Mode::Debug;
        assert_eq!(nvcc_flags(&o), ["-arch=sm_20", "--x=c++"]);
    }

    #[test]
    fn test_link_flags_debug_and_ocelot() {
        let mut o = opts();
        o.mode = Mode::Debug;
        let l = link_flags(&o, &HostInfo::windows(), &msvc(), &FixedProbe::new()).unwrap();
        assert_eq!(l, ["/debug"]);

        o.backend = Backend::Ocelot;
        let probe = FixedProbe::new().with("OcelotConfig -l", " -locelot -lz\n");
        let l = link_flags(&o, &HostInfo::posix(), &gnu(), &probe).unwrap();
        assert_eq!(l, ["-locelot", "-lz"]);

        let err = link_flags(&o, &HostInfo::posix(), &gnu(), &FixedProbe::new()).unwrap_err();
        assert_eq!(err.category(), "tool-probe");
    }
}
