//! TEAM_512: Compiler and linker switch tables.
//!
//! Maps the name of a compiler/linker program to the literal switches that
//! implement each feature we care about. A feature may expand to several
//! switches (`cl` debug) or to none at all (`gcc` exception handling).

use serde::Serialize;
use std::path::Path;

use crate::env::EnvSource;
use crate::error::ConfigError;
use crate::platform::PlatformFamily;

/// Compiler switches for one toolchain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompilerSwitches {
    pub warn_all: &'static [&'static str],
    pub warn_errors: &'static [&'static str],
    pub optimization: &'static [&'static str],
    pub debug: &'static [&'static str],
    pub exception_handling: &'static [&'static str],
    /// OpenMP parallel extension
    pub omp: &'static [&'static str],
}

/// Linker switches for one toolchain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LinkerSwitches {
    pub debug: &'static [&'static str],
}

const GNU_COMPILER: CompilerSwitches = CompilerSwitches {
    warn_all: &["-Wall"],
    warn_errors: &["-Werror"],
    optimization: &["-O2"],
    debug: &["-g"],
    exception_handling: &[],
    omp: &["-fopenmp"],
};

const MSVC_COMPILER: CompilerSwitches = CompilerSwitches {
    warn_all: &["/Wall"],
    warn_errors: &["/WX"],
    optimization: &["/Ox"],
    debug: &["/Zi", "-D_DEBUG", "/MTd"],
    exception_handling: &["/EHsc"],
    omp: &["/openmp"],
};

const GNU_LINKER: LinkerSwitches = LinkerSwitches { debug: &[] };

const MSVC_LINKER: LinkerSwitches = LinkerSwitches { debug: &["/debug"] };

/// Table key for a program: its file stem, so `/usr/bin/gcc` and `cl.exe`
/// resolve to `gcc` and `cl`.
pub fn program_key(program: &str) -> &str {
    Path::new(program)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(program)
}

/// Switch table row for a compiler program.
pub fn compiler_switches(program: &str) -> Result<&'static CompilerSwitches, ConfigError> {
    match program_key(program) {
        "gcc" | "g++" => Ok(&GNU_COMPILER),
        "cl" => Ok(&MSVC_COMPILER),
        _ => Err(ConfigError::UnsupportedToolchain {
            role: "compiler",
            program: program.to_string(),
        }),
    }
}

/// Switch table row for a linker program.
pub fn linker_switches(program: &str) -> Result<&'static LinkerSwitches, ConfigError> {
    match program_key(program) {
        "gcc" | "g++" => Ok(&GNU_LINKER),
        "link" => Ok(&MSVC_LINKER),
        _ => Err(ConfigError::UnsupportedToolchain {
            role: "linker",
            program: program.to_string(),
        }),
    }
}

/// Build-tool tool modules loaded for a platform.
pub fn default_tools(platform: PlatformFamily) -> Vec<&'static str> {
    match platform {
        PlatformFamily::Windows => vec!["default", "msvc"],
        PlatformFamily::Posix => vec!["default", "gcc"],
        PlatformFamily::Other => vec!["default"],
    }
}

/// The active C compiler, C++ compiler and linker programs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Toolchain {
    pub cc: String,
    pub cxx: String,
    pub link: String,
}

impl Toolchain {
    pub fn new(cc: &str, cxx: &str, link: &str) -> Self {
        Self {
            cc: cc.to_string(),
            cxx: cxx.to_string(),
            link: link.to_string(),
        }
    }

    /// Programs the build tool picks when nothing is overridden.
    pub fn platform_default(platform: PlatformFamily) -> Self {
        match platform {
            PlatformFamily::Windows => Self::new("cl", "cl", "link"),
            PlatformFamily::Posix | PlatformFamily::Other => Self::new("gcc", "g++", "g++"),
        }
    }

    /// Platform defaults overridden by `CC`, `CXX` and `LINK`.
    pub fn resolve(platform: PlatformFamily, env: &dyn EnvSource) -> Self {
        let mut tc = Self::platform_default(platform);
        if let Some(cc) = env.var("CC") {
            tc.cc = cc;
        }
        if let Some(cxx) = env.var("CXX") {
            tc.cxx = cxx;
        }
        if let Some(link) = env.var("LINK") {
            tc.link = link;
        }
        log::debug!("toolchain: CC={} CXX={} LINK={}", tc.cc, tc.cxx, tc.link);
        tc
    }

    /// `cl` needs the windows.h workarounds in C flags.
    pub fn cc_is_msvc(&self) -> bool {
        program_key(&self.cc) == "cl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;

    #[test]
    fn test_program_key_strips_dir_and_ext() {
        assert_eq!(program_key("/usr/bin/gcc"), "gcc");
        assert_eq!(program_key("cl.exe"), "cl");
        assert_eq!(program_key("g++"), "g++");
    }

    #[test]
    fn test_known_compilers() {
        assert_eq!(compiler_switches("gcc").unwrap().optimization, &["-O2"]);
        assert_eq!(compiler_switches("g++").unwrap().omp, &["-fopenmp"]);
        let cl = compiler_switches("cl").unwrap();
        assert_eq!(cl.debug, &["/Zi", "-D_DEBUG", "/MTd"]);
        assert_eq!(cl.exception_handling, &["/EHsc"]);
        assert!(compiler_switches("g++").unwrap().exception_handling.is_empty());
    }

    #[test]
    fn test_unknown_compiler_fails() {
        let err = compiler_switches("clang").unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedToolchain {
                role: "compiler",
                program: "clang".into()
            }
        );
        // the linker table has no entry for cl
        assert!(linker_switches("cl").is_err());
    }

    #[test]
    fn test_linker_debug() {
        assert_eq!(linker_switches("link").unwrap().debug, &["/debug"]);
        assert!(linker_switches("g++").unwrap().debug.is_empty());
    }

    #[test]
    fn test_env_overrides_programs() {
        let env = MapEnv::new().with("CXX", "/opt/gcc/bin/g++");
        let tc = Toolchain::resolve(PlatformFamily::Posix, &env);
        assert_eq!(tc.cc, "gcc");
        assert_eq!(tc.cxx, "/opt/gcc/bin/g++");
        assert_eq!(tc.link, "g++");
        assert!(!tc.cc_is_msvc());
        assert!(Toolchain::platform_default(PlatformFamily::Windows).cc_is_msvc());
    }

    #[test]
    fn test_default_tools() {
        assert_eq!(default_tools(PlatformFamily::Windows), ["default", "msvc"]);
        assert_eq!(default_tools(PlatformFamily::Posix), ["default", "gcc"]);
        assert_eq!(default_tools(PlatformFamily::Other), ["default"]);
    }
}
