//! TEAM_512: Build environment assembly.
//!
//! Ties options, host identity, switch tables and SDK paths together into
//! the [`BuildEnvironment`] handed to the external build tool.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::env::{EnvSource, ProcessEnv};
use crate::error::ConfigError;
use crate::flags::{c_flags, cxx_flags, link_flags, nvcc_flags};
use crate::options::{Backend, BuildOptions};
use crate::platform::{HostInfo, PlatformFamily};
use crate::probe::{CommandProbe, ToolProbe};
use crate::sdk::{Sdk, SdkPaths};
use crate::toolchain::{default_tools, Toolchain};

/// Extra library directory Ocelot installs into on POSIX hosts.
pub const OCELOT_LIB_PATH: &str = "/usr/local/lib";

/// A fully configured build environment.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BuildEnvironment {
    pub host: HostInfo,
    pub options: BuildOptions,
    pub toolchain: Toolchain,
    #[serde(rename = "TOOLS")]
    pub tools: Vec<String>,
    #[serde(rename = "CPPDEFINES")]
    pub defines: Vec<String>,
    #[serde(rename = "CFLAGS")]
    pub cflags: Vec<String>,
    #[serde(rename = "CXXFLAGS")]
    pub cxxflags: Vec<String>,
    #[serde(rename = "NVCCFLAGS")]
    pub nvccflags: Vec<String>,
    #[serde(rename = "LINKFLAGS")]
    pub linkflags: Vec<String>,
    #[serde(rename = "CPPPATH")]
    pub cpppath: Vec<PathBuf>,
    #[serde(rename = "LIBPATH")]
    pub libpath: Vec<PathBuf>,
    #[serde(rename = "LIBS")]
    pub libs: Vec<String>,
    /// Where nvcc and the CUDA runtime live.
    pub cuda: SdkPaths,
    /// Variables propagated into the build commands' environment.
    #[serde(rename = "ENV")]
    pub env: BTreeMap<String, String>,
}

impl BuildEnvironment {
    /// Pretty JSON for the build tool to consume.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Variables for a shell or a child process, in a fixed order:
    /// `CFLAGS`, `CXXFLAGS`, `NVCCFLAGS`, `LDFLAGS`, `CPATH`,
    /// `LIBRARY_PATH`, `LIBS`. Search paths use the host's list separator.
    pub fn shell_exports(&self) -> Vec<(&'static str, String)> {
        vec![
            ("CFLAGS", self.cflags.join(" ")),
            ("CXXFLAGS", self.cxxflags.join(" ")),
            ("NVCCFLAGS", self.nvccflags.join(" ")),
            ("LDFLAGS", self.linkflags.join(" ")),
            ("CPATH", self.search_path(&self.cpppath)),
            ("LIBRARY_PATH", self.search_path(&self.libpath)),
            ("LIBS", self.libs.iter().map(|l| format!("-l{l}")).collect::<Vec<_>>().join(" ")),
        ]
    }

    fn search_path(&self, dirs: &[PathBuf]) -> String {
        let sep = if self.host.is_windows() { ";" } else { ":" };
        dirs.iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// Builds a [`BuildEnvironment`] from options.
///
/// Host, environment and tool probe default to the running process; tests
/// swap them for fixed values.
pub struct Assembler<'a> {
    host: HostInfo,
    env: &'a dyn EnvSource,
    probe: &'a dyn ToolProbe,
    source_root: Option<PathBuf>,
}

impl Default for Assembler<'_> {
    fn default() -> Self {
        Self::new(HostInfo::current())
    }
}

impl<'a> Assembler<'a> {
    pub fn new(host: HostInfo) -> Self {
        Self {
            host,
            env: &ProcessEnv,
            probe: &CommandProbe,
            source_root: None,
        }
    }

    /// Read overrides from `env` instead of the process environment.
    #[must_use]
    pub fn env(mut self, env: &'a dyn EnvSource) -> Self {
        self.env = env;
        self
    }

    /// Run configuration tools through `probe`.
    #[must_use]
    pub fn probe(mut self, probe: &'a dyn ToolProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Library source root, prepended to the include path so it wins over
    /// any copy bundled with the CUDA toolkit.
    #[must_use]
    pub fn source_root(mut self, root: &Path) -> Self {
        self.source_root = Some(root.to_path_buf());
        self
    }

    pub fn host(&self) -> &HostInfo {
        &self.host
    }

    pub fn assemble(&self, opts: &BuildOptions) -> Result<BuildEnvironment, ConfigError> {
        let host = &self.host;
        let toolchain = Toolchain::resolve(host.family, self.env);

        let defines = opts.system_defines().to_vec();
        let define_flags: Vec<String> = defines.iter().map(|d| format!("-D{d}")).collect();

        let mut cflags = define_flags.clone();
        cflags.extend(c_flags(opts, host, &toolchain)?);
        let mut cxxflags = define_flags;
        cxxflags.extend(cxx_flags(opts, host, &toolchain)?);
        let nvccflags = nvcc_flags(opts);
        let linkflags = link_flags(opts, host, &toolchain, self.probe)?;

        let mut cpppath = Vec::new();
        let mut libpath = Vec::new();
        if let Some(root) = &self.source_root {
            cpppath.push(root.clone());
        }

        let cuda = Sdk::Cuda.resolve(host, self.env)?;
        push_dir(&mut libpath, &cuda.lib);
        push_dir(&mut cpppath, &cuda.include);

        // TBB has no Windows default, so only demand it when it is used
        if opts.uses_tbb() {
            let tbb = Sdk::Tbb.resolve(host, self.env)?;
            push_dir(&mut libpath, &tbb.lib);
            push_dir(&mut cpppath, &tbb.include);
        }

        let libs = self.libraries(opts, &mut libpath)?;
        let env = self.propagated_env();

        let out = BuildEnvironment {
            host: host.clone(),
            options: opts.clone(),
            toolchain,
            tools: default_tools(host.family)
                .into_iter()
                .map(str::to_string)
                .collect(),
            defines,
            cflags,
            cxxflags,
            nvccflags,
            linkflags,
            cpppath,
            libpath,
            libs,
            cuda,
            env,
        };
        log::info!(
            "configured backend={} host_backend={} mode={} arch={} on {}",
            opts.backend,
            opts.host_backend,
            opts.mode,
            opts.arch,
            host.family
        );
        Ok(out)
    }

    /// Link libraries. May add search paths for backend runtimes.
    fn libraries(&self, opts: &BuildOptions, libpath: &mut Vec<PathBuf>) -> Result<Vec<String>, ConfigError> {
        let family = self.host.family;
        let mut libs = Vec::new();

        // MSVC links its C++ runtime implicitly
        if family == PlatformFamily::Posix {
            libs.push("stdc++".to_string());
        }
        // cudafe inserts runtime references even for non-CUDA backends
        libs.push("cudart".to_string());

        if opts.backend == Backend::Ocelot {
            if family != PlatformFamily::Posix {
                return Err(ConfigError::UnsupportedPlatform {
                    what: "what is the Ocelot library path?",
                    platform: family,
                });
            }
            libpath.push(PathBuf::from(OCELOT_LIB_PATH));
        }

        if opts.uses_omp() {
            match family {
                PlatformFamily::Posix => libs.push("gomp".to_string()),
                PlatformFamily::Windows => libs.push("VCOMP".to_string()),
                PlatformFamily::Other => {
                    return Err(ConfigError::UnsupportedPlatform {
                        what: "what is the name of the OpenMP library?",
                        platform: family,
                    })
                }
            }
        }

        if opts.uses_tbb() {
            libs.push("tbb".to_string());
        }
        Ok(libs)
    }

    /// Shared library search path of the caller, so built tests can run.
    ///
    /// An unset variable is not an error: nothing is propagated and
    /// configuration carries on.
    fn propagated_env(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        if !self.host.is_posix() {
            return out;
        }
        let key = if self.host.darwin {
            "DYLD_LIBRARY_PATH"
        } else {
            "LD_LIBRARY_PATH"
        };
        match self.env.var(key) {
            Some(value) => {
                out.insert(key.to_string(), value);
            }
            None => log::debug!("{key} not set, nothing to propagate"),
        }
        out
    }
}

fn push_dir(list: &mut Vec<PathBuf>, dir: &Path) {
    if !dir.as_os_str().is_empty() {
        list.push(dir.to_path_buf());
    }
}
