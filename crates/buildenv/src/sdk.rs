//! TEAM_512: SDK install path discovery.
//!
//! Each SDK resolves to a `{bin, lib, include}` triple: an OS default, with
//! each entry independently replaced by its environment override. Nothing
//! here checks that the directories exist; see `xtask doctor` for that.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::env::EnvSource;
use crate::error::ConfigError;
use crate::platform::{HostInfo, PlatformFamily};

/// External development kits the build links against.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Sdk {
    Cuda,
    Tbb,
}

impl Sdk {
    pub const ALL: &'static [Sdk] = &[Sdk::Cuda, Sdk::Tbb];

    pub fn name(self) -> &'static str {
        match self {
            Sdk::Cuda => "CUDA",
            Sdk::Tbb => "TBB",
        }
    }

    /// Override variables for the bin, lib and include directories.
    pub fn env_vars(self) -> [&'static str; 3] {
        match self {
            Sdk::Cuda => ["CUDA_BIN_PATH", "CUDA_LIB_PATH", "CUDA_INC_PATH"],
            Sdk::Tbb => ["TBB_BIN_PATH", "TBB_LIB_PATH", "TBB_INC_PATH"],
        }
    }

    /// Default triple for a host, before overrides.
    pub fn defaults(self, host: &HostInfo) -> Result<SdkPaths, ConfigError> {
        match (self, host.family) {
            (Sdk::Cuda, PlatformFamily::Windows) => Ok(SdkPaths::under("C:/CUDA", host)),
            (Sdk::Cuda, PlatformFamily::Posix) => Ok(SdkPaths::under("/usr/local/cuda", host)),
            (Sdk::Cuda, PlatformFamily::Other) => Err(ConfigError::UnsupportedPlatform {
                what: "where is nvcc installed?",
                platform: host.family,
            }),
            // TBB lives on the compiler's default search paths
            (Sdk::Tbb, PlatformFamily::Posix | PlatformFamily::Other) => Ok(SdkPaths::default()),
            (Sdk::Tbb, PlatformFamily::Windows) => Err(ConfigError::MissingPath {
                sdk: self.name(),
                variables: self.env_vars().to_vec(),
            }),
        }
    }

    /// Resolve the triple for a host: defaults, then per-entry overrides.
    ///
    /// When all three overrides are set the defaults are never consulted, so
    /// an unrecognized OS is fine as long as everything is spelled out.
    pub fn resolve(self, host: &HostInfo, env: &dyn EnvSource) -> Result<SdkPaths, ConfigError> {
        let [bin_var, lib_var, inc_var] = self.env_vars();
        let bin = env.var(bin_var).map(|v| absolute(&v));
        let lib = env.var(lib_var).map(|v| absolute(&v));
        let include = env.var(inc_var).map(|v| absolute(&v));

        let mut paths = match (&bin, &lib, &include) {
            (Some(_), Some(_), Some(_)) => SdkPaths::default(),
            _ => self.defaults(host).map_err(|e| match e {
                // only ask for what is still missing
                ConfigError::MissingPath { sdk, .. } => ConfigError::MissingPath {
                    sdk,
                    variables: [(bin_var, &bin), (lib_var, &lib), (inc_var, &include)]
                        .into_iter()
                        .filter(|(_, set)| set.is_none())
                        .map(|(var, _)| var)
                        .collect(),
                },
                other => other,
            })?,
        };
        if let Some(bin) = bin {
            log::debug!("{bin_var} overrides {} bin path", self.name());
            paths.bin = bin;
        }
        if let Some(lib) = lib {
            log::debug!("{lib_var} overrides {} lib path", self.name());
            paths.lib = lib;
        }
        if let Some(include) = include {
            log::debug!("{inc_var} overrides {} include path", self.name());
            paths.include = include;
        }
        log::debug!(
            "{} paths: bin={} lib={} include={}",
            self.name(),
            paths.bin.display(),
            paths.lib.display(),
            paths.include.display()
        );
        Ok(paths)
    }
}

/// `{bin, lib, include}` directories of one SDK. Empty entries mean "use the
/// toolchain's default search path".
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SdkPaths {
    pub bin: PathBuf,
    pub lib: PathBuf,
    pub include: PathBuf,
}

impl SdkPaths {
    pub fn new(bin: impl Into<PathBuf>, lib: impl Into<PathBuf>, include: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            lib: lib.into(),
            include: include.into(),
        }
    }

    /// `<root>/{bin,lib,include}`, with `lib64` on 64-bit hosts.
    fn under(root: &str, host: &HostInfo) -> Self {
        let lib = if host.is_64bit() {
            format!("{root}/lib64")
        } else {
            format!("{root}/lib")
        };
        Self::new(format!("{root}/bin"), lib, format!("{root}/include"))
    }

    /// Non-empty entries labelled `bin`, `lib`, `include`.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &Path)> {
        [
            ("bin", self.bin.as_path()),
            ("lib", self.lib.as_path()),
            ("include", self.include.as_path()),
        ]
        .into_iter()
        .filter(|(_, p)| !p.as_os_str().is_empty())
    }
}

fn absolute(raw: &str) -> PathBuf {
    std::path::absolute(raw).unwrap_or_else(|_| PathBuf::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;

    fn host32(family: PlatformFamily) -> HostInfo {
        HostInfo::new(family, false, "i686")
    }

    #[test]
    fn test_cuda_posix_defaults() {
        let paths = Sdk::Cuda.resolve(&HostInfo::posix(), &MapEnv::new()).unwrap();
        assert_eq!(
            paths,
            SdkPaths::new("/usr/local/cuda/bin", "/usr/local/cuda/lib64", "/usr/local/cuda/include")
        );

        let paths = Sdk::Cuda
            .resolve(&host32(PlatformFamily::Posix), &MapEnv::new())
            .unwrap();
        assert_eq!(paths.lib, PathBuf::from("/usr/local/cuda/lib"));
    }

    #[test]
    fn test_cuda_windows_defaults() {
        let paths = Sdk::Cuda
            .resolve(&host32(PlatformFamily::Windows), &MapEnv::new())
            .unwrap();
        assert_eq!(paths, SdkPaths::new("C:/CUDA/bin", "C:/CUDA/lib", "C:/CUDA/include"));
        let paths = Sdk::Cuda.resolve(&HostInfo::windows(), &MapEnv::new()).unwrap();
        assert_eq!(paths.lib, PathBuf::from("C:/CUDA/lib64"));
    }

    #[test]
    fn test_each_override_is_independent() {
        let env = MapEnv::new().with("CUDA_LIB_PATH", "/opt/cuda/lib64");
        let paths = Sdk::Cuda.resolve(&host32(PlatformFamily::Posix), &env).unwrap();
        assert_eq!(paths.lib, PathBuf::from("/opt/cuda/lib64"));
        assert_eq!(paths.bin, PathBuf::from("/usr/local/cuda/bin"));
        assert_eq!(paths.include, PathBuf::from("/usr/local/cuda/include"));

        let env = MapEnv::new().with("CUDA_INC_PATH", "/opt/cuda/include");
        let paths = Sdk::Cuda.resolve(&HostInfo::posix(), &env).unwrap();
        assert_eq!(paths.include, PathBuf::from("/opt/cuda/include"));
        assert_eq!(paths.lib, PathBuf::from("/usr/local/cuda/lib64"));

        let env = MapEnv::new().with("CUDA_BIN_PATH", "/opt/cuda/bin");
        let paths = Sdk::Cuda.resolve(&HostInfo::posix(), &env).unwrap();
        assert_eq!(paths.bin, PathBuf::from("/opt/cuda/bin"));
        assert_eq!(paths.lib, PathBuf::from("/usr/local/cuda/lib64"));
        assert_eq!(paths.include, PathBuf::from("/usr/local/cuda/include"));
    }

    #[test]
    fn test_unknown_os_needs_all_overrides() {
        let host = HostInfo::new(PlatformFamily::Other, false, "x86_64");
        let err = Sdk::Cuda.resolve(&host, &MapEnv::new()).unwrap_err();
        assert_eq!(err.category(), "unsupported-platform");

        let partial = MapEnv::new().with("CUDA_BIN_PATH", "/cuda/bin");
        assert!(Sdk::Cuda.resolve(&host, &partial).is_err());

        let full = partial
            .with("CUDA_LIB_PATH", "/cuda/lib")
            .with("CUDA_INC_PATH", "/cuda/include");
        let paths = Sdk::Cuda.resolve(&host, &full).unwrap();
        assert_eq!(paths, SdkPaths::new("/cuda/bin", "/cuda/lib", "/cuda/include"));
    }

    #[test]
    fn test_tbb_defaults() {
        let paths = Sdk::Tbb.resolve(&HostInfo::posix(), &MapEnv::new()).unwrap();
        assert_eq!(paths.entries().count(), 0);

        let err = Sdk::Tbb.resolve(&HostInfo::windows(), &MapEnv::new()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingPath {
                sdk: "TBB",
                variables: vec!["TBB_BIN_PATH", "TBB_LIB_PATH", "TBB_INC_PATH"]
            }
        );
    }

    #[test]
    fn test_missing_path_names_only_unset_overrides() {
        let env = MapEnv::new().with("TBB_LIB_PATH", "C:/tbb/lib");
        let err = Sdk::Tbb.resolve(&HostInfo::windows(), &env).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingPath {
                sdk: "TBB",
                variables: vec!["TBB_BIN_PATH", "TBB_INC_PATH"]
            }
        );
        assert_eq!(
            err.to_string(),
            "where is TBB installed? set TBB_BIN_PATH, TBB_INC_PATH"
        );
    }

    #[test]
    fn test_relative_override_becomes_absolute() {
        let env = MapEnv::new().with("TBB_INC_PATH", "vendor/tbb/include");
        let paths = Sdk::Tbb.resolve(&HostInfo::posix(), &env).unwrap();
        assert!(paths.include.is_absolute());
        assert!(paths.include.ends_with("vendor/tbb/include"));
    }
}
