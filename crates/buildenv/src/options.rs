//! TEAM_512: Build options and the backend → preprocessor macro tables.

use core::fmt;
use serde::Serialize;

use crate::error::ConfigError;
use crate::platform::PlatformFamily;

/// Declares an enumerated build variable whose variants map 1:1 to the
/// literal values accepted on the command line.
macro_rules! variable_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($var:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $id:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Name of the build variable selecting this value.
            pub const VARIABLE: &'static str = $var;

            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Literal value as written on the command line.
            pub const fn id(self) -> &'static str {
                match self {
                    $($name::$variant => $id,)*
                }
            }

            /// Allowed values joined with `|`, in declaration order.
            pub fn allowed() -> String {
                Self::ALL.iter().map(|v| v.id()).collect::<Vec<_>>().join("|")
            }

            pub fn parse(value: &str) -> Result<Self, ConfigError> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.id() == value)
                    .ok_or_else(|| ConfigError::UnsupportedOption {
                        variable: $var.to_string(),
                        value: value.to_string(),
                        allowed: Self::allowed(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }

        impl core::str::FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.id())
            }
        }
    };
}

variable_enum! {
    /// The parallel device backend to target.
    #[derive(Default)]
    pub enum Backend("backend") {
        #[default]
        Cuda => "cuda",
        Omp => "omp",
        Ocelot => "ocelot",
        Tbb => "tbb",
    }
}

variable_enum! {
    /// The backend for code running on the host CPU.
    #[derive(Default)]
    pub enum HostBackend("host_backend") {
        #[default]
        Cpp => "cpp",
        Omp => "omp",
        Tbb => "tbb",
    }
}

variable_enum! {
    /// Release versus debug mode.
    #[derive(Default)]
    pub enum Mode("mode") {
        #[default]
        Release => "release",
        Debug => "debug",
    }
}

variable_enum! {
    /// Compute capability for device code generation.
    #[derive(Default)]
    pub enum ComputeArch("arch") {
        #[default]
        Sm10 => "sm_10",
        Sm11 => "sm_11",
        Sm12 => "sm_12",
        Sm13 => "sm_13",
        Sm20 => "sm_20",
        Sm21 => "sm_21",
    }
}

variable_enum! {
    /// MS Visual C++ version. Only declared on Windows hosts.
    pub enum MsvcVersion("MSVC_VERSION") {
        V8 => "8.0",
        V9 => "9.0",
        V10 => "10.0",
    }
}

impl Backend {
    /// Symbol assigned to `THRUST_DEVICE_SYSTEM`.
    ///
    /// Ocelot runs the CUDA code path through its PTX emulator, so it shares
    /// the CUDA symbol.
    pub const fn device_system_macro(self) -> &'static str {
        match self {
            Backend::Cuda | Backend::Ocelot => "THRUST_DEVICE_SYSTEM_CUDA",
            Backend::Omp => "THRUST_DEVICE_SYSTEM_OMP",
            Backend::Tbb => "THRUST_DEVICE_SYSTEM_TBB",
        }
    }
}

impl HostBackend {
    /// Symbol assigned to `THRUST_HOST_SYSTEM`.
    pub const fn host_system_macro(self) -> &'static str {
        match self {
            HostBackend::Cpp => "THRUST_HOST_SYSTEM_CPP",
            HostBackend::Omp => "THRUST_HOST_SYSTEM_OMP",
            HostBackend::Tbb => "THRUST_HOST_SYSTEM_TBB",
        }
    }
}

/// Looks up the device-system symbol for a raw backend name.
pub fn device_system_macro(backend: &str) -> Result<&'static str, ConfigError> {
    Backend::parse(backend).map(Backend::device_system_macro)
}

/// Looks up the host-system symbol for a raw host backend name.
pub fn host_system_macro(host_backend: &str) -> Result<&'static str, ConfigError> {
    HostBackend::parse(host_backend).map(HostBackend::host_system_macro)
}

/// User-selected build variables. Immutable once read.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BuildOptions {
    pub backend: Backend,
    pub host_backend: HostBackend,
    pub mode: Mode,
    pub arch: ComputeArch,
    /// `Wall`
    pub warn_all: bool,
    /// `Werror`. Honoured even when `warn_all` is off.
    pub warn_errors: bool,
    pub msvc_version: Option<MsvcVersion>,
    /// `tests`: regex selecting test sources.
    pub tests: Option<String>,
}

impl BuildOptions {
    /// Defaults for a platform. All warnings are on by default only on POSIX.
    pub fn defaults_for(platform: PlatformFamily) -> Self {
        Self {
            backend: Backend::default(),
            host_backend: HostBackend::default(),
            mode: Mode::default(),
            arch: ComputeArch::default(),
            warn_all: platform == PlatformFamily::Posix,
            warn_errors: false,
            msvc_version: None,
            tests: None,
        }
    }

    /// Either backend needs the OpenMP runtime.
    pub fn uses_omp(&self) -> bool {
        self.backend == Backend::Omp || self.host_backend == HostBackend::Omp
    }

    /// Either backend needs the TBB runtime.
    pub fn uses_tbb(&self) -> bool {
        self.backend == Backend::Tbb || self.host_backend == HostBackend::Tbb
    }

    /// `THRUST_DEVICE_SYSTEM=...` and `THRUST_HOST_SYSTEM=...`, in that order.
    pub fn system_defines(&self) -> [String; 2] {
        [
            format!(
                "THRUST_DEVICE_SYSTEM={}",
                self.backend.device_system_macro()
            ),
            format!(
                "THRUST_HOST_SYSTEM={}",
                self.host_backend.host_system_macro()
            ),
        ]
    }
}
