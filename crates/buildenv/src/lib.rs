//! # buildenv
//!
//! Build environment configuration for the Thrust parallel algorithms
//! library: detects CUDA/TBB install paths, maps compiler and linker switches
//! per toolchain, and assembles flag lists from the user's build variables.
//!
//! ## Usage
//!
//! ```no_run
//! use buildenv::{variables, Assembler, HostInfo};
//!
//! let host = HostInfo::current();
//! let opts = variables::build_options(host.family, [("mode", "debug")])?;
//! let env = Assembler::new(host).assemble(&opts)?;
//! println!("{}", env.cflags.join(" "));
//! # Ok::<(), buildenv::ConfigError>(())
//! ```
//!
//! Everything is a pure function of (options, host, environment variables);
//! any missing table entry is a [`ConfigError`].

pub mod config;
pub mod env;
pub mod environment;
pub mod error;
pub mod filter;
pub mod flags;
pub mod options;
pub mod platform;
pub mod probe;
pub mod sdk;
pub mod toolchain;
pub mod variables;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use environment::{Assembler, BuildEnvironment};
pub use error::ConfigError;
pub use filter::TestFilter;
pub use options::{Backend, BuildOptions, ComputeArch, HostBackend, Mode, MsvcVersion};
pub use platform::{HostInfo, PlatformFamily};
pub use probe::{CommandProbe, FixedProbe, ToolProbe};
pub use sdk::{Sdk, SdkPaths};
pub use toolchain::Toolchain;

use std::path::Path;

/// Resolves build options for `platform`: defaults, then the variables file
/// (if any), then command-line `KEY=VALUE` assignments.
pub fn resolve_options(
    platform: PlatformFamily,
    variables_file: Option<&Path>,
    assignments: &[String],
) -> Result<BuildOptions, ConfigError> {
    let mut all = match variables_file {
        Some(path) => config::load_variables_file(path)?,
        None => Vec::new(),
    };
    for arg in assignments {
        all.push(variables::parse_assignment(arg)?);
    }
    variables::build_options(platform, all)
}
