//! TEAM_512: Host platform identity.
//!
//! Resolved once at startup; everything downstream branches on
//! [`PlatformFamily`] instead of comparing OS strings.

use core::fmt;
use serde::Serialize;

/// Operating-system family, as far as path defaults and library naming care.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFamily {
    /// Windows (`nt`)
    Windows,
    /// Linux, macOS and the other unixes
    Posix,
    /// Anything else. Has no SDK defaults.
    Other,
}

impl PlatformFamily {
    /// Family of the platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            PlatformFamily::Windows
        } else if cfg!(unix) {
            PlatformFamily::Posix
        } else {
            PlatformFamily::Other
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            PlatformFamily::Windows => "nt",
            PlatformFamily::Posix => "posix",
            PlatformFamily::Other => "other",
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl TryFrom<&str> for PlatformFamily {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "nt" | "windows" => Ok(PlatformFamily::Windows),
            "posix" | "linux" | "macos" | "darwin" => Ok(PlatformFamily::Posix),
            "other" => Ok(PlatformFamily::Other),
            _ => Err(format!("Unsupported platform family: {s}")),
        }
    }
}

/// Everything the assembler needs to know about the host.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HostInfo {
    pub family: PlatformFamily,
    /// macOS host. Forces 32-bit code generation.
    pub darwin: bool,
    /// CPU machine name (`x86_64`, `aarch64`, `AMD64`, ...)
    pub machine: String,
}

impl HostInfo {
    pub fn new(family: PlatformFamily, darwin: bool, machine: impl Into<String>) -> Self {
        Self {
            family,
            darwin,
            machine: machine.into(),
        }
    }

    /// Identity of the running host.
    pub fn current() -> Self {
        let host = Self::new(
            PlatformFamily::current(),
            std::env::consts::OS == "macos",
            std::env::consts::ARCH,
        );
        log::debug!(
            "host platform: family={} darwin={} machine={}",
            host.family,
            host.darwin,
            host.machine
        );
        host
    }

    /// A Linux-like host on `x86_64`.
    pub fn posix() -> Self {
        Self::new(PlatformFamily::Posix, false, "x86_64")
    }

    /// A 64-bit Windows host.
    pub fn windows() -> Self {
        Self::new(PlatformFamily::Windows, false, "AMD64")
    }

    /// Machine names ending in `64` count as 64-bit class CPUs.
    pub fn is_64bit(&self) -> bool {
        self.machine.ends_with("64")
    }

    pub fn is_posix(&self) -> bool {
        self.family == PlatformFamily::Posix
    }

    pub fn is_windows(&self) -> bool {
        self.family == PlatformFamily::Windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_str() {
        assert_eq!(PlatformFamily::try_from("nt"), Ok(PlatformFamily::Windows));
        assert_eq!(PlatformFamily::try_from("posix"), Ok(PlatformFamily::Posix));
        assert!(PlatformFamily::try_from("plan9").is_err());
    }

    #[test]
    fn test_machine_width() {
        assert!(HostInfo::posix().is_64bit());
        assert!(HostInfo::windows().is_64bit());
        assert!(HostInfo::new(PlatformFamily::Posix, false, "aarch64").is_64bit());
        assert!(!HostInfo::new(PlatformFamily::Posix, false, "i686").is_64bit());
        assert!(!HostInfo::new(PlatformFamily::Posix, false, "armv7l").is_64bit());
    }

    #[test]
    fn test_current_matches_cfg() {
        let host = HostInfo::current();
        if cfg!(unix) {
            assert!(host.is_posix());
        }
        assert_eq!(host.darwin, cfg!(target_os = "macos"));
    }
}
