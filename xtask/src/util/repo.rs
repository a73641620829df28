use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Name of the optional variables file at the repo root.
pub const VARIABLES_FILE: &str = "buildenv.toml";

pub fn repo_root() -> Result<PathBuf> {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask is expected at <repo>/xtask")
}

/// Directory holding the test sources.
pub fn tests_dir(root: &Path) -> PathBuf {
    root.join("testing")
}

/// Explicit `--config`, else `<repo>/buildenv.toml` if it exists.
pub fn variables_file(root: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let default = root.join(VARIABLES_FILE);
    default.is_file().then_some(default)
}
