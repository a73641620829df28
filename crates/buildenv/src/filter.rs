//! Test source selection by the `tests` regex.

use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ConfigError;

/// File extensions that count as test sources.
pub const TEST_EXTENSIONS: &[&str] = &["cu", "cpp"];

/// Compiled `tests` filter. No pattern selects everything.
#[derive(Clone, Debug, Default)]
pub struct TestFilter(Option<Regex>);

impl TestFilter {
    pub fn new(pattern: Option<&str>) -> Result<Self, ConfigError> {
        let Some(pattern) = pattern else {
            return Ok(Self(None));
        };
        Regex::new(pattern)
            .map(|re| Self(Some(re)))
            .map_err(|e| ConfigError::InvalidTestFilter {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Regex search anywhere in the path, not an anchored match.
    pub fn matches(&self, path: &Path) -> bool {
        match &self.0 {
            Some(re) => re.is_match(&path.to_string_lossy()),
            None => true,
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        self.0.as_ref().map(Regex::as_str)
    }
}

/// Test sources under `dir` (recursively) accepted by `filter`, sorted.
/// Returned paths are relative to `dir`. Symlinked directories are not
/// followed.
pub fn find_test_sources(dir: &Path, filter: &TestFilter) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_source = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| TEST_EXTENSIONS.contains(&e));
        if is_source {
            found.push(path.strip_prefix(dir).unwrap_or(path).to_path_buf());
        }
    }
    found.retain(|p| filter.matches(p));
    found.sort();
    log::debug!(
        "{} test sources under {} match {:?}",
        found.len(),
        dir.display(),
        filter.pattern()
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_pattern_matches_all() {
        let f = TestFilter::new(None).unwrap();
        assert!(f.matches(Path::new("testing/sort.cu")));
        assert_eq!(f.pattern(), None);
    }

    #[test]
    fn test_pattern_is_searched() {
        let f = TestFilter::new(Some("sort|scan")).unwrap();
        assert!(f.matches(Path::new("testing/stable_sort_by_key.cu")));
        assert!(f.matches(Path::new("testing/inclusive_scan.cu")));
        assert!(!f.matches(Path::new("testing/reduce.cu")));
    }

    #[test]
    fn test_bad_pattern() {
        let err = TestFilter::new(Some("sort(")).unwrap_err();
        assert_eq!(err.category(), "unsupported-option");
    }

    #[test]
    fn test_find_sources() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("backend/omp")).unwrap();
        std::fs::write(root.join("sort.cu"), "").unwrap();
        std::fs::write(root.join("reduce.cu"), "").unwrap();
        std::fs::write(root.join("backend/omp/sort_omp.cpp"), "").unwrap();
        std::fs::write(root.join("sort.h"), "").unwrap();

        let all = find_test_sources(root, &TestFilter::default()).unwrap();
        assert_eq!(
            all,
            [
                PathBuf::from("backend/omp/sort_omp.cpp"),
                PathBuf::from("reduce.cu"),
                PathBuf::from("sort.cu"),
            ]
        );

        let sorts = find_test_sources(root, &TestFilter::new(Some("sort")).unwrap()).unwrap();
        assert_eq!(sorts.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_symlink_loop_is_not_followed() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::write(root.join("a.cu"), "").unwrap();
        std::os::unix::fs::symlink(root, root.join("loop")).unwrap();

        let found = find_test_sources(root, &TestFilter::default()).unwrap();
        assert_eq!(found, [PathBuf::from("a.cu")]);
    }
}
